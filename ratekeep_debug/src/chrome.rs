// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//! Each scan becomes a complete (`"X"`) slice spanning until the next scan;
//! binds, corrections, and inputs become instant events on the lane of the
//! binding they concern.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use ratekeep_core::time::HostTime;

use crate::recorder::RecordedEvent;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Only scans carry host time; events in between are stamped with the time
/// of the most recent scan.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::new();
    let mut now = HostTime::default();

    for (idx, recorded) in events.iter().enumerate() {
        match recorded {
            RecordedEvent::Tick(e) => {
                now = e.now;
                let next = events[idx + 1..].iter().find_map(|ev| match ev {
                    RecordedEvent::Tick(t) => Some(t.now),
                    _ => None,
                });
                let dur = next.map_or(0, |t| t.saturating_duration_since(now).micros());
                out.push(json!({
                    "ph": "X",
                    "name": "Scan",
                    "cat": "Discovery",
                    "ts": now.micros(),
                    "dur": dur,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "tick_index": e.tick_index,
                        "found": e.found,
                    }
                }));
            }
            RecordedEvent::Bind(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Bind",
                    "cat": "Discovery",
                    "ts": now.micros(),
                    "pid": 0,
                    "tid": binding_lane(e.binding.0),
                    "s": "t",
                    "args": {
                        "tick_index": e.tick_index,
                        "seed": e.rate,
                    }
                }));
            }
            RecordedEvent::BindSkipped(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "BindSkipped",
                    "cat": "Discovery",
                    "ts": now.micros(),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "tick_index": e.tick_index,
                        "reason": e.reason.as_str(),
                    }
                }));
            }
            RecordedEvent::RateSet(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "RateSet",
                    "cat": "Input",
                    "ts": now.micros(),
                    "pid": 0,
                    "tid": binding_lane(e.binding.0),
                    "s": "t",
                    "args": {
                        "requested": e.requested,
                        "applied": e.applied,
                    }
                }));
            }
            RecordedEvent::Correction(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Correction",
                    "cat": "Enforcement",
                    "ts": now.micros(),
                    "pid": 0,
                    "tid": binding_lane(e.binding.0),
                    "s": "t",
                    "args": {
                        "trigger": e.trigger.as_str(),
                        "from": e.from,
                        "to": e.to,
                    }
                }));
            }
            RecordedEvent::Prune(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Prune",
                    "cat": "Discovery",
                    "ts": now.micros(),
                    "pid": 0,
                    "tid": binding_lane(e.binding.0),
                    "s": "t",
                    "args": {
                        "tick_index": e.tick_index,
                    }
                }));
            }
            RecordedEvent::TickSummary(r) => {
                out.push(json!({
                    "ph": "C",
                    "name": "Bindings",
                    "cat": "Discovery",
                    "ts": now.micros(),
                    "pid": 0,
                    "args": {
                        "bound": r.bound,
                        "skipped": r.skipped,
                        "pruned": r.pruned,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}

/// Lane 0 is the scan itself; each binding gets its own lane after it.
fn binding_lane(id: u32) -> u64 {
    u64::from(id) + 1
}
