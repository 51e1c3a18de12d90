// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use ratekeep_core::discovery::TickReport;
use ratekeep_core::trace::{
    BindEvent, BindSkippedEvent, CorrectionEvent, PruneEvent, RateSetEvent, TickEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    quiet_ticks: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("quiet_ticks", &self.quiet_ticks)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            quiet_ticks: false,
        }
    }

    /// Suppresses tick and summary lines for scans that changed nothing.
    #[must_use]
    pub fn quiet_ticks(mut self, quiet: bool) -> Self {
        self.quiet_ticks = quiet;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tick(&mut self, e: &TickEvent) {
        if self.quiet_ticks {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[tick] #{} at {:.1}ms found={}",
            e.tick_index,
            e.now.micros() as f64 / 1000.0,
            e.found,
        );
    }

    fn on_bind(&mut self, e: &BindEvent) {
        let _ = writeln!(
            self.writer,
            "[bind] tick={} binding={} seed={:.2}",
            e.tick_index, e.binding.0, e.rate,
        );
    }

    fn on_bind_skipped(&mut self, e: &BindSkippedEvent) {
        let _ = writeln!(
            self.writer,
            "[skip] tick={} reason={}",
            e.tick_index,
            e.reason.as_str(),
        );
    }

    fn on_rate_set(&mut self, e: &RateSetEvent) {
        let _ = writeln!(
            self.writer,
            "[input] binding={} requested={:.2} applied={:.2}",
            e.binding.0, e.requested, e.applied,
        );
    }

    fn on_correction(&mut self, e: &CorrectionEvent) {
        let _ = writeln!(
            self.writer,
            "[correct] binding={} on={} {:.2} -> {:.2}",
            e.binding.0,
            e.trigger.as_str(),
            e.from,
            e.to,
        );
    }

    fn on_prune(&mut self, e: &PruneEvent) {
        let _ = writeln!(
            self.writer,
            "[prune] tick={} binding={}",
            e.tick_index, e.binding.0,
        );
    }

    fn on_tick_summary(&mut self, r: &TickReport) {
        if self.quiet_ticks && r.bound == 0 && r.skipped == 0 && r.pruned == 0 {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[summary] tick={} found={} bound={} skipped={} pruned={}",
            r.tick_index, r.found, r.bound, r.skipped, r.pruned,
        );
    }
}
