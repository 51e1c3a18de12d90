// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event, in
//! arrival order, as a [`RecordedEvent`]. Recordings feed assertions in tests
//! and the [`chrome`](crate::chrome) exporter.

use ratekeep_core::binder::BindingId;
use ratekeep_core::discovery::TickReport;
use ratekeep_core::trace::{
    BindEvent, BindSkippedEvent, CorrectionEvent, PruneEvent, RateSetEvent, TickEvent, TraceSink,
};

/// One recorded trace event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A scan started.
    Tick(TickEvent),
    /// An element was bound.
    Bind(BindEvent),
    /// An element could not be bound this scan.
    BindSkipped(BindSkippedEvent),
    /// The user moved a control.
    RateSet(RateSetEvent),
    /// Drift was corrected.
    Correction(CorrectionEvent),
    /// A detached binding was dropped.
    Prune(PruneEvent),
    /// A scan finished.
    TickSummary(TickReport),
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Returns every correction applied to `binding`.
    pub fn corrections_for(&self, binding: BindingId) -> impl Iterator<Item = &CorrectionEvent> {
        self.events.iter().filter_map(move |event| match event {
            RecordedEvent::Correction(e) if e.binding == binding => Some(e),
            _ => None,
        })
    }

    /// Number of elements bound over the whole recording.
    #[must_use]
    pub fn bind_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, RecordedEvent::Bind(_)))
            .count()
    }
}

impl TraceSink for RecorderSink {
    fn on_tick(&mut self, e: &TickEvent) {
        self.events.push(RecordedEvent::Tick(*e));
    }

    fn on_bind(&mut self, e: &BindEvent) {
        self.events.push(RecordedEvent::Bind(*e));
    }

    fn on_bind_skipped(&mut self, e: &BindSkippedEvent) {
        self.events.push(RecordedEvent::BindSkipped(*e));
    }

    fn on_rate_set(&mut self, e: &RateSetEvent) {
        self.events.push(RecordedEvent::RateSet(*e));
    }

    fn on_correction(&mut self, e: &CorrectionEvent) {
        self.events.push(RecordedEvent::Correction(*e));
    }

    fn on_prune(&mut self, e: &PruneEvent) {
        self.events.push(RecordedEvent::Prune(*e));
    }

    fn on_tick_summary(&mut self, r: &TickReport) {
        self.events.push(RecordedEvent::TickSummary(*r));
    }
}
