// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for discovery and enforcement.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! discovery loop and bindings call as they work. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: Enables the `Tracer` method bodies (one branch per call).

use crate::binder::BindingId;
use crate::discovery::TickReport;
use crate::enforce::Trigger;
use crate::host::SkipReason;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the start of each discovery scan.
#[derive(Clone, Copy, Debug)]
pub struct TickEvent {
    /// Monotonic scan counter.
    pub tick_index: u64,
    /// Host time when the scan started.
    pub now: HostTime,
    /// Number of media elements the host enumerated.
    pub found: usize,
}

/// Emitted when a control is attached to a newly discovered element.
#[derive(Clone, Copy, Debug)]
pub struct BindEvent {
    /// Scan that discovered the element.
    pub tick_index: u64,
    /// Identifier assigned to the new binding.
    pub binding: BindingId,
    /// Seed rate taken from the global rate.
    pub rate: f64,
}

/// Emitted when an unbound element could not be bound this scan.
#[derive(Clone, Copy, Debug)]
pub struct BindSkippedEvent {
    /// Scan that attempted the bind.
    pub tick_index: u64,
    /// Why the host refused.
    pub reason: SkipReason,
}

/// Emitted when the user moves a control.
#[derive(Clone, Copy, Debug)]
pub struct RateSetEvent {
    /// Binding whose control was moved.
    pub binding: BindingId,
    /// Value read from the input.
    pub requested: f64,
    /// Value after snapping and clamping; now the target and global rate.
    pub applied: f64,
}

/// Emitted when enforcement forces an element back to its target.
#[derive(Clone, Copy, Debug)]
pub struct CorrectionEvent {
    /// Binding that was corrected.
    pub binding: BindingId,
    /// What triggered the check.
    pub trigger: Trigger,
    /// Rate observed before correction.
    pub from: f64,
    /// Target rate restored.
    pub to: f64,
}

/// Emitted when a binding for a detached element is dropped.
#[derive(Clone, Copy, Debug)]
pub struct PruneEvent {
    /// Scan that noticed the detachment.
    pub tick_index: u64,
    /// Binding that was dropped.
    pub binding: BindingId,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the discovery loop and bindings.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a discovery scan starts.
    fn on_tick(&mut self, e: &TickEvent) {
        _ = e;
    }

    /// Called when an element is bound.
    fn on_bind(&mut self, e: &BindEvent) {
        _ = e;
    }

    /// Called when binding an element was skipped for this scan.
    fn on_bind_skipped(&mut self, e: &BindSkippedEvent) {
        _ = e;
    }

    /// Called when the user sets a rate through a control.
    fn on_rate_set(&mut self, e: &RateSetEvent) {
        _ = e;
    }

    /// Called when drift is corrected.
    fn on_correction(&mut self, e: &CorrectionEvent) {
        _ = e;
    }

    /// Called when a detached binding is dropped.
    fn on_prune(&mut self, e: &PruneEvent) {
        _ = e;
    }

    /// Called with the outcome of a finished scan.
    fn on_tick_summary(&mut self, r: &TickReport) {
        _ = r;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TickEvent`].
    #[inline]
    pub fn tick(&mut self, e: &TickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BindEvent`].
    #[inline]
    pub fn bind(&mut self, e: &BindEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_bind(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BindSkippedEvent`].
    #[inline]
    pub fn bind_skipped(&mut self, e: &BindSkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_bind_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RateSetEvent`].
    #[inline]
    pub fn rate_set(&mut self, e: &RateSetEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_rate_set(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CorrectionEvent`].
    #[inline]
    pub fn correction(&mut self, e: &CorrectionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_correction(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PruneEvent`].
    #[inline]
    pub fn prune(&mut self, e: &PruneEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_prune(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TickReport`].
    #[inline]
    pub fn tick_summary(&mut self, r: &TickReport) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick_summary(r);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = r;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSink {
        ticks: u32,
        corrections: u32,
    }

    impl TraceSink for CountingSink {
        fn on_tick(&mut self, _e: &TickEvent) {
            self.ticks += 1;
        }

        fn on_correction(&mut self, _e: &CorrectionEvent) {
            self.corrections += 1;
        }
    }

    fn sample_tick() -> TickEvent {
        TickEvent {
            tick_index: 3,
            now: HostTime(3_000_000),
            found: 2,
        }
    }

    #[test]
    fn none_tracer_is_silent() {
        let mut tracer = Tracer::none();
        tracer.tick(&sample_tick());
        tracer.prune(&PruneEvent {
            tick_index: 0,
            binding: BindingId(0),
        });
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        let mut tracer = Tracer::new(&mut sink);
        tracer.tick(&sample_tick());
        tracer.bind_skipped(&BindSkippedEvent {
            tick_index: 0,
            reason: SkipReason::NoAnchor,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_when_enabled() {
        let mut sink = CountingSink::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.tick(&sample_tick());
            tracer.tick(&sample_tick());
            tracer.correction(&CorrectionEvent {
                binding: BindingId(1),
                trigger: Trigger::Bind,
                from: 1.0,
                to: 1.5,
            });
            tracer.bind(&BindEvent {
                tick_index: 0,
                binding: BindingId(1),
                rate: 1.0,
            });
        }
        assert_eq!(sink.ticks, 2);
        assert_eq!(sink.corrections, 1);
    }

    #[cfg(not(feature = "trace"))]
    #[test]
    fn tracer_compiles_out_when_disabled() {
        let mut sink = CountingSink::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.tick(&sample_tick());
        }
        assert_eq!(sink.ticks, 0, "trace feature off drops every event");
        assert_eq!(sink.corrections, 0);
    }
}
