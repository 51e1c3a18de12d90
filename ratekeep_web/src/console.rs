// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace output.

use alloc::format;

use wasm_bindgen::JsValue;
use web_sys::console;

use ratekeep_core::discovery::TickReport;
use ratekeep_core::trace::{
    BindEvent, BindSkippedEvent, CorrectionEvent, PruneEvent, RateSetEvent, TraceSink,
};

/// A [`TraceSink`] that writes to the browser console.
///
/// Binds, corrections, and prunes go to `console.debug`. With `verbose` set,
/// skipped binds, user input, and non-idle scan summaries are logged too.
/// Events only arrive when the `trace` feature is enabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    /// Also log the chatty events.
    pub verbose: bool,
}

impl ConsoleSink {
    /// Creates a sink that logs only state changes.
    #[must_use]
    pub const fn new() -> Self {
        Self { verbose: false }
    }
}

fn debug(line: &str) {
    console::debug_1(&JsValue::from_str(line));
}

impl TraceSink for ConsoleSink {
    fn on_bind(&mut self, e: &BindEvent) {
        debug(&format!("[ratekeep] bound #{} at {:.2}x", e.binding.0, e.rate));
    }

    fn on_bind_skipped(&mut self, e: &BindSkippedEvent) {
        if self.verbose {
            debug(&format!("[ratekeep] skipped bind: {}", e.reason.as_str()));
        }
    }

    fn on_rate_set(&mut self, e: &RateSetEvent) {
        if self.verbose {
            debug(&format!(
                "[ratekeep] #{} set to {:.2}x (requested {})",
                e.binding.0, e.applied, e.requested
            ));
        }
    }

    fn on_correction(&mut self, e: &CorrectionEvent) {
        debug(&format!(
            "[ratekeep] #{} corrected on {}: {:.2}x -> {:.2}x",
            e.binding.0,
            e.trigger.as_str(),
            e.from,
            e.to
        ));
    }

    fn on_prune(&mut self, e: &PruneEvent) {
        debug(&format!("[ratekeep] #{} detached, dropped", e.binding.0));
    }

    fn on_tick_summary(&mut self, r: &TickReport) {
        if self.verbose && (r.bound > 0 || r.pruned > 0) {
            debug(&format!(
                "[ratekeep] scan {}: found={} bound={} skipped={} pruned={}",
                r.tick_index, r.found, r.bound, r.skipped, r.pruned
            ));
        }
    }
}
