// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-element rate control as seen by the core.

use alloc::format;
use alloc::string::String;

/// The visible half of a rate control: a display and an input that can be
/// resynchronized to a rate.
///
/// Hosts build the actual widget; the core only ever pushes a value into it.
pub trait ControlView {
    /// Updates the display text and input position to `rate`.
    fn show(&self, rate: f64);
}

/// Formats a rate for display, e.g. `"1.50x"`.
#[must_use]
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.2}x")
}
