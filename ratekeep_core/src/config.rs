// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rate bounds, enforcement tolerance, and loop cadence.

use crate::time::Duration;

/// Configuration shared by the global rate, the binder, the reconciler, and
/// the discovery loop.
///
/// The values are fixed per deployment; [`RateConfig::standard`] carries the
/// ones every shipped host profile uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateConfig {
    /// Lowest playback rate a control can request.
    pub min_speed: f64,
    /// Highest playback rate a control can request.
    pub max_speed: f64,
    /// Granularity of the rate input.
    pub step: f64,
    /// Largest `|actual - target|` treated as compliant.
    ///
    /// Must stay below [`step`](Self::step) so a single user step is never
    /// mistaken for drift.
    ///
    /// The bound is inclusive but compared in `f64`, so a difference that is
    /// exactly the tolerance on paper can land either side of it: `0.6`
    /// against `0.5` is compliant, `1.1` against `1.0` is drift.
    pub drift_tolerance: f64,
    /// Period between discovery scans.
    pub poll_interval: Duration,
    /// Drop bindings whose element has left the document, tearing down their
    /// listeners and controls.
    pub prune_detached: bool,
}

impl RateConfig {
    /// Rate every element starts at before any user interaction.
    pub const DEFAULT_SPEED: f64 = 1.0;

    /// Standard configuration: `0.5..=4.0` in steps of `0.25`, tolerance
    /// `0.1`, scanning every second, no pruning.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            min_speed: 0.5,
            max_speed: 4.0,
            step: 0.25,
            drift_tolerance: 0.1,
            poll_interval: Duration::from_millis(1000),
            prune_detached: false,
        }
    }

    /// Returns a copy with pruning of detached elements switched on or off.
    #[must_use]
    pub const fn with_pruning(mut self, prune_detached: bool) -> Self {
        self.prune_detached = prune_detached;
        self
    }

    /// Clamps `rate` into `[min_speed, max_speed]`.
    ///
    /// Returns `None` for NaN, which has no meaningful position in the band.
    #[must_use]
    pub fn clamp(&self, rate: f64) -> Option<f64> {
        if rate.is_nan() {
            return None;
        }
        Some(rate.clamp(self.min_speed, self.max_speed))
    }

    /// Clamps `rate` and rounds it to the nearest step above `min_speed`.
    #[must_use]
    pub fn snap(&self, rate: f64) -> Option<f64> {
        let clamped = self.clamp(rate)?;
        if self.step <= 0.0 {
            return Some(clamped);
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "clamped offset divided by step is a small non-negative count"
        )]
        let steps = ((clamped - self.min_speed) / self.step + 0.5) as u32;
        let snapped = self.min_speed + f64::from(steps) * self.step;
        Some(snapped.min(self.max_speed))
    }

    /// Returns `true` if `actual` is within tolerance of `target`.
    #[must_use]
    pub fn is_compliant(&self, actual: f64, target: f64) -> bool {
        drift(actual, target) <= self.drift_tolerance
    }
}

impl Default for RateConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Absolute difference between an observed and an intended rate.
#[must_use]
pub fn drift(actual: f64, target: f64) -> f64 {
    if actual > target {
        actual - target
    } else {
        target - actual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_values() {
        let cfg = RateConfig::standard();
        assert_eq!(cfg.min_speed, 0.5);
        assert_eq!(cfg.max_speed, 4.0);
        assert_eq!(cfg.step, 0.25);
        assert_eq!(cfg.drift_tolerance, 0.1);
        assert_eq!(cfg.poll_interval.as_millis(), 1000);
        assert!(
            cfg.drift_tolerance < cfg.step,
            "tolerance must be finer than one step"
        );
    }

    #[test]
    fn clamp_bounds_and_nan() {
        let cfg = RateConfig::standard();
        assert_eq!(cfg.clamp(0.1), Some(0.5));
        assert_eq!(cfg.clamp(16.0), Some(4.0));
        assert_eq!(cfg.clamp(f64::INFINITY), Some(4.0));
        assert_eq!(cfg.clamp(f64::NEG_INFINITY), Some(0.5));
        assert_eq!(cfg.clamp(2.3), Some(2.3));
        assert_eq!(cfg.clamp(f64::NAN), None);
    }

    #[test]
    fn snap_to_step_grid() {
        let cfg = RateConfig::standard();
        assert_eq!(cfg.snap(1.3), Some(1.25));
        assert_eq!(cfg.snap(1.4), Some(1.5));
        assert_eq!(cfg.snap(3.99), Some(4.0));
        assert_eq!(cfg.snap(-3.0), Some(0.5));
        assert_eq!(cfg.snap(2.0), Some(2.0));
    }

    #[test]
    fn compliance_band() {
        let cfg = RateConfig::standard();
        assert!(cfg.is_compliant(1.05, 1.0));
        assert!(cfg.is_compliant(0.95, 1.0));
        assert!(!cfg.is_compliant(1.25, 1.0), "one full step is drift");
        assert_eq!(drift(1.0, 1.5), 0.5);
        assert_eq!(drift(1.5, 1.0), 0.5);
    }

    #[test]
    fn tolerance_edge_follows_f64_subtraction() {
        let cfg = RateConfig::standard();
        assert!(drift(0.6, 0.5) <= 0.1);
        assert!(cfg.is_compliant(0.6, 0.5), "difference rounds just under 0.1");
        assert!(drift(1.1, 1.0) > 0.1);
        assert!(!cfg.is_compliant(1.1, 1.0), "difference rounds just over 0.1");
    }
}
