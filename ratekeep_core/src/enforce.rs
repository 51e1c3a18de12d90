// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drift detection and correction.
//!
//! Host pages reset playback rates asynchronously (autoplay-next, seeks,
//! internal player resets). On every trigger the reconciler compares the
//! element's actual rate with its target and, when they differ by more than
//! [`RateConfig::drift_tolerance`], forces the target back and resyncs the
//! control.
//!
//! A tolerance band instead of exact equality keeps the reconciler from
//! reacting to its own corrections on hosts that round or quantize rates.
//!
//! ```text
//!                external rate mutation
//!   Compliant ─────────────────────────────► Drifted
//!       ▲                                       │
//!       └───────────── correction ──────────────┘
//! ```

use crate::config::RateConfig;
use crate::control::ControlView;
use crate::marker;
use crate::media::{MediaElement, MediaEvent};

/// What caused an enforcement check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// The one-off check right after binding.
    Bind,
    /// A notification from the element.
    Event(MediaEvent),
}

impl Trigger {
    /// Returns a short label for log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bind => "bind",
            Self::Event(event) => event.dom_name(),
        }
    }
}

/// Per-element compliance state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DriftState {
    /// Actual rate is within tolerance of the target.
    Compliant,
    /// Actual rate was changed from outside and awaits correction.
    Drifted,
}

impl DriftState {
    /// Classifies an observed rate against a target.
    #[must_use]
    pub fn classify(actual: f64, target: f64, config: &RateConfig) -> Self {
        if config.is_compliant(actual, target) {
            Self::Compliant
        } else {
            Self::Drifted
        }
    }
}

/// Outcome of one enforcement check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Enforcement {
    /// Nothing to do; the element already plays at its target.
    Compliant,
    /// The element was forced from `from` back to `to`.
    Corrected {
        /// Rate observed before correction.
        from: f64,
        /// Target rate that was restored.
        to: f64,
    },
    /// The element carries no readable target rate and is left alone.
    Unmanaged,
}

/// Checks `element` against its stored target and corrects drift.
///
/// On correction the element's rate is set to the target and `control` is
/// resynced so the display never shows a rate the element is not playing at.
pub fn reconcile<E, C>(element: &E, control: &C, config: &RateConfig) -> Enforcement
where
    E: MediaElement + ?Sized,
    C: ControlView + ?Sized,
{
    let Some(target) = marker::target_rate(element, config) else {
        return Enforcement::Unmanaged;
    };
    let actual = element.playback_rate();
    match DriftState::classify(actual, target, config) {
        DriftState::Compliant => Enforcement::Compliant,
        DriftState::Drifted => {
            element.set_playback_rate(target);
            control.show(target);
            Enforcement::Corrected {
                from: actual,
                to: target,
            }
        }
    }
}
