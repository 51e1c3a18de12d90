// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Durable per-element state.
//!
//! Binding status and the target rate live as attributes on the element
//! itself, not in a side table, so a reinjected script that rescans the page
//! sees elements an earlier instance already bound.

use alloc::format;

use crate::config::RateConfig;
use crate::media::MediaElement;

/// Attribute marking an element as bound. Value is always `"true"`.
pub const BOUND_ATTR: &str = "data-speed-controlled";

/// Attribute carrying the element's target rate as decimal text.
pub const TARGET_ATTR: &str = "data-target-speed";

/// Returns `true` if a control has already been bound to `element`.
#[must_use]
pub fn is_bound<E: MediaElement + ?Sized>(element: &E) -> bool {
    element.attribute(BOUND_ATTR).as_deref() == Some("true")
}

/// Marks `element` as bound. Idempotent.
pub fn mark_bound<E: MediaElement + ?Sized>(element: &E) {
    element.set_attribute(BOUND_ATTR, "true");
}

/// Removes the bound marker so the element is picked up again by the next
/// discovery scan.
pub fn clear_bound<E: MediaElement + ?Sized>(element: &E) {
    element.remove_attribute(BOUND_ATTR);
}

/// Reads the element's target rate, clamped into the configured band.
///
/// Returns `None` when the attribute is missing or does not parse, in which
/// case the element is not under enforcement.
#[must_use]
pub fn target_rate<E: MediaElement + ?Sized>(element: &E, config: &RateConfig) -> Option<f64> {
    let raw = element.attribute(TARGET_ATTR)?;
    let parsed = raw.trim().parse::<f64>().ok()?;
    config.clamp(parsed)
}

/// Stores `rate` as the element's target rate.
pub fn set_target_rate<E: MediaElement + ?Sized>(element: &E, rate: f64) {
    element.set_attribute(TARGET_ATTR, &format!("{rate}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimMedia;

    #[test]
    fn bound_marker_is_idempotent() {
        let media = SimMedia::new(1.0);
        assert!(!is_bound(&media));
        mark_bound(&media);
        mark_bound(&media);
        assert!(is_bound(&media));
        assert_eq!(media.attribute(BOUND_ATTR).as_deref(), Some("true"));

        clear_bound(&media);
        assert!(!is_bound(&media));
    }

    #[test]
    fn foreign_marker_value_is_not_bound() {
        let media = SimMedia::new(1.0);
        media.set_attribute(BOUND_ATTR, "false");
        assert!(!is_bound(&media));
    }

    #[test]
    fn target_rate_round_trips_through_attribute() {
        let cfg = RateConfig::standard();
        let media = SimMedia::new(1.0);
        assert_eq!(target_rate(&media, &cfg), None);

        set_target_rate(&media, 1.75);
        assert_eq!(media.attribute(TARGET_ATTR).as_deref(), Some("1.75"));
        assert_eq!(target_rate(&media, &cfg), Some(1.75));
    }

    #[test]
    fn tampered_target_is_clamped_or_ignored() {
        let cfg = RateConfig::standard();
        let media = SimMedia::new(1.0);

        media.set_attribute(TARGET_ATTR, "12");
        assert_eq!(target_rate(&media, &cfg), Some(4.0));

        media.set_attribute(TARGET_ATTR, "fast");
        assert_eq!(target_rate(&media, &cfg), None);

        media.set_attribute(TARGET_ATTR, "NaN");
        assert_eq!(target_rate(&media, &cfg), None);
    }
}
