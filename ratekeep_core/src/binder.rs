// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attaching a control to one newly discovered element.
//!
//! [`bind`] asks the host surface for a control, seeds the element's target
//! rate from the [`GlobalRate`], and applies it immediately. The resulting
//! [`Binding`] is what host listeners call into: [`Binding::set_rate`] for
//! user input and [`Binding::on_event`] for element notifications.

use core::fmt;

use crate::config::RateConfig;
use crate::control::ControlView;
use crate::enforce::{self, DriftState, Enforcement, Trigger};
use crate::global::GlobalRate;
use crate::host::{HostSurface, SkipReason};
use crate::marker;
use crate::media::{MediaElement, MediaEvent};
use crate::trace::{CorrectionEvent, RateSetEvent, Tracer};

/// Identifies a binding within one discovery loop, for diagnostics.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BindingId(pub u32);

impl fmt::Debug for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BindingId({})", self.0)
    }
}

/// A media element together with its control.
///
/// The element's target rate lives on the element (see [`marker`]); the
/// binding holds what is needed to act on it.
pub struct Binding<E, C> {
    id: BindingId,
    element: E,
    control: C,
    global: GlobalRate,
    config: RateConfig,
}

impl<E: MediaElement, C: ControlView> Binding<E, C> {
    /// Returns this binding's identifier.
    #[must_use]
    pub fn id(&self) -> BindingId {
        self.id
    }

    /// Returns the bound element.
    #[must_use]
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Returns the bound control.
    #[must_use]
    pub fn control(&self) -> &C {
        &self.control
    }

    /// Returns the element's current target rate.
    #[must_use]
    pub fn target_rate(&self) -> Option<f64> {
        marker::target_rate(&self.element, &self.config)
    }

    /// Classifies the element's current rate against its target.
    #[must_use]
    pub fn drift_state(&self) -> Option<DriftState> {
        let target = self.target_rate()?;
        Some(DriftState::classify(
            self.element.playback_rate(),
            target,
            &self.config,
        ))
    }

    /// Applies a rate chosen through this binding's control.
    ///
    /// The value is snapped to the step grid and clamped, then becomes the
    /// element's target, the global rate, and the element's actual rate.
    /// Returns the applied rate. A NaN request changes nothing and resyncs
    /// the control to the current target.
    pub fn set_rate(&self, requested: f64, tracer: &mut Tracer<'_>) -> f64 {
        let Some(applied) = self.config.snap(requested) else {
            let current = self.target_rate().unwrap_or_else(|| self.global.get());
            self.control.show(current);
            return current;
        };

        // Target first: the element's own ratechange must see no drift.
        marker::set_target_rate(&self.element, applied);
        self.global.set(applied);
        self.element.set_playback_rate(applied);
        self.control.show(applied);

        tracer.rate_set(&RateSetEvent {
            binding: self.id,
            requested,
            applied,
        });
        applied
    }

    /// Handles a notification from the element.
    ///
    /// Rate changes are never taken as user intent; every notification is
    /// checked against the stored target.
    pub fn on_event(&self, event: MediaEvent, tracer: &mut Tracer<'_>) -> Enforcement {
        self.enforce(Trigger::Event(event), tracer)
    }

    /// Runs one enforcement check.
    pub fn enforce(&self, trigger: Trigger, tracer: &mut Tracer<'_>) -> Enforcement {
        let outcome = enforce::reconcile(&self.element, &self.control, &self.config);
        if let Enforcement::Corrected { from, to } = outcome {
            tracer.correction(&CorrectionEvent {
                binding: self.id,
                trigger,
                from,
                to,
            });
        }
        outcome
    }
}

impl<E, C> fmt::Debug for Binding<E, C>
where
    E: MediaElement,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("rate", &self.element.playback_rate())
            .field("target", &marker::target_rate(&self.element, &self.config))
            .finish_non_exhaustive()
    }
}

/// Binds a control to `element`.
///
/// The host mounts the control first; if it refuses, the element is left
/// untouched so the next scan can try again. On success the element keeps a
/// valid target rate it already carries (an element pruned and reattached
/// retains what its own control set); otherwise the target is seeded from
/// `global`. Either way it is applied at once.
///
/// The caller is responsible for marking the element bound and subscribing
/// host listeners.
pub fn bind<H: HostSurface>(
    host: &mut H,
    id: BindingId,
    element: H::Element,
    global: &GlobalRate,
    config: &RateConfig,
) -> Result<Binding<H::Element, H::Control>, SkipReason> {
    let seed = marker::target_rate(&element, config).unwrap_or_else(|| global.get());
    let control = host.mount_control(&element, seed)?;

    marker::set_target_rate(&element, seed);
    element.set_playback_rate(seed);

    Ok(Binding {
        id,
        element,
        control,
        global: global.clone(),
        config: *config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimMedia, SimSurface};

    fn setup() -> (SimSurface, GlobalRate, RateConfig) {
        let cfg = RateConfig::standard();
        (SimSurface::new(), GlobalRate::new(&cfg), cfg)
    }

    #[test]
    fn bind_seeds_from_global() {
        let (mut host, global, cfg) = setup();
        global.set(2.0);
        let media = host.add_media(1.0);

        let binding =
            bind(&mut host, BindingId(0), media.clone(), &global, &cfg).expect("anchor exists");

        assert_eq!(binding.target_rate(), Some(2.0));
        assert_eq!(media.playback_rate(), 2.0, "seed applied immediately");
        assert_eq!(binding.control().shown(), 2.0);
        assert_eq!(host.mounted(&media), 1);
    }

    #[test]
    fn missing_anchor_leaves_element_untouched() {
        let (mut host, global, cfg) = setup();
        global.set(3.0);
        let media = host.add_media(1.0);
        host.set_anchor(&media, false);

        let err = bind(&mut host, BindingId(0), media.clone(), &global, &cfg).unwrap_err();

        assert_eq!(err, SkipReason::NoAnchor);
        assert_eq!(media.playback_rate(), 1.0);
        assert_eq!(marker::target_rate(&media, &cfg), None);
    }

    #[test]
    fn existing_target_outranks_global() {
        let (mut host, global, cfg) = setup();
        global.set(1.5);
        let media = host.add_media(1.0);
        marker::set_target_rate(&media, 3.0);

        let binding = bind(&mut host, BindingId(0), media.clone(), &global, &cfg).unwrap();

        assert_eq!(binding.target_rate(), Some(3.0));
        assert_eq!(media.playback_rate(), 3.0);
        assert_eq!(binding.control().shown(), 3.0);
        assert_eq!(global.get(), 1.5, "binding does not touch the global rate");
    }

    #[test]
    fn set_rate_updates_target_global_and_element() {
        let (mut host, global, cfg) = setup();
        let media = host.add_media(1.0);
        let binding = bind(&mut host, BindingId(0), media.clone(), &global, &cfg).unwrap();

        let applied = binding.set_rate(1.5, &mut Tracer::none());

        assert_eq!(applied, 1.5);
        assert_eq!(binding.target_rate(), Some(1.5));
        assert_eq!(global.get(), 1.5);
        assert_eq!(media.playback_rate(), 1.5);
        assert_eq!(binding.control().shown(), 1.5);
    }

    #[test]
    fn set_rate_snaps_and_clamps() {
        let (mut host, global, cfg) = setup();
        let media = host.add_media(1.0);
        let binding = bind(&mut host, BindingId(0), media, &global, &cfg).unwrap();

        assert_eq!(binding.set_rate(9.0, &mut Tracer::none()), 4.0);
        assert_eq!(binding.set_rate(0.1, &mut Tracer::none()), 0.5);
        assert_eq!(binding.set_rate(1.3, &mut Tracer::none()), 1.25);
        assert_eq!(global.get(), 1.25);
    }

    #[test]
    fn nan_input_keeps_target() {
        let (mut host, global, cfg) = setup();
        let media = host.add_media(1.0);
        let binding = bind(&mut host, BindingId(0), media, &global, &cfg).unwrap();
        binding.set_rate(2.5, &mut Tracer::none());

        assert_eq!(binding.set_rate(f64::NAN, &mut Tracer::none()), 2.5);
        assert_eq!(binding.target_rate(), Some(2.5));
        assert_eq!(binding.control().shown(), 2.5);
    }

    #[test]
    fn own_rate_change_is_not_drift() {
        let (mut host, global, cfg) = setup();
        let media = host.add_media(1.0);
        let binding = bind(&mut host, BindingId(0), media.clone(), &global, &cfg).unwrap();

        binding.set_rate(2.0, &mut Tracer::none());
        let writes = media.rate_writes();
        let outcome = binding.on_event(MediaEvent::RateChange, &mut Tracer::none());

        assert_eq!(outcome, Enforcement::Compliant);
        assert_eq!(media.rate_writes(), writes, "no corrective write");
    }

    #[test]
    fn external_reset_is_reverted() {
        let (mut host, global, cfg) = setup();
        let media = host.add_media(1.0);
        let binding = bind(&mut host, BindingId(0), media.clone(), &global, &cfg).unwrap();
        binding.set_rate(1.5, &mut Tracer::none());

        media.host_reset(1.0);
        assert_eq!(binding.drift_state(), Some(DriftState::Drifted));

        let outcome = binding.on_event(MediaEvent::RateChange, &mut Tracer::none());
        assert_eq!(outcome, Enforcement::Corrected { from: 1.0, to: 1.5 });
        assert_eq!(binding.drift_state(), Some(DriftState::Compliant));
        assert_eq!(media.playback_rate(), 1.5);
    }

    #[test]
    fn every_trigger_enforces() {
        let (mut host, global, cfg) = setup();
        let media = host.add_media(1.0);
        let binding = bind(&mut host, BindingId(0), media.clone(), &global, &cfg).unwrap();
        binding.set_rate(3.0, &mut Tracer::none());

        for event in MediaEvent::ALL {
            media.host_reset(1.0);
            binding.on_event(event, &mut Tracer::none());
            assert_eq!(media.playback_rate(), 3.0, "{event:?} must enforce");
        }
    }

    #[test]
    fn debug_shows_rates() {
        let (mut host, global, cfg) = setup();
        let media = host.add_media(1.0);
        let binding = bind(&mut host, BindingId(7), media, &global, &cfg).unwrap();
        let text = alloc::format!("{binding:?}");
        assert!(text.contains("BindingId(7)"), "{text}");
    }
}
