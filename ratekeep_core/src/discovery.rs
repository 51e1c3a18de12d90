// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The periodic scan that finds and binds media elements.
//!
//! [`DiscoveryLoop::tick`] is called by a host tick source every
//! [`RateConfig::poll_interval`]. Each scan enumerates the page, binds every
//! element that does not yet carry the bound marker, and runs one enforcement
//! check on each new binding. Elements the host cannot place a control for
//! are skipped and retried on the next scan.
//!
//! ```text
//!   tick source ──► DiscoveryLoop::tick()
//!                        │ media_elements()
//!                        ▼
//!                 marker::is_bound? ── yes ──► skip
//!                        │ no
//!                        ▼
//!                 binder::bind() ── Err ──► retry next tick
//!                        │ Ok
//!                        ▼
//!      subscribe() ─► mark_bound() ─► enforce(Trigger::Bind)
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use crate::binder::{self, Binding, BindingId};
use crate::config::RateConfig;
use crate::enforce::Trigger;
use crate::global::GlobalRate;
use crate::host::HostSurface;
use crate::marker;
use crate::media::MediaElement;
use crate::time::HostTime;
use crate::trace::{BindEvent, BindSkippedEvent, PruneEvent, TickEvent, Tracer};

/// Outcome of one discovery scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Scan counter, starting at zero.
    pub tick_index: u64,
    /// Elements the host enumerated.
    pub found: usize,
    /// Elements newly bound.
    pub bound: usize,
    /// Unbound elements the host could not place a control for.
    pub skipped: usize,
    /// Bindings dropped because their element left the document.
    pub pruned: usize,
}

struct Bound<H: HostSurface> {
    // Declared first so listeners are torn down before the binding.
    _subscription: H::Subscription,
    binding: Rc<Binding<H::Element, H::Control>>,
}

/// Scans a host surface and keeps every element it finds bound.
///
/// There is no pause or cancellation: a loop runs for as long as its tick
/// source keeps calling [`tick`](Self::tick).
pub struct DiscoveryLoop<H: HostSurface> {
    host: H,
    global: GlobalRate,
    config: RateConfig,
    bound: Vec<Bound<H>>,
    next_id: u32,
    tick_index: u64,
}

impl<H: HostSurface> DiscoveryLoop<H> {
    /// Creates a loop over `host`, seeding new elements from `global`.
    #[must_use]
    pub fn new(host: H, global: GlobalRate, config: RateConfig) -> Self {
        Self {
            host,
            global,
            config,
            bound: Vec::new(),
            next_id: 0,
            tick_index: 0,
        }
    }

    /// Returns the host surface.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the host surface mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Returns the shared global rate.
    #[must_use]
    pub fn global(&self) -> &GlobalRate {
        &self.global
    }

    /// Returns the loop's configuration.
    #[must_use]
    pub fn config(&self) -> &RateConfig {
        &self.config
    }

    /// Number of live bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Iterates over live bindings in bind order.
    pub fn bindings(&self) -> impl Iterator<Item = &Rc<Binding<H::Element, H::Control>>> {
        self.bound.iter().map(|bound| &bound.binding)
    }

    /// Runs one discovery scan.
    pub fn tick(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> TickReport {
        let tick_index = self.tick_index;
        self.tick_index += 1;

        let elements = self.host.media_elements();
        tracer.tick(&TickEvent {
            tick_index,
            now,
            found: elements.len(),
        });

        let mut report = TickReport {
            tick_index,
            found: elements.len(),
            ..TickReport::default()
        };
        if self.config.prune_detached {
            report.pruned = self.prune(tick_index, tracer);
        }

        for element in elements {
            if marker::is_bound(&element) {
                continue;
            }
            let id = BindingId(self.next_id);
            let bound = binder::bind(&mut self.host, id, element, &self.global, &self.config)
                .and_then(|binding| {
                    let binding = Rc::new(binding);
                    let subscription = self.host.subscribe(&binding)?;
                    Ok((binding, subscription))
                });
            match bound {
                Ok((binding, subscription)) => {
                    self.next_id += 1;
                    marker::mark_bound(binding.element());
                    tracer.bind(&BindEvent {
                        tick_index,
                        binding: id,
                        rate: binding.target_rate().unwrap_or_else(|| self.global.get()),
                    });
                    binding.enforce(Trigger::Bind, tracer);
                    self.bound.push(Bound {
                        _subscription: subscription,
                        binding,
                    });
                    report.bound += 1;
                }
                Err(reason) => {
                    tracer.bind_skipped(&BindSkippedEvent { tick_index, reason });
                    report.skipped += 1;
                }
            }
        }

        tracer.tick_summary(&report);
        report
    }

    /// Drops bindings whose element has left the document.
    ///
    /// The bound marker is cleared so a reattached element is bound again.
    fn prune(&mut self, tick_index: u64, tracer: &mut Tracer<'_>) -> usize {
        let before = self.bound.len();
        self.bound.retain(|bound| {
            let element = bound.binding.element();
            if element.is_connected() {
                return true;
            }
            marker::clear_bound(element);
            tracer.prune(&PruneEvent {
                tick_index,
                binding: bound.binding.id(),
            });
            false
        });
        before - self.bound.len()
    }
}

impl<H: HostSurface + fmt::Debug> fmt::Debug for DiscoveryLoop<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryLoop")
            .field("host", &self.host)
            .field("global", &self.global)
            .field("bound", &self.bound.len())
            .field("tick_index", &self.tick_index)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlView as _;
    use crate::enforce::Enforcement;
    use crate::host::SkipReason;
    use crate::media::MediaEvent;
    use crate::sim::{SimMedia, SimSurface};

    fn new_loop(host: SimSurface, config: RateConfig) -> DiscoveryLoop<SimSurface> {
        let global = GlobalRate::new(&config);
        DiscoveryLoop::new(host, global, config)
    }

    fn tick(lp: &mut DiscoveryLoop<SimSurface>) -> TickReport {
        lp.tick(HostTime::default(), &mut Tracer::none())
    }

    fn binding_for(
        lp: &DiscoveryLoop<SimSurface>,
        media: &SimMedia,
    ) -> Rc<Binding<SimMedia, crate::sim::SimControl>> {
        lp.bindings()
            .find(|b| b.element().same(media))
            .cloned()
            .expect("element is bound")
    }

    #[test]
    fn binding_is_idempotent() {
        let mut lp = new_loop(SimSurface::new(), RateConfig::standard());
        let a = lp.host_mut().add_media(1.0);

        let first = tick(&mut lp);
        let second = tick(&mut lp);

        assert_eq!(first.bound, 1);
        assert_eq!(second.bound, 0, "second scan must not rebind");
        assert_eq!(lp.host().mounted(&a), 1);
        assert_eq!(lp.host().live_controls(), 1);
        assert_eq!(lp.len(), 1);
        assert!(marker::is_bound(&a));
    }

    #[test]
    fn duplicate_enumeration_binds_once() {
        struct Doubled(SimSurface);

        impl HostSurface for Doubled {
            type Element = SimMedia;
            type Control = crate::sim::SimControl;
            type Subscription = crate::sim::SimSubscription;

            fn media_elements(&mut self) -> Vec<SimMedia> {
                let mut all = self.0.media_elements();
                all.extend(self.0.media_elements());
                all
            }

            fn mount_control(
                &mut self,
                element: &SimMedia,
                initial: f64,
            ) -> Result<Self::Control, SkipReason> {
                self.0.mount_control(element, initial)
            }

            fn subscribe(
                &mut self,
                binding: &Rc<Binding<SimMedia, Self::Control>>,
            ) -> Result<Self::Subscription, SkipReason> {
                self.0.subscribe(binding)
            }
        }

        let mut host = Doubled(SimSurface::new());
        let a = host.0.add_media(1.0);
        let config = RateConfig::standard();
        let mut lp = DiscoveryLoop::new(host, GlobalRate::new(&config), config);

        let report = lp.tick(HostTime::default(), &mut Tracer::none());

        assert_eq!(report.found, 2);
        assert_eq!(report.bound, 1);
        assert_eq!(lp.host().0.mounted(&a), 1);
    }

    #[test]
    fn new_element_seeds_from_global() {
        let mut lp = new_loop(SimSurface::new(), RateConfig::standard());
        lp.global().set(2.0);
        let a = lp.host_mut().add_media(1.0);

        tick(&mut lp);

        assert_eq!(binding_for(&lp, &a).target_rate(), Some(2.0));
        assert_eq!(a.playback_rate(), 2.0);
    }

    #[test]
    fn overrides_are_per_element_but_update_global() {
        let mut lp = new_loop(SimSurface::new(), RateConfig::standard());
        let a = lp.host_mut().add_media(1.0);
        let b = lp.host_mut().add_media(1.0);
        tick(&mut lp);

        lp.host().input(&a, 3.0, &mut Tracer::none());

        assert_eq!(binding_for(&lp, &a).target_rate(), Some(3.0));
        assert_eq!(binding_for(&lp, &b).target_rate(), Some(1.0), "B untouched");
        assert_eq!(lp.global().get(), 3.0);

        let c = lp.host_mut().add_media(1.0);
        tick(&mut lp);
        assert_eq!(binding_for(&lp, &c).target_rate(), Some(3.0));
        assert_eq!(c.playback_rate(), 3.0);
    }

    #[test]
    fn feed_scenario() {
        let mut lp = new_loop(SimSurface::new(), RateConfig::standard());
        assert_eq!(lp.global().get(), 1.0);

        let a = lp.host_mut().add_media(1.0);
        tick(&mut lp);
        assert_eq!(a.playback_rate(), 1.0);

        assert_eq!(lp.host().input(&a, 1.5, &mut Tracer::none()), Some(1.5));
        assert_eq!(lp.global().get(), 1.5);
        assert_eq!(binding_for(&lp, &a).target_rate(), Some(1.5));

        let b = lp.host_mut().add_media(1.0);
        tick(&mut lp);
        assert_eq!(b.playback_rate(), 1.5, "B seeds at the last chosen rate");

        b.host_reset(1.0);
        let outcome = lp
            .host()
            .fire(&b, MediaEvent::RateChange, &mut Tracer::none());
        assert_eq!(outcome, Some(Enforcement::Corrected { from: 1.0, to: 1.5 }));
        assert_eq!(b.playback_rate(), 1.5);
        assert_eq!(binding_for(&lp, &b).control().shown(), 1.5);
    }

    #[test]
    fn bind_check_corrects_immediate_reset() {
        // A host that overrides the seeded rate during mounting.
        struct Resetting(SimSurface);

        impl HostSurface for Resetting {
            type Element = SimMedia;
            type Control = crate::sim::SimControl;
            type Subscription = crate::sim::SimSubscription;

            fn media_elements(&mut self) -> Vec<SimMedia> {
                self.0.media_elements()
            }

            fn mount_control(
                &mut self,
                element: &SimMedia,
                initial: f64,
            ) -> Result<Self::Control, SkipReason> {
                self.0.mount_control(element, initial)
            }

            fn subscribe(
                &mut self,
                binding: &Rc<Binding<SimMedia, Self::Control>>,
            ) -> Result<Self::Subscription, SkipReason> {
                binding.element().host_reset(1.0);
                binding.control().show(1.0);
                self.0.subscribe(binding)
            }
        }

        let config = RateConfig::standard();
        let global = GlobalRate::new(&config);
        global.set(2.5);
        let mut host = Resetting(SimSurface::new());
        let a = host.0.add_media(1.0);
        let mut lp = DiscoveryLoop::new(host, global, config);

        lp.tick(HostTime::default(), &mut Tracer::none());

        assert_eq!(a.playback_rate(), 2.5, "post-bind check restores target");
        assert_eq!(lp.bindings().next().unwrap().control().shown(), 2.5);
    }

    #[test]
    fn missing_anchor_is_retried() {
        let mut lp = new_loop(SimSurface::new(), RateConfig::standard());
        let a = lp.host_mut().add_media(1.0);
        lp.host_mut().set_anchor(&a, false);

        let first = tick(&mut lp);
        assert_eq!((first.bound, first.skipped), (0, 1));
        assert!(!marker::is_bound(&a));

        lp.host_mut().set_anchor(&a, true);
        let second = tick(&mut lp);
        assert_eq!((second.bound, second.skipped), (1, 0));
        assert!(marker::is_bound(&a));
    }

    #[test]
    fn single_slot_binds_first_only() {
        let mut lp = new_loop(SimSurface::single_slot(), RateConfig::standard());
        let a = lp.host_mut().add_media(1.0);
        let b = lp.host_mut().add_media(1.0);

        let report = tick(&mut lp);

        assert_eq!((report.bound, report.skipped), (1, 1));
        assert!(marker::is_bound(&a));
        assert!(!marker::is_bound(&b));
    }

    #[test]
    fn reinjected_loop_does_not_double_bind() {
        let mut first = new_loop(SimSurface::new(), RateConfig::standard());
        let a = first.host_mut().add_media(1.0);
        tick(&mut first);

        // A fresh loop over the same page, as after script reinjection.
        let mut page = SimSurface::new();
        page.reattach_media(&a);
        let mut second = new_loop(page, RateConfig::standard());
        let report = tick(&mut second);

        assert_eq!(report.found, 1);
        assert_eq!(report.bound, 0, "durable marker survives the reload");
    }

    #[test]
    fn detached_elements_are_kept_without_pruning() {
        let mut lp = new_loop(SimSurface::new(), RateConfig::standard());
        let a = lp.host_mut().add_media(1.0);
        tick(&mut lp);

        lp.host_mut().remove_media(&a);
        let report = tick(&mut lp);

        assert_eq!(report.pruned, 0);
        assert_eq!(lp.len(), 1);
        a.host_reset(1.25);
        assert!(
            lp.host()
                .fire(&a, MediaEvent::Play, &mut Tracer::none())
                .is_some(),
            "listeners on detached elements stay harmless"
        );
    }

    #[test]
    fn pruning_tears_down_and_allows_rebinding() {
        let config = RateConfig::standard().with_pruning(true);
        let mut lp = new_loop(SimSurface::new(), config);
        let a = lp.host_mut().add_media(1.0);
        let b = lp.host_mut().add_media(1.0);
        tick(&mut lp);
        assert_eq!(lp.host().active_subscriptions(), 2);

        lp.host_mut().remove_media(&a);
        let report = tick(&mut lp);

        assert_eq!(report.pruned, 1);
        assert_eq!(lp.len(), 1);
        assert_eq!(lp.host().live_controls(), 1, "A's control dropped");
        assert_eq!(lp.host().active_subscriptions(), 1);
        assert!(!marker::is_bound(&a));
        assert!(
            lp.host()
                .fire(&a, MediaEvent::Play, &mut Tracer::none())
                .is_none()
        );
        assert!(marker::is_bound(&b));

        lp.host_mut().reattach_media(&a);
        let report = tick(&mut lp);
        assert_eq!(report.bound, 1, "reattached element is bound afresh");
        assert_eq!(lp.host().live_controls(), 2);
    }

    #[test]
    fn failed_subscription_is_retried() {
        let mut lp = new_loop(SimSurface::new(), RateConfig::standard());
        let a = lp.host_mut().add_media(1.0);
        lp.host_mut().fail_next_subscriptions(1);

        let report = tick(&mut lp);
        assert_eq!((report.bound, report.skipped), (0, 1));
        assert!(!marker::is_bound(&a), "left unmarked for the next scan");
        assert!(lp.is_empty());
        assert_eq!(lp.host().live_controls(), 0, "half-wired control dropped");
        assert_eq!(lp.host().active_subscriptions(), 0);

        let report = tick(&mut lp);
        assert_eq!((report.bound, report.skipped), (1, 0));
        assert!(marker::is_bound(&a));
        assert_eq!(lp.host().live_controls(), 1);
        assert_eq!(lp.host().active_subscriptions(), 1);
    }

    #[test]
    fn reattached_element_keeps_its_own_rate() {
        let config = RateConfig::standard().with_pruning(true);
        let mut lp = new_loop(SimSurface::new(), config);
        let a = lp.host_mut().add_media(1.0);
        let b = lp.host_mut().add_media(1.0);
        tick(&mut lp);
        lp.host().input(&a, 3.0, &mut Tracer::none());
        lp.host().input(&b, 1.5, &mut Tracer::none());
        assert_eq!(lp.global().get(), 1.5);

        lp.host_mut().remove_media(&a);
        tick(&mut lp);
        lp.host_mut().reattach_media(&a);
        let report = tick(&mut lp);

        assert_eq!(report.bound, 1);
        assert_eq!(marker::target_rate(&a, &config), Some(3.0), "not reseeded from global");
        assert_eq!(a.playback_rate(), 3.0);
        assert_eq!(lp.host().live_controls(), 2, "one control per live element");
    }

    #[test]
    fn elements_processed_in_host_order() {
        let mut lp = new_loop(SimSurface::new(), RateConfig::standard());
        let a = lp.host_mut().add_media(1.0);
        let b = lp.host_mut().add_media(1.0);
        let c = lp.host_mut().add_media(1.0);
        tick(&mut lp);

        let order: Vec<_> = lp.bindings().map(|b| b.id()).collect();
        assert_eq!(order, [BindingId(0), BindingId(1), BindingId(2)]);
        assert!(binding_for(&lp, &a).id() < binding_for(&lp, &b).id());
        assert!(binding_for(&lp, &b).id() < binding_for(&lp, &c).id());
    }

    #[test]
    fn tick_indices_advance() {
        let mut lp = new_loop(SimSurface::new(), RateConfig::standard());
        assert_eq!(tick(&mut lp).tick_index, 0);
        assert_eq!(tick(&mut lp).tick_index, 1);
        assert!(lp.is_empty());
    }
}
