// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host doubles.
//!
//! [`SimMedia`], [`SimControl`], and [`SimSurface`] stand in for a page so
//! the discovery loop, binder, and reconciler can run without a browser. The
//! surface plays the role of the page's event dispatcher: [`SimSurface::fire`]
//! and [`SimSurface::input`] deliver notifications to whatever binding is
//! currently subscribed for an element.

use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::binder::Binding;
use crate::control::ControlView;
use crate::enforce::Enforcement;
use crate::host::{HostSurface, SkipReason};
use crate::media::{MediaElement, MediaEvent};
use crate::trace::Tracer;

// ---------------------------------------------------------------------------
// SimMedia
// ---------------------------------------------------------------------------

struct MediaState {
    rate: Cell<f64>,
    attrs: RefCell<BTreeMap<String, String>>,
    connected: Cell<bool>,
    rate_writes: Cell<u32>,
}

/// A media element backed by plain cells.
///
/// Clones are the same element, like two references to one DOM node.
#[derive(Clone)]
pub struct SimMedia {
    state: Rc<MediaState>,
}

impl SimMedia {
    /// Creates a connected element playing at `rate`.
    #[must_use]
    pub fn new(rate: f64) -> Self {
        Self {
            state: Rc::new(MediaState {
                rate: Cell::new(rate),
                attrs: RefCell::new(BTreeMap::new()),
                connected: Cell::new(true),
                rate_writes: Cell::new(0),
            }),
        }
    }

    /// Changes the rate the way a page script would, bypassing the write
    /// counter.
    pub fn host_reset(&self, rate: f64) {
        self.state.rate.set(rate);
    }

    /// Number of times the rate was written through [`MediaElement`].
    #[must_use]
    pub fn rate_writes(&self) -> u32 {
        self.state.rate_writes.get()
    }

    /// Attaches or detaches the element from the simulated document.
    pub fn set_connected(&self, connected: bool) {
        self.state.connected.set(connected);
    }

    /// Returns `true` if both handles refer to the same element.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl MediaElement for SimMedia {
    fn playback_rate(&self) -> f64 {
        self.state.rate.get()
    }

    fn set_playback_rate(&self, rate: f64) {
        self.state.rate.set(rate);
        self.state.rate_writes.set(self.state.rate_writes.get() + 1);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.state.attrs.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.state
            .attrs
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.state.attrs.borrow_mut().remove(name);
    }

    fn is_connected(&self) -> bool {
        self.state.connected.get()
    }
}

impl fmt::Debug for SimMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimMedia")
            .field("rate", &self.state.rate.get())
            .field("connected", &self.state.connected.get())
            .field("attrs", &self.state.attrs.borrow())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// SimControl
// ---------------------------------------------------------------------------

/// A control that remembers the last rate it was asked to show.
///
/// Dropping the control releases its slot in the owning [`SimSurface`].
pub struct SimControl {
    shown: Cell<f64>,
    live: Rc<Cell<u32>>,
}

impl SimControl {
    /// Creates a free-standing control showing `initial`.
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self::with_counter(initial, Rc::new(Cell::new(0)))
    }

    fn with_counter(initial: f64, live: Rc<Cell<u32>>) -> Self {
        live.set(live.get() + 1);
        Self {
            shown: Cell::new(initial),
            live,
        }
    }

    /// The rate currently displayed.
    #[must_use]
    pub fn shown(&self) -> f64 {
        self.shown.get()
    }
}

impl ControlView for SimControl {
    fn show(&self, rate: f64) {
        self.shown.set(rate);
    }
}

impl Drop for SimControl {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
    }
}

impl fmt::Debug for SimControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimControl")
            .field("shown", &self.shown.get())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// SimSurface
// ---------------------------------------------------------------------------

type SimBinding = Binding<SimMedia, SimControl>;

struct PageEntry {
    media: SimMedia,
    anchored: bool,
    mounted: u32,
}

struct Listener {
    media: SimMedia,
    binding: Weak<SimBinding>,
    active: Rc<Cell<bool>>,
}

/// Listener registration returned by [`SimSurface::subscribe`].
///
/// Dropping it stops delivery, like removing DOM event listeners.
pub struct SimSubscription {
    active: Rc<Cell<bool>>,
}

impl Drop for SimSubscription {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

impl fmt::Debug for SimSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimSubscription")
            .field("active", &self.active.get())
            .finish()
    }
}

/// A scripted page: an ordered list of media elements plus an event
/// dispatcher.
pub struct SimSurface {
    page: Vec<PageEntry>,
    listeners: Vec<Listener>,
    live_controls: Rc<Cell<u32>>,
    single_slot: bool,
    failing_subscriptions: u32,
}

impl Default for SimSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SimSurface {
    /// Creates an empty page where every element gets its own overlay.
    #[must_use]
    pub fn new() -> Self {
        Self {
            page: Vec::new(),
            listeners: Vec::new(),
            live_controls: Rc::new(Cell::new(0)),
            single_slot: false,
            failing_subscriptions: 0,
        }
    }

    /// Creates an empty page with one shared control slot, like a player
    /// control bar.
    #[must_use]
    pub fn single_slot() -> Self {
        Self {
            single_slot: true,
            ..Self::new()
        }
    }

    /// Makes the next `count` subscriptions fail with
    /// [`SkipReason::SubscribeFailed`].
    pub fn fail_next_subscriptions(&mut self, count: u32) {
        self.failing_subscriptions = count;
    }

    /// Appends a new anchored element playing at `rate`.
    pub fn add_media(&mut self, rate: f64) -> SimMedia {
        let media = SimMedia::new(rate);
        self.page.push(PageEntry {
            media: media.clone(),
            anchored: true,
            mounted: 0,
        });
        media
    }

    /// Controls whether `media` has an anchor a control can attach to.
    pub fn set_anchor(&mut self, media: &SimMedia, anchored: bool) {
        if let Some(entry) = self.entry_mut(media) {
            entry.anchored = anchored;
        }
    }

    /// Takes `media` off the page and marks it disconnected.
    pub fn remove_media(&mut self, media: &SimMedia) {
        media.set_connected(false);
        self.page.retain(|entry| !entry.media.same(media));
    }

    /// Puts a previously removed element back at the end of the page.
    pub fn reattach_media(&mut self, media: &SimMedia) {
        media.set_connected(true);
        self.page.push(PageEntry {
            media: media.clone(),
            anchored: true,
            mounted: 0,
        });
    }

    /// How many controls were ever mounted for `media` while it was on the
    /// page.
    #[must_use]
    pub fn mounted(&self, media: &SimMedia) -> u32 {
        self.page
            .iter()
            .find(|entry| entry.media.same(media))
            .map_or(0, |entry| entry.mounted)
    }

    /// Number of controls currently alive.
    #[must_use]
    pub fn live_controls(&self) -> u32 {
        self.live_controls.get()
    }

    /// Number of subscriptions still delivering events.
    #[must_use]
    pub fn active_subscriptions(&self) -> usize {
        self.listeners
            .iter()
            .filter(|listener| listener.active.get())
            .count()
    }

    /// Delivers `event` from `media` to its subscribed binding.
    ///
    /// Returns `None` when nothing is listening.
    pub fn fire(
        &self,
        media: &SimMedia,
        event: MediaEvent,
        tracer: &mut Tracer<'_>,
    ) -> Option<Enforcement> {
        let binding = self.listening(media)?;
        Some(binding.on_event(event, tracer))
    }

    /// Simulates the user dragging `media`'s control to `value`.
    ///
    /// Returns the applied rate, or `None` when nothing is listening.
    pub fn input(&self, media: &SimMedia, value: f64, tracer: &mut Tracer<'_>) -> Option<f64> {
        let binding = self.listening(media)?;
        Some(binding.set_rate(value, tracer))
    }

    fn listening(&self, media: &SimMedia) -> Option<Rc<SimBinding>> {
        self.listeners
            .iter()
            .filter(|listener| listener.active.get() && listener.media.same(media))
            .find_map(|listener| listener.binding.upgrade())
    }

    fn entry_mut(&mut self, media: &SimMedia) -> Option<&mut PageEntry> {
        self.page.iter_mut().find(|entry| entry.media.same(media))
    }
}

impl HostSurface for SimSurface {
    type Element = SimMedia;
    type Control = SimControl;
    type Subscription = SimSubscription;

    fn media_elements(&mut self) -> Vec<SimMedia> {
        self.page.iter().map(|entry| entry.media.clone()).collect()
    }

    fn mount_control(&mut self, element: &SimMedia, initial: f64) -> Result<SimControl, SkipReason> {
        if self.single_slot && self.live_controls.get() > 0 {
            return Err(SkipReason::SlotTaken);
        }
        let live = Rc::clone(&self.live_controls);
        let entry = self.entry_mut(element).ok_or(SkipReason::NoAnchor)?;
        if !entry.anchored {
            return Err(SkipReason::NoAnchor);
        }
        entry.mounted += 1;
        Ok(SimControl::with_counter(initial, live))
    }

    fn subscribe(&mut self, binding: &Rc<SimBinding>) -> Result<SimSubscription, SkipReason> {
        if self.failing_subscriptions > 0 {
            self.failing_subscriptions -= 1;
            return Err(SkipReason::SubscribeFailed);
        }
        let active = Rc::new(Cell::new(true));
        self.listeners.retain(|listener| listener.active.get());
        self.listeners.push(Listener {
            media: binding.element().clone(),
            binding: Rc::downgrade(binding),
            active: Rc::clone(&active),
        });
        Ok(SimSubscription { active })
    }
}

impl fmt::Debug for SimSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimSurface")
            .field("page_len", &self.page.len())
            .field("listeners", &self.listeners.len())
            .field("live_controls", &self.live_controls.get())
            .field("single_slot", &self.single_slot)
            .field("failing_subscriptions", &self.failing_subscriptions)
            .finish()
    }
}
