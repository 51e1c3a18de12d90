// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-surface contract.
//!
//! A *host surface* is the site-specific environment the core runs against.
//! Each surface provides the following pieces:
//!
//! - **Enumeration**: The media elements currently on the page, in whatever
//!   order the host finds them.
//!
//! - **Placement**: Finding a stable visual anchor near an element and
//!   building a control there. A surface may refuse (no anchor yet, or its
//!   single control slot is already taken); the element is then retried on
//!   the next scan.
//!
//! - **Subscription**: Wiring the element's notifications and the control's
//!   input to a [`Binding`]. The returned subscription value owns the
//!   listeners; dropping it tears them down. If wiring fails the binding is
//!   dropped and the element is retried like any other skip.
//!
//! The web backend ships two surfaces: one that injects into a single stable
//! control bar and one that floats an overlay over every element in a
//! scrolling feed.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::binder::Binding;
use crate::control::ControlView;
use crate::media::MediaElement;

/// Why an element could not be bound on this scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// No suitable anchor exists near the element yet.
    NoAnchor,
    /// The surface's control slot is occupied by another element's control.
    SlotTaken,
    /// Building the control failed on the host side.
    MountFailed,
    /// Registering the element's or the control's listeners failed.
    SubscribeFailed,
}

impl SkipReason {
    /// Returns a short label for log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoAnchor => "no-anchor",
            Self::SlotTaken => "slot-taken",
            Self::MountFailed => "mount-failed",
            Self::SubscribeFailed => "subscribe-failed",
        }
    }
}

/// Site-specific discovery, placement, and event wiring.
pub trait HostSurface {
    /// The host's media element handle.
    type Element: MediaElement + Clone;
    /// The control widget this surface builds.
    type Control: ControlView;
    /// Owner of the listeners registered for one binding.
    type Subscription;

    /// Enumerates every media element currently on the page.
    fn media_elements(&mut self) -> Vec<Self::Element>;

    /// Builds a control for `element` showing `initial`, placed at a stable
    /// anchor near it.
    fn mount_control(
        &mut self,
        element: &Self::Element,
        initial: f64,
    ) -> Result<Self::Control, SkipReason>;

    /// Routes the element's notifications and the control's input to
    /// `binding`.
    ///
    /// On `Err` nothing stays registered; the binding is dropped and the
    /// element retried on the next scan.
    fn subscribe(
        &mut self,
        binding: &Rc<Binding<Self::Element, Self::Control>>,
    ) -> Result<Self::Subscription, SkipReason>;
}
