// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host's playable entities and the notifications the core listens to.

use alloc::string::String;

/// A playable entity owned by the host page.
///
/// Methods take `&self`: media elements are shared handles into host state
/// (DOM nodes on the web), and every mutation is visible to all holders.
/// Implementations must tolerate calls after the element left the document.
pub trait MediaElement {
    /// Current playback rate as reported by the host.
    fn playback_rate(&self) -> f64;

    /// Asks the host to play at `rate`.
    fn set_playback_rate(&self, rate: f64);

    /// Reads a string attribute stored on the element.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Stores a string attribute on the element.
    fn set_attribute(&self, name: &str, value: &str);

    /// Removes a string attribute from the element.
    fn remove_attribute(&self, name: &str);

    /// Whether the element is still part of the live document.
    fn is_connected(&self) -> bool {
        true
    }
}

/// A notification delivered by a media element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaEvent {
    /// The playback rate changed, from any source.
    RateChange,
    /// Playback started or resumed.
    Play,
    /// A seek began.
    Seeking,
    /// A seek completed.
    Seeked,
}

impl MediaEvent {
    /// Every event the reconciler subscribes to.
    pub const ALL: [Self; 4] = [Self::RateChange, Self::Play, Self::Seeking, Self::Seeked];

    /// The DOM event type name.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::RateChange => "ratechange",
            Self::Play => "play",
            Self::Seeking => "seeking",
            Self::Seeked => "seeked",
        }
    }
}
