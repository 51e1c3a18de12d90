// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Site profiles.
//!
//! Each profile is a [`HostSurface`](ratekeep_core::host::HostSurface) with
//! its own discovery scope and control placement:
//!
//! - [`ControlBarSurface`]: one primary player with a stable control bar. A
//!   single slider is injected at the start of the bar.
//! - [`OverlaySurface`]: a scrolling feed of many players. Each one gets a
//!   floating overlay that appears on hover.

mod control_bar;
mod overlay;

pub use control_bar::ControlBarSurface;
pub use overlay::{OverlayConfig, OverlaySurface};

/// Which surface a page gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// Single player, control injected into its control bar.
    ControlBar,
    /// Feed of players, one hover overlay each.
    Overlay,
}

impl Profile {
    /// Picks the profile for a page from its hostname.
    ///
    /// Returns `None` for sites no profile supports.
    #[must_use]
    pub fn for_hostname(hostname: &str) -> Option<Self> {
        if hostname.contains("youtube.com") {
            Some(Self::ControlBar)
        } else if hostname.contains("facebook.com") {
            Some(Self::Overlay)
        } else {
            None
        }
    }

    /// Whether bindings of detached elements should be dropped.
    ///
    /// Feeds recycle their players constantly; the control bar's player lives
    /// as long as the page.
    #[must_use]
    pub const fn prunes_detached(self) -> bool {
        matches!(self, Self::Overlay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostnames_select_profiles() {
        assert_eq!(Profile::for_hostname("www.youtube.com"), Some(Profile::ControlBar));
        assert_eq!(Profile::for_hostname("m.youtube.com"), Some(Profile::ControlBar));
        assert_eq!(Profile::for_hostname("www.facebook.com"), Some(Profile::Overlay));
        assert_eq!(Profile::for_hostname("example.org"), None);
        assert_eq!(Profile::for_hostname(""), None);
    }

    #[test]
    fn only_feeds_prune() {
        assert!(Profile::Overlay.prunes_detached());
        assert!(!Profile::ControlBar.prunes_detached());
    }
}
