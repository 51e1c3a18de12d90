// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use alloc::vec::Vec;

use wasm_bindgen::JsValue;
use web_sys::{Document, console};

use ratekeep_core::config::RateConfig;
use ratekeep_core::host::{HostSurface, SkipReason};

use crate::console::ConsoleSink;
use crate::control::{SliderControl, element, style};
use crate::listener::{self, DomBinding, Listeners};
use crate::media::{DomMedia, query_media};

const CONTAINER_SELECTOR: &str = ".ytp-right-controls";
const WRAPPER_ID: &str = "yt-speed-wrapper";
const WRAPPER_CSS: &str = "display: flex; align-items: center; margin-right: 10px;";

/// Injects a single slider into the player's control bar.
///
/// Only the first `<video>` on the page is considered. While a wrapper from an
/// earlier mount is still in the document, further mounts are refused with
/// [`SkipReason::SlotTaken`].
#[derive(Debug)]
pub struct ControlBarSurface {
    document: Document,
    config: RateConfig,
    sink: ConsoleSink,
}

impl ControlBarSurface {
    /// Creates the surface for `document`.
    #[must_use]
    pub fn new(document: Document, config: RateConfig, sink: ConsoleSink) -> Self {
        Self {
            document,
            config,
            sink,
        }
    }

    fn build(&self, initial: f64) -> Result<SliderControl, SkipReason> {
        let container = self
            .document
            .query_selector(CONTAINER_SELECTOR)
            .ok()
            .flatten()
            .ok_or(SkipReason::NoAnchor)?;

        let mount = || -> Result<SliderControl, JsValue> {
            let wrapper = element(&self.document, "div")?;
            wrapper.set_id(WRAPPER_ID);
            style(&wrapper, WRAPPER_CSS)?;
            let control = SliderControl::build(&self.document, wrapper, &self.config, initial)?;
            container.insert_before(control.root(), container.first_child().as_ref())?;
            Ok(control)
        };
        mount().map_err(|err| {
            console::warn_2(&JsValue::from_str("[ratekeep] control bar mount failed"), &err);
            SkipReason::MountFailed
        })
    }
}

impl HostSurface for ControlBarSurface {
    type Element = DomMedia;
    type Control = SliderControl;
    type Subscription = Listeners;

    fn media_elements(&mut self) -> Vec<DomMedia> {
        let mut found = query_media(&self.document, "video");
        found.truncate(1);
        found
    }

    fn mount_control(&mut self, _element: &DomMedia, initial: f64) -> Result<SliderControl, SkipReason> {
        if self.document.get_element_by_id(WRAPPER_ID).is_some() {
            return Err(SkipReason::SlotTaken);
        }
        self.build(initial)
    }

    fn subscribe(&mut self, binding: &Rc<DomBinding>) -> Result<Listeners, SkipReason> {
        listener::subscribe(binding, self.sink)
    }
}
