// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Size, Vec2};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, Window, console};

use ratekeep_core::config::RateConfig;
use ratekeep_core::host::{HostSurface, SkipReason};

use crate::console::ConsoleSink;
use crate::control::{SliderControl, element};
use crate::listener::{self, DomBinding, Listeners};
use crate::media::{DomMedia, query_media};

const OVERLAY_CLASS: &str = "fb-speed-overlay";

/// Placement of feed overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Smallest ancestor box that can host an overlay. Smaller wrappers are
    /// skipped while walking up from the video.
    pub min_anchor: Size,
    /// Offset of the overlay from the anchor's bottom-right corner
    /// (`x` from the right edge, `y` from the bottom edge), in CSS pixels.
    pub inset: Vec2,
    /// Stacking order above the page's own player chrome.
    pub z_index: i32,
}

impl OverlayConfig {
    /// 100×100 minimum anchor, 12px from the right, 60px from the bottom.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            min_anchor: Size::new(100.0, 100.0),
            inset: Vec2::new(12.0, 60.0),
            z_index: 9999,
        }
    }

    /// Whether a box of `size` is large enough to anchor an overlay.
    #[must_use]
    pub fn fits(&self, size: Size) -> bool {
        size.width >= self.min_anchor.width && size.height >= self.min_anchor.height
    }

    fn css(&self) -> String {
        format!(
            "position: absolute; bottom: {}px; right: {}px; z-index: {}; \
             display: flex; align-items: center; gap: 4px; padding: 4px 8px; \
             background: rgba(0, 0, 0, 0.6); border-radius: 6px; \
             opacity: 0; transition: opacity 0.2s; pointer-events: auto;",
            self.inset.y, self.inset.x, self.z_index,
        )
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Floats a hover overlay over every `<video>` in a feed.
///
/// The overlay is appended to the nearest ancestor large enough to host it;
/// elements with no such ancestor are retried on later scans.
#[derive(Debug)]
pub struct OverlaySurface {
    window: Window,
    document: Document,
    config: RateConfig,
    overlay: OverlayConfig,
    sink: ConsoleSink,
}

impl OverlaySurface {
    /// Creates the surface for `window`'s document.
    #[must_use]
    pub fn new(
        window: Window,
        document: Document,
        config: RateConfig,
        overlay: OverlayConfig,
        sink: ConsoleSink,
    ) -> Self {
        Self {
            window,
            document,
            config,
            overlay,
            sink,
        }
    }

    /// Walks up from `media` to the first ancestor that [fits](OverlayConfig::fits).
    fn find_anchor(&self, media: &Element) -> Option<HtmlElement> {
        let mut parent = media.parent_element();
        while let Some(el) = parent {
            if let Some(html) = el.dyn_ref::<HtmlElement>() {
                let size = Size::new(
                    f64::from(html.offset_width()),
                    f64::from(html.offset_height()),
                );
                if self.overlay.fits(size) {
                    return Some(html.clone());
                }
            }
            parent = el.parent_element();
        }
        None
    }

    fn build(&self, anchor: &HtmlElement, initial: f64) -> Result<SliderControl, JsValue> {
        let root = element(&self.document, "div")?;
        root.set_class_name(OVERLAY_CLASS);
        root.set_attribute("style", &self.overlay.css())?;

        let mut control = SliderControl::build(&self.document, root.clone(), &self.config, initial)?;

        let shown = root.clone();
        control.listeners_mut().listen(anchor, "mouseenter", move |_: Event| {
            let _ = shown.style().set_property("opacity", "1");
        })?;
        let hidden = root.clone();
        control.listeners_mut().listen(anchor, "mouseleave", move |_: Event| {
            let _ = hidden.style().set_property("opacity", "0");
        })?;
        let kept = root.clone();
        control.listeners_mut().listen(&root, "mouseenter", move |_: Event| {
            let _ = kept.style().set_property("opacity", "1");
        })?;

        // Absolute positioning needs a positioned anchor.
        if let Some(computed) = self.window.get_computed_style(anchor)?
            && computed.get_property_value("position")? == "static"
        {
            anchor.style().set_property("position", "relative")?;
        }

        anchor.append_child(&root)?;
        Ok(control)
    }
}

impl HostSurface for OverlaySurface {
    type Element = DomMedia;
    type Control = SliderControl;
    type Subscription = Listeners;

    fn media_elements(&mut self) -> Vec<DomMedia> {
        query_media(&self.document, "video")
    }

    fn mount_control(&mut self, element: &DomMedia, initial: f64) -> Result<SliderControl, SkipReason> {
        let anchor = self
            .find_anchor(element.element())
            .ok_or(SkipReason::NoAnchor)?;
        self.build(&anchor, initial).map_err(|err| {
            console::warn_2(&JsValue::from_str("[ratekeep] overlay mount failed"), &err);
            SkipReason::MountFailed
        })
    }

    fn subscribe(&mut self, binding: &Rc<DomBinding>) -> Result<Listeners, SkipReason> {
        listener::subscribe(binding, self.sink)
    }
}
