// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The speed slider widget.
//!
//! A [`SliderControl`] is a range input plus a text readout, appended to a
//! root element the surface positions. Clicks and presses on the slider stop
//! propagating so the page's own player does not react to them (toggling
//! playback, opening the post, and so on).

use alloc::format;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement};

use ratekeep_core::config::RateConfig;
use ratekeep_core::control::{ControlView, format_rate};

use crate::listener::Listeners;

const THUMB_STYLE_ID: &str = "custom-slider-style";
const SLIDER_CLASS: &str = "ratekeep-slider";

const THUMB_CSS: &str = "\
.ratekeep-slider::-webkit-slider-thumb {
  -webkit-appearance: none;
  appearance: none;
  width: 12px;
  height: 12px;
  border-radius: 50%;
  background: white;
  cursor: pointer;
}
.ratekeep-slider::-moz-range-thumb {
  width: 12px;
  height: 12px;
  border: none;
  border-radius: 50%;
  background: white;
  cursor: pointer;
}";

const SLIDER_CSS: &str = "width: 80px; height: 4px; margin: 0 4px; cursor: pointer; \
     -webkit-appearance: none; appearance: none; background: rgba(255, 255, 255, 0.4); \
     border-radius: 2px; outline: none;";

const DISPLAY_CSS: &str = "color: white; font: 13px/1 sans-serif; min-width: 40px; \
     text-align: right; user-select: none;";

/// A range slider with a `"1.50x"` style readout.
///
/// Dropping the control removes its root element from the document along
/// with every listener it owns.
pub struct SliderControl {
    root: HtmlElement,
    input: HtmlInputElement,
    display: HtmlElement,
    listeners: Listeners,
}

impl SliderControl {
    /// Builds the slider inside `root`, showing `initial`.
    ///
    /// `root` is not attached anywhere by this call.
    pub(crate) fn build(
        document: &Document,
        root: HtmlElement,
        config: &RateConfig,
        initial: f64,
    ) -> Result<Self, JsValue> {
        ensure_thumb_style(document)?;

        let display = element(document, "span")?;
        style(&display, DISPLAY_CSS)?;
        display.set_text_content(Some(&format_rate(initial)));

        let input: HtmlInputElement = document.create_element("input")?.unchecked_into();
        input.set_type("range");
        input.set_min(&format!("{}", config.min_speed));
        input.set_max(&format!("{}", config.max_speed));
        input.set_step(&format!("{}", config.step));
        input.set_value(&format!("{initial}"));
        input.set_title("Adjust Playback Speed");
        input.set_class_name(SLIDER_CLASS);
        style(&input, SLIDER_CSS)?;

        root.append_child(&display)?;
        root.append_child(&input)?;

        let mut listeners = Listeners::new();
        listeners.listen(&input, "click", |event: Event| event.stop_propagation())?;
        listeners.listen(&input, "mousedown", |event: Event| event.stop_propagation())?;

        Ok(Self {
            root,
            input,
            display,
            listeners,
        })
    }

    /// The element the surface attached to the page.
    #[must_use]
    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    /// The range input.
    #[must_use]
    pub fn input(&self) -> &HtmlInputElement {
        &self.input
    }

    /// Listeners that live and die with this control.
    pub(crate) fn listeners_mut(&mut self) -> &mut Listeners {
        &mut self.listeners
    }
}

impl ControlView for SliderControl {
    fn show(&self, rate: f64) {
        self.input.set_value(&format!("{rate}"));
        self.display.set_text_content(Some(&format_rate(rate)));
    }
}

impl Drop for SliderControl {
    fn drop(&mut self) {
        self.root.remove();
    }
}

impl core::fmt::Debug for SliderControl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SliderControl")
            .field("value", &self.input.value())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

/// Adds the thumb stylesheet to `<head>` unless an earlier control did.
fn ensure_thumb_style(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id(THUMB_STYLE_ID).is_some() {
        return Ok(());
    }
    let Some(head) = document.head() else {
        return Ok(());
    };
    let sheet = document.create_element("style")?;
    sheet.set_id(THUMB_STYLE_ID);
    sheet.set_text_content(Some(THUMB_CSS));
    head.append_child(&sheet)?;
    Ok(())
}

pub(crate) fn element(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    Ok(document.create_element(tag)?.unchecked_into())
}

pub(crate) fn style(el: &Element, css: &str) -> Result<(), JsValue> {
    el.set_attribute("style", css)
}
