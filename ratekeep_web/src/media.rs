// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM media element handle.

use alloc::string::String;
use alloc::vec::Vec;

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlMediaElement};

use ratekeep_core::media::MediaElement;

/// A `<video>` or `<audio>` element in the live document.
///
/// Cloning is cheap; every clone refers to the same DOM node, so attribute
/// markers written through one clone are seen by all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomMedia {
    element: HtmlMediaElement,
}

impl DomMedia {
    /// Wraps a media element.
    #[must_use]
    pub fn new(element: HtmlMediaElement) -> Self {
        Self { element }
    }

    /// Returns the underlying DOM element.
    #[must_use]
    pub fn element(&self) -> &HtmlMediaElement {
        &self.element
    }
}

impl MediaElement for DomMedia {
    fn playback_rate(&self) -> f64 {
        self.element.playback_rate()
    }

    fn set_playback_rate(&self, rate: f64) {
        self.element.set_playback_rate(rate);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        // Only fails for invalid attribute names, and ours are constants.
        let _ = self.element.set_attribute(name, value);
    }

    fn remove_attribute(&self, name: &str) {
        let _ = self.element.remove_attribute(name);
    }

    fn is_connected(&self) -> bool {
        self.element.is_connected()
    }
}

/// Returns every element matching `selector` that is a media element, in
/// document order.
pub(crate) fn query_media(document: &Document, selector: &str) -> Vec<DomMedia> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|idx| list.get(idx))
        .filter_map(|node| node.dyn_into::<HtmlMediaElement>().ok())
        .map(DomMedia::new)
        .collect()
}
