// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for ratekeep.
//!
//! This crate runs as a content script compiled to WebAssembly:
//!
//! - [`IntervalLoop`]: `setInterval` tick source for discovery scans
//! - [`DomMedia`]: media element handle over `HtmlMediaElement`
//! - [`SliderControl`]: range slider with a rate readout
//! - [`ControlBarSurface`], [`OverlaySurface`]: the two site profiles
//! - [`ConsoleSink`]: trace output to the browser console
//!
//! [`start`] is the module entry point: it picks a [`Profile`] from the
//! page's hostname and leaves a discovery loop running for the life of the
//! page.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "browser entry paths only run on wasm32")
)]

extern crate alloc;

mod console;
mod control;
mod interval;
mod listener;
mod media;
mod surface;

pub use console::ConsoleSink;
pub use control::SliderControl;
pub use interval::IntervalLoop;
pub use listener::{DomBinding, Listeners};
pub use media::DomMedia;
pub use surface::{ControlBarSurface, OverlayConfig, OverlaySurface, Profile};

use wasm_bindgen::prelude::*;

use ratekeep_core::config::RateConfig;
use ratekeep_core::discovery::DiscoveryLoop;
use ratekeep_core::global::GlobalRate;
use ratekeep_core::host::HostSurface;
use ratekeep_core::time::HostTime;
use ratekeep_core::trace::Tracer;

/// Returns the current host time from `performance.now()`, in microseconds.
#[must_use]
pub fn now() -> HostTime {
    let ms = interval::performance_now();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

/// Module entry point.
///
/// Does nothing on sites without a profile. Otherwise starts the scan timer
/// and leaks it, so enforcement lasts as long as the page.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;
    let hostname = window.location().hostname()?;
    let Some(profile) = Profile::for_hostname(&hostname) else {
        return Ok(());
    };

    let config = RateConfig::standard().with_pruning(profile.prunes_detached());
    let sink = ConsoleSink::new();
    let ticker = match profile {
        Profile::ControlBar => run(ControlBarSurface::new(document, config, sink), config, sink),
        Profile::Overlay => run(
            OverlaySurface::new(window, document, config, OverlayConfig::standard(), sink),
            config,
            sink,
        ),
    };
    core::mem::forget(ticker);
    Ok(())
}

fn run<H: HostSurface + 'static>(host: H, config: RateConfig, sink: ConsoleSink) -> IntervalLoop {
    let mut discovery = DiscoveryLoop::new(host, GlobalRate::new(&config), config);
    let ticker = IntervalLoop::new(
        move |now| {
            let mut sink = sink;
            discovery.tick(now, &mut Tracer::new(&mut sink));
        },
        config.poll_interval,
    );
    ticker.start();
    ticker
}
