// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Discovery, binding, and rate enforcement for media elements on live pages.
//!
//! `ratekeep_core` keeps a user-chosen playback rate in force on every media
//! element of a dynamically changing page, even when page scripts reset it.
//! It is `no_std` compatible (with `alloc`) and knows nothing about any
//! particular page: hosts plug in through the [`host::HostSurface`] trait.
//!
//! # Architecture
//!
//! A host tick source drives a periodic scan; bindings then react to user
//! input and element notifications between scans:
//!
//! ```text
//!   Backend (tick source)
//!       │
//!       ▼
//!   DiscoveryLoop::tick() ──► HostSurface::media_elements()
//!       │
//!       ▼
//!   binder::bind() ──► HostSurface::mount_control() ──► Binding
//!                                                         │
//!        ┌──────────── HostSurface::subscribe() ◄─────────┘
//!        ▼
//!   control input ──► Binding::set_rate() ──► GlobalRate + target
//!   element event ──► Binding::on_event() ──► enforce::reconcile()
//! ```
//!
//! **[`discovery`]**: The scan loop. Binds each element exactly once and
//! retries elements the host cannot place a control for yet.
//!
//! **[`marker`]**: Durable per-element state: the bound marker and the
//! target rate, stored as element attributes.
//!
//! **[`global`]**: The page-wide rate new elements are seeded with.
//!
//! **[`binder`]**: Attaches a control to one element and handles its input.
//!
//! **[`enforce`]**: Drift detection and correction.
//!
//! **[`host`]**: The [`HostSurface`](host::HostSurface) trait that platform
//! backends implement.
//!
//! **[`media`]**, **[`control`]**: The element and control seams.
//!
//! **[`config`]**: Rate bounds, step, tolerance, and poll interval.
//!
//! **[`time`]**: Microsecond host time.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `sim` (disabled by default): Exposes the in-memory host doubles in
//!   [`sim`](crate::sim).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod binder;
pub mod config;
pub mod control;
pub mod discovery;
pub mod enforce;
pub mod global;
pub mod host;
pub mod marker;
pub mod media;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod time;
pub mod trace;
