// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, recording, and Chrome trace export for ratekeep
//! diagnostics.
//!
//! This crate provides [`TraceSink`](ratekeep_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: Human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: In-memory event log for assertions and
//!   export.
//! - [`chrome::export`]: Writes Chrome Trace Event Format JSON from a
//!   recording.

pub mod chrome;
pub mod pretty;
pub mod recorder;
