// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `setInterval` tick source.
//!
//! [`IntervalLoop`] calls a callback with the current [`HostTime`] once per
//! period until it is stopped or dropped. Discovery scans do not need frame
//! pacing, so a plain interval timer is enough.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use ratekeep_core::time::{Duration, HostTime};

// Direct global bindings instead of `web_sys::Window` methods; content
// scripts reach the same globals without fetching the Window each tick.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "setInterval")]
    fn set_interval(callback: &JsValue, millis: i32) -> i32;

    #[wasm_bindgen(js_name = "clearInterval")]
    fn clear_interval(id: i32);
}

/// A periodic `setInterval` timer that emits [`HostTime`] ticks.
///
/// Create with [`IntervalLoop::new`], then call [`start`](Self::start).
pub struct IntervalLoop {
    inner: Rc<IntervalInner>,
}

type IntervalClosure = Closure<dyn FnMut()>;

struct IntervalInner {
    /// The JS closure registered with `setInterval`.
    closure: RefCell<Option<IntervalClosure>>,

    callback: RefCell<Box<dyn FnMut(HostTime)>>,

    period: Duration,

    /// Number of callbacks delivered so far.
    ticks: Cell<u64>,

    /// The ID returned by `setInterval`, present while running.
    interval_id: Cell<Option<i32>>,
}

impl IntervalLoop {
    /// Creates a new `IntervalLoop` that is **not yet running**.
    pub fn new(callback: impl FnMut(HostTime) + 'static, period: Duration) -> Self {
        Self {
            inner: Rc::new(IntervalInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                period,
                ticks: Cell::new(0),
                interval_id: Cell::new(None),
            }),
        }
    }

    /// Starts the timer. The first callback fires one period from now.
    ///
    /// If already running, this is a no-op.
    pub fn start(&self) {
        if self.is_running() {
            return;
        }

        if self.inner.closure.borrow().is_none() {
            let inner = Rc::clone(&self.inner);
            let closure = Closure::wrap(Box::new(move || {
                if inner.interval_id.get().is_none() {
                    return;
                }
                inner.ticks.set(inner.ticks.get() + 1);
                inner.callback.borrow_mut()(crate::now());
            }) as Box<dyn FnMut()>);
            *self.inner.closure.borrow_mut() = Some(closure);
        }

        if let Some(ref closure) = *self.inner.closure.borrow() {
            let id = set_interval(closure.as_ref().unchecked_ref(), period_millis(self.inner.period));
            self.inner.interval_id.set(Some(id));
        }
    }

    /// Stops the timer. Can be restarted with [`start`](Self::start).
    pub fn stop(&self) {
        if let Some(id) = self.inner.interval_id.take() {
            clear_interval(id);
        }
    }

    /// Returns `true` if the timer is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.interval_id.get().is_some()
    }

    /// Returns the period between callbacks.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.inner.period
    }
}

impl Drop for IntervalLoop {
    fn drop(&mut self) {
        self.stop();
        // The closure holds a clone of `inner`; dropping it breaks the cycle.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for IntervalLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IntervalLoop")
            .field("running", &self.is_running())
            .field("period", &self.inner.period)
            .field("ticks", &self.inner.ticks.get())
            .finish_non_exhaustive()
    }
}

/// `setInterval` takes a signed millisecond count; longer periods saturate.
fn period_millis(period: Duration) -> i32 {
    i32::try_from(period.as_millis()).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_converts_to_millis() {
        assert_eq!(period_millis(Duration::from_millis(1000)), 1000);
        assert_eq!(period_millis(Duration::ZERO), 0);
    }

    #[test]
    fn oversized_period_saturates() {
        assert_eq!(period_millis(Duration(u64::MAX)), i32::MAX);
    }
}
