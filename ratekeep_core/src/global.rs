// Copyright 2026 the Ratekeep Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page-wide desired rate.

use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;

use crate::config::RateConfig;

/// Shared handle to the rate every newly bound element is seeded with.
///
/// Clones refer to the same value. All access happens on one logical thread,
/// so a `Cell` is enough; a reader can never observe a partial write.
#[derive(Clone)]
pub struct GlobalRate {
    value: Rc<Cell<f64>>,
    min: f64,
    max: f64,
}

impl GlobalRate {
    /// Creates the global rate at [`RateConfig::DEFAULT_SPEED`], clamped into
    /// the configured band.
    #[must_use]
    pub fn new(config: &RateConfig) -> Self {
        let initial = config
            .clamp(RateConfig::DEFAULT_SPEED)
            .unwrap_or(config.min_speed);
        Self {
            value: Rc::new(Cell::new(initial)),
            min: config.min_speed,
            max: config.max_speed,
        }
    }

    /// Returns the current global rate.
    #[must_use]
    pub fn get(&self) -> f64 {
        self.value.get()
    }

    /// Stores `rate`, clamped into the configured band, and returns the value
    /// actually stored.
    ///
    /// NaN is ignored and the previous value is kept.
    pub fn set(&self, rate: f64) -> f64 {
        if !rate.is_nan() {
            self.value.set(rate.clamp(self.min, self.max));
        }
        self.value.get()
    }
}

impl fmt::Debug for GlobalRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalRate")
            .field("value", &self.value.get())
            .field("min", &self.min)
            .field("max", &self.max)
            .finish()
    }
}
