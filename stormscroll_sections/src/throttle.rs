// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Drops progress updates that moved less than a minimum step.
///
/// Progress arrives every animation frame; sections that do real work per
/// update pass it through a throttle first. `0.0` and `1.0` always pass so a
/// section can settle exactly at either end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressThrottle {
    step: f64,
    last: Option<f64>,
}

impl ProgressThrottle {
    /// Creates a throttle admitting changes of at least `step`.
    #[must_use]
    pub fn new(step: f64) -> Self {
        Self {
            step: step.max(0.0),
            last: None,
        }
    }

    /// Last admitted value.
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.last
    }

    /// Returns the clamped progress if it should be processed.
    pub fn admit(&mut self, progress: f64) -> Option<f64> {
        if progress.is_nan() {
            return None;
        }
        let p = progress.clamp(0.0, 1.0);
        let endpoint = p == 0.0 || p == 1.0;
        let moved = self.last.is_none_or(|last| (p - last).abs() >= self.step);
        if endpoint || moved {
            self.last = Some(p);
            Some(p)
        } else {
            None
        }
    }

    /// Forgets the last admitted value, e.g. when the section is re-entered.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
