// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves mapping linear progress in `[0, 1]` onto eased progress.

/// Easing function signature: maps `t` in `[0, 1]` to output in `[0, 1]`.
pub type EasingFn = fn(f64) -> f64;

/// Constant velocity.
#[inline]
#[must_use]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in-out.
#[inline]
#[must_use]
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-in-out, the default for zoom transitions.
#[inline]
#[must_use]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::{ease_in_out_cubic, ease_in_out_quad, linear};

    #[test]
    fn endpoints_are_fixed() {
        for f in [linear, ease_in_out_quad, ease_in_out_cubic] {
            assert_eq!(f(0.0), 0.0);
            assert_eq!(f(1.0), 1.0);
            assert_eq!(f(-3.0), 0.0, "clamped below");
            assert_eq!(f(7.0), 1.0, "clamped above");
        }
    }

    #[test]
    fn in_out_curves_are_symmetric_and_monotonic() {
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-12);
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < 1e-12);
        let mut last = 0.0;
        for i in 1..=100 {
            let v = ease_in_out_cubic(f64::from(i) / 100.0);
            assert!(v >= last, "cubic not monotonic at step {i}");
            last = v;
        }
        assert!(ease_in_out_cubic(0.1) < 0.1, "slow start");
        assert!(ease_in_out_cubic(0.9) > 0.9, "slow end");
    }
}
