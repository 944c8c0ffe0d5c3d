// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::Color;

/// The nine-class yellow-orange-red ramp, light to dark.
pub const YL_OR_RD: [[u8; 3]; 9] = [
    [0xff, 0xff, 0xcc],
    [0xff, 0xed, 0xa0],
    [0xfe, 0xd9, 0x76],
    [0xfe, 0xb2, 0x4c],
    [0xfd, 0x8d, 0x3c],
    [0xfc, 0x4e, 0x2a],
    [0xe3, 0x1a, 0x1c],
    [0xbd, 0x00, 0x26],
    [0x80, 0x00, 0x26],
];

/// Maps intensity values onto a sequential color ramp.
///
/// Values are normalized over `domain`, clamped to `[0, 1]`, and looked up
/// with linear interpolation between adjacent stops. Every color carries the
/// scale's alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntensityScale {
    domain: (f64, f64),
    alpha: f32,
    stops: &'static [[u8; 3]],
}

impl IntensityScale {
    /// The yellow-orange-red ramp over `domain`.
    #[must_use]
    pub fn yl_or_rd(domain: (f64, f64), alpha: f32) -> Self {
        Self {
            domain,
            alpha: alpha.clamp(0.0, 1.0),
            stops: &YL_OR_RD,
        }
    }

    /// Input domain.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Alpha applied to every color.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Position of `value` along the ramp, in `[0, 1]`.
    ///
    /// Returns `None` for NaN. A zero-width domain maps everything to 0.
    #[must_use]
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        let (d0, d1) = self.domain;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return Some(0.0);
        }
        Some(((value - d0) / span).clamp(0.0, 1.0))
    }

    /// Color for `value`, or `None` for NaN.
    #[must_use]
    pub fn color(&self, value: f64) -> Option<Color> {
        let t = self.normalize(value)?;
        let last = self.stops.len().checked_sub(1)?;
        let pos = t * last as f64;
        let i = stop_index(pos).min(last.saturating_sub(1));
        let frac = pos - i as f64;
        let a = self.stops[i];
        let b = self.stops[(i + 1).min(last)];
        let c = Color::from_rgb8(
            channel(a[0], b[0], frac),
            channel(a[1], b[1], frac),
            channel(a[2], b[2], frac),
        );
        Some(c.with_alpha(self.alpha))
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "pos is finite and within the stop count"
)]
fn stop_index(pos: f64) -> usize {
    pos.floor().max(0.0) as usize
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "value is rounded and clamped to the u8 range first"
)]
fn channel(a: u8, b: u8, t: f64) -> u8 {
    let (a, b) = (f64::from(a), f64::from(b));
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}
