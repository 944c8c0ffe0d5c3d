// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A bar chart drawer for the demo's chart section.

use kurbo::Point;
use peniko::Color;
use peniko::color::palette;
use stormscroll::ChartDrawer;
use stormscroll_sections::SectionError;
use stormscroll_surface::{PathStyle, Surface};

use crate::svg_host::CHART_SIZE;

/// Vertical bars scaled to the largest value, revealed left to right as
/// the reader scrolls.
#[derive(Clone, Debug)]
pub struct BarChart {
    bars: Vec<(String, f64)>,
    color: Color,
}

impl BarChart {
    /// A chart of `(label, value)` bars.
    pub fn new(bars: impl IntoIterator<Item = (impl Into<String>, f64)>) -> Self {
        Self {
            bars: bars.into_iter().map(|(l, v)| (l.into(), v)).collect(),
            color: palette::css::STEEL_BLUE,
        }
    }

    fn draw_bars(&self, surface: &mut dyn Surface, shown: usize) {
        let max = self.bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let slot = CHART_SIZE.width / self.bars.len() as f64;
        let base = CHART_SIZE.height - 32.0;
        for (i, (label, value)) in self.bars.iter().take(shown).enumerate() {
            let x0 = slot * i as f64 + slot * 0.15;
            let x1 = x0 + slot * 0.7;
            let top = base - (base - 16.0) * value / max;
            let rect = [
                Point::new(x0, base),
                Point::new(x0, top),
                Point::new(x1, top),
                Point::new(x1, base),
            ];
            surface.draw_path(&rect, &PathStyle::filled(self.color, None));
            surface.draw_text(Point::new(x0, base + 20.0), label, palette::css::BLACK);
        }
    }
}

impl ChartDrawer for BarChart {
    fn prepare(&mut self) -> Result<(), SectionError> {
        if self.bars.iter().all(|(_, v)| *v <= 0.0) {
            return Err(SectionError::new("bar chart has no positive values"));
        }
        Ok(())
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        self.draw_bars(surface, self.bars.len());
    }

    fn progress(&mut self, surface: &mut dyn Surface, progress: f64) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "bar counts are tiny and progress is clamped"
        )]
        let shown = (progress.clamp(0.0, 1.0) * self.bars.len() as f64).ceil() as usize;
        surface.clear();
        self.draw_bars(surface, shown);
    }
}
