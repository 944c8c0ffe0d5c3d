// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use peniko::Color;

use crate::{PathStyle, Surface};

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// [`Surface::clear`].
    Clear,
    /// [`Surface::draw_point`].
    Point {
        /// Center.
        at: Point,
        /// Fill color.
        color: Color,
        /// Diameter.
        size: f64,
    },
    /// [`Surface::draw_path`].
    Path {
        /// Vertices.
        points: Vec<Point>,
        /// Stroke and fill.
        style: PathStyle,
    },
    /// [`Surface::draw_text`].
    Text {
        /// Anchor.
        at: Point,
        /// Label text.
        text: String,
        /// Text color.
        color: Color,
    },
    /// [`Surface::set_opacity`].
    Opacity(f64),
}

/// A surface that records every call.
///
/// Useful in tests to assert on emitted ops, and as the storage behind
/// [`SvgSurface`](crate::SvgSurface).
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    frame_start: usize,
    clears: usize,
    opacity: f64,
}

impl RecordingSurface {
    /// Creates an empty, fully opaque surface.
    #[must_use]
    pub fn new() -> Self {
        Self {
            opacity: 1.0,
            ..Self::default()
        }
    }

    /// Every op recorded so far.
    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Ops recorded since the last clear.
    #[must_use]
    pub fn frame(&self) -> &[SurfaceOp] {
        &self.ops[self.frame_start..]
    }

    /// Points drawn since the last clear.
    pub fn frame_points(&self) -> impl Iterator<Item = (Point, Color, f64)> + '_ {
        self.frame().iter().filter_map(|op| match op {
            SurfaceOp::Point { at, color, size } => Some((*at, *color, *size)),
            _ => None,
        })
    }

    /// Text labels drawn since the last clear.
    pub fn frame_texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.frame().iter().filter_map(|op| match op {
            SurfaceOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of clears so far.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    /// Most recently set opacity.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Forgets all recorded ops, keeping opacity.
    pub fn reset(&mut self) {
        self.ops.clear();
        self.frame_start = 0;
        self.clears = 0;
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.clears += 1;
        self.ops.push(SurfaceOp::Clear);
        self.frame_start = self.ops.len();
    }

    fn draw_point(&mut self, at: Point, color: Color, size: f64) {
        self.ops.push(SurfaceOp::Point { at, color, size });
    }

    fn draw_path(&mut self, points: &[Point], style: &PathStyle) {
        self.ops.push(SurfaceOp::Path {
            points: points.to_vec(),
            style: *style,
        });
    }

    fn draw_text(&mut self, at: Point, text: &str, color: Color) {
        self.ops.push(SurfaceOp::Text {
            at,
            text: text.to_owned(),
            color,
        });
    }

    fn set_opacity(&mut self, opacity: f64) {
        let opacity = opacity.clamp(0.0, 1.0);
        self.opacity = opacity;
        self.ops.push(SurfaceOp::Opacity(opacity));
    }
}
