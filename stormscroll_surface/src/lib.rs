// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stormscroll Surface: the drawing seam between the story and a renderer.
//!
//! The map and the storm viewers draw through the small [`Surface`] trait:
//! points, polylines, text labels, a clear, and a whole-surface opacity.
//! What backs a surface (a canvas, a scene graph, a file) is up to the host.
//!
//! Two implementations ship here:
//! - [`RecordingSurface`] keeps every call as a [`SurfaceOp`] so tests can
//!   assert on exactly what was drawn.
//! - [`SvgSurface`] records the same way and exports the current frame as an
//!   SVG document for debugging and headless runs.
//!
//! ```rust
//! use kurbo::Point;
//! use peniko::Color;
//! use stormscroll_surface::{PathStyle, Surface, SvgSurface};
//!
//! let mut svg = SvgSurface::new(290.0, 400.0);
//! svg.clear();
//! svg.draw_point(Point::new(10.0, 20.0), Color::from_rgba8(255, 0, 0, 128), 1.5);
//! svg.draw_path(
//!     &[Point::new(0.0, 0.0), Point::new(50.0, 40.0)],
//!     &PathStyle::stroke(Color::from_rgba8(0, 0, 0, 255), 2.0),
//! );
//! let doc = svg.to_svg();
//! assert!(doc.contains("<circle"));
//! assert!(doc.contains("<path"));
//! ```

mod recording;
mod svg;

use kurbo::Point;
use peniko::Color;

pub use recording::{RecordingSurface, SurfaceOp};
pub use svg::SvgSurface;

/// Stroke and fill for [`Surface::draw_path`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathStyle {
    /// Stroke color, if stroked.
    pub stroke: Option<Color>,
    /// Stroke width in pixels.
    pub stroke_width: f64,
    /// Fill color, if filled.
    pub fill: Option<Color>,
    /// Whether the last point connects back to the first.
    pub closed: bool,
}

impl PathStyle {
    /// An open polyline stroked with `color`.
    #[must_use]
    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            fill: None,
            closed: false,
        }
    }

    /// A closed shape filled with `fill` and optionally outlined.
    #[must_use]
    pub fn filled(fill: Color, outline: Option<(Color, f64)>) -> Self {
        Self {
            stroke: outline.map(|(c, _)| c),
            stroke_width: outline.map_or(0.0, |(_, w)| w),
            fill: Some(fill),
            closed: true,
        }
    }
}

/// Something the story can draw into.
///
/// Callers cull off-screen points themselves before calling
/// [`Surface::draw_point`].
pub trait Surface {
    /// Removes everything drawn so far.
    fn clear(&mut self);

    /// Draws a filled circle of diameter `size` centered on `at`.
    fn draw_point(&mut self, at: Point, color: Color, size: f64);

    /// Draws a polyline or polygon through `points`.
    fn draw_path(&mut self, points: &[Point], style: &PathStyle);

    /// Draws a text label anchored at `at`.
    fn draw_text(&mut self, at: Point, text: &str, color: Color) {
        let _ = (at, text, color);
    }

    /// Sets the opacity of the whole surface, in `[0, 1]`.
    fn set_opacity(&mut self, opacity: f64) {
        let _ = opacity;
    }
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn draw_point(&mut self, at: Point, color: Color, size: f64) {
        (**self).draw_point(at, color, size);
    }

    fn draw_path(&mut self, points: &[Point], style: &PathStyle) {
        (**self).draw_path(points, style);
    }

    fn draw_text(&mut self, at: Point, text: &str, color: Color) {
        (**self).draw_text(at, text, color);
    }

    fn set_opacity(&mut self, opacity: f64) {
        (**self).set_opacity(opacity);
    }
}
