// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt::Write as _;

use kurbo::Point;
use peniko::Color;

use crate::{PathStyle, RecordingSurface, Surface, SurfaceOp};

/// A recording surface that exports its current frame as SVG.
///
/// This is intended for debugging and headless runs, not pixel-perfect
/// rendering: points become `<circle>`s, paths `<path>`s, labels `<text>`,
/// and the surface opacity wraps everything in a `<g opacity>`.
#[derive(Clone, Debug)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    recording: RecordingSurface,
}

impl SvgSurface {
    /// Creates an empty surface of the given size in pixels.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            recording: RecordingSurface::new(),
        }
    }

    /// The underlying recording.
    #[must_use]
    pub fn recording(&self) -> &RecordingSurface {
        &self.recording
    }

    /// Export the ops drawn since the last clear as an SVG document.
    ///
    /// The surface size is used both as the SVG `width`/`height` attributes
    /// and as the `viewBox`.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut body = String::new();
        for op in self.recording.frame() {
            write_op(&mut body, op);
        }
        let w = fmt_f64(self.width);
        let h = fmt_f64(self.height);
        let mut out = String::new();
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
        );
        let opacity = self.recording.opacity();
        if opacity < 1.0 {
            let _ = writeln!(out, "<g opacity=\"{}\">", fmt_f64(opacity));
            out.push_str(&body);
            out.push_str("</g>\n");
        } else {
            out.push_str(&body);
        }
        out.push_str("</svg>\n");
        out
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self) {
        self.recording.clear();
    }

    fn draw_point(&mut self, at: Point, color: Color, size: f64) {
        self.recording.draw_point(at, color, size);
    }

    fn draw_path(&mut self, points: &[Point], style: &PathStyle) {
        self.recording.draw_path(points, style);
    }

    fn draw_text(&mut self, at: Point, text: &str, color: Color) {
        self.recording.draw_text(at, text, color);
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.recording.set_opacity(opacity);
    }
}

fn write_op(out: &mut String, op: &SurfaceOp) {
    match op {
        SurfaceOp::Clear | SurfaceOp::Opacity(_) => {}
        SurfaceOp::Point { at, color, size } => {
            let (fill, alpha) = color_to_svg(*color);
            let _ = write!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{fill}\"",
                fmt_f64(at.x),
                fmt_f64(at.y),
                fmt_f64(size * 0.5),
            );
            if alpha < 1.0 {
                let _ = write!(out, " fill-opacity=\"{}\"", fmt_f64(alpha));
            }
            out.push_str("/>\n");
        }
        SurfaceOp::Path { points, style } => {
            if points.is_empty() {
                return;
            }
            let _ = write!(out, "<path d=\"{}\"", polyline_to_svg_d(points, style.closed));
            match style.fill {
                Some(fill) => write_paint(out, "fill", fill),
                None => out.push_str(" fill=\"none\""),
            }
            if let Some(stroke) = style.stroke {
                write_paint(out, "stroke", stroke);
                let _ = write!(out, " stroke-width=\"{}\"", fmt_f64(style.stroke_width));
            }
            out.push_str("/>\n");
        }
        SurfaceOp::Text { at, text, color } => {
            let (fill, _) = color_to_svg(*color);
            let _ = writeln!(
                out,
                "<text x=\"{}\" y=\"{}\" fill=\"{fill}\">{}</text>",
                fmt_f64(at.x),
                fmt_f64(at.y),
                escape_text(text),
            );
        }
    }
}

fn write_paint(out: &mut String, attr: &str, color: Color) {
    let (hex, alpha) = color_to_svg(color);
    let _ = write!(out, " {attr}=\"{hex}\"");
    if alpha < 1.0 {
        let _ = write!(out, " {attr}-opacity=\"{}\"", fmt_f64(alpha));
    }
}

fn polyline_to_svg_d(points: &[Point], closed: bool) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{cmd}{} {}", fmt_f64(p.x), fmt_f64(p.y));
    }
    if closed {
        d.push('Z');
    }
    d
}

fn color_to_svg(color: Color) -> (String, f64) {
    let rgba = color.to_rgba8();
    let a = f64::from(rgba.a) / 255.0;
    (format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b), a)
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn fmt_f64(v: f64) -> String {
    // Keep output readable and stable enough for debugging.
    if !v.is_finite() {
        return format!("{v}");
    }
    if (v - v.round()).abs() < 1e-6 {
        return format!("{}", v.round());
    }
    let mut s = format!("{v:.3}");
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}
