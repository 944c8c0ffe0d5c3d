// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Point, Rect, Size};

use crate::{GeoBounds, GeoPoint, NaturalEarth, ZoomTransform};

/// Errors from bounds computation and fitting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundsError {
    /// No finite points were supplied.
    EmptyInput,
    /// The bounds have zero extent on at least one axis, before or after projection.
    DegenerateBounds,
    /// The viewport has no usable area once the margin is removed.
    EmptyViewport,
}

impl fmt::Display for BoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "cannot compute bounds of an empty point set"),
            Self::DegenerateBounds => write!(f, "bounds have zero width or height"),
            Self::EmptyViewport => write!(f, "viewport has no area to fit into"),
        }
    }
}

impl core::error::Error for BoundsError {}

/// Computes the min/max bounds over all finite points.
pub fn compute_bounds(points: impl IntoIterator<Item = GeoPoint>) -> Result<GeoBounds, BoundsError> {
    GeoBounds::from_points(points).ok_or(BoundsError::EmptyInput)
}

/// Computes the zoom transform that fits `bounds` into a viewport.
///
/// The bounds are padded by `padding_degrees` on every side, projected through
/// `projection` at zoom scale 1, and the limiting axis of the resulting box
/// picks the scale so that it fills `1 - margin_fraction` of the viewport.
/// The translation puts the projected center of the padded bounds on the
/// viewport center.
///
/// The scale is not clamped; see [`GeoProjector::fit_bounds`](crate::GeoProjector::fit_bounds).
pub fn fit_transform(
    projection: &NaturalEarth,
    bounds: &GeoBounds,
    padding_degrees: f64,
    viewport: Size,
    margin_fraction: f64,
) -> Result<ZoomTransform, BoundsError> {
    if !(bounds.lon_span() > 0.0 && bounds.lat_span() > 0.0) {
        return Err(BoundsError::DegenerateBounds);
    }
    let margin = margin_fraction.clamp(0.0, 1.0);
    let avail_w = viewport.width * (1.0 - margin);
    let avail_h = viewport.height * (1.0 - margin);
    if !(avail_w > 0.0 && avail_h > 0.0) {
        return Err(BoundsError::EmptyViewport);
    }

    let padded = bounds.padded(padding_degrees.max(0.0));
    let screen_box = projected_box(projection, &padded);
    let (box_w, box_h) = (screen_box.width(), screen_box.height());
    if !(box_w > 0.0 && box_h > 0.0 && box_w.is_finite() && box_h.is_finite()) {
        return Err(BoundsError::DegenerateBounds);
    }

    let k = (avail_w / box_w).min(avail_h / box_h);
    let c = projection.project(padded.center());
    Ok(ZoomTransform::new(
        k,
        viewport.width * 0.5 - k * c.x,
        viewport.height * 0.5 - k * c.y,
    ))
}

/// Screen-space bounding box of geographic bounds under `projection`.
///
/// Parallels project to horizontal lines, so the corners cover the vertical
/// extent. Meridians bow outwards towards the equator, so when the bounds
/// cross it the equator points at both longitudes are included as well.
#[must_use]
pub fn projected_box(projection: &NaturalEarth, bounds: &GeoBounds) -> Rect {
    let corners = bounds.corners().map(|p| projection.project(p));
    let mut rect = Rect::from_points(corners[0], corners[1])
        .union_pt(corners[2])
        .union_pt(corners[3]);
    if bounds.straddles_equator() {
        for lon in [bounds.min_lon, bounds.max_lon] {
            let p: Point = projection.project(GeoPoint::new(lon, 0.0));
            rect = rect.union_pt(p);
        }
    }
    rect
}

/// Padding and margin policy for fitting storm bounds into a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundsCalculator {
    /// Degrees added on each side of the bounds before fitting.
    pub padding_degrees: f64,
    /// Fraction of the viewport left empty around the fitted box.
    pub margin_fraction: f64,
}

impl Default for BoundsCalculator {
    fn default() -> Self {
        Self {
            padding_degrees: 0.5,
            margin_fraction: 0.2,
        }
    }
}

impl BoundsCalculator {
    /// Creates a calculator with the given padding and margin.
    #[must_use]
    pub fn new(padding_degrees: f64, margin_fraction: f64) -> Self {
        Self {
            padding_degrees,
            margin_fraction,
        }
    }

    /// See [`compute_bounds`].
    pub fn compute_bounds(
        &self,
        points: impl IntoIterator<Item = GeoPoint>,
    ) -> Result<GeoBounds, BoundsError> {
        compute_bounds(points)
    }

    /// See [`fit_transform`].
    pub fn fit(
        &self,
        projection: &NaturalEarth,
        bounds: &GeoBounds,
        viewport: Size,
    ) -> Result<ZoomTransform, BoundsError> {
        fit_transform(
            projection,
            bounds,
            self.padding_degrees,
            viewport,
            self.margin_fraction,
        )
    }

    /// Computes bounds of `points` and fits them.
    pub fn fit_points(
        &self,
        projection: &NaturalEarth,
        points: impl IntoIterator<Item = GeoPoint>,
        viewport: Size,
    ) -> Result<ZoomTransform, BoundsError> {
        let bounds = self.compute_bounds(points)?;
        self.fit(projection, &bounds, viewport)
    }
}
