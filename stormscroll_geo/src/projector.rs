// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::fit::{BoundsError, fit_transform};
use crate::{GeoBounds, GeoPoint, NaturalEarth};

/// Screen position given to points that cannot be projected.
///
/// Far enough outside any realistic viewport that culling always drops it.
pub const OFFSCREEN: Point = Point::new(-1e9, -1e9);

/// Uniform zoom transform applied on top of the base projection.
///
/// A base-projected point `p` lands on screen at `k * p + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    /// Scale factor.
    pub k: f64,
    /// Horizontal translation in pixels.
    pub x: f64,
    /// Vertical translation in pixels.
    pub y: f64,
}

impl ZoomTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// Creates a transform from scale and translation.
    #[must_use]
    pub const fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    /// Translation component.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Maps a base-projected point to the screen.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.k * p.x + self.x, self.k * p.y + self.y)
    }

    /// Maps a screen point back to base-projected space.
    #[must_use]
    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// Interpolates each field independently; `t = 0` is `self`, `t = 1` is `to`.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            k: self.k + (to.k - self.k) * t,
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }

    /// Returns this transform with its translation moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            k: self.k,
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }

    /// Returns a transform with scale `k` that keeps `anchor` fixed on screen.
    #[must_use]
    pub fn rescaled_about(&self, anchor: Point, k: f64) -> Self {
        let base = self.invert(anchor);
        Self {
            k,
            x: anchor.x - k * base.x,
            y: anchor.y - k * base.y,
        }
    }

    /// Equivalent affine transform.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.translation()) * Affine::scale(self.k)
    }

    fn is_finite(&self) -> bool {
        self.k.is_finite() && self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Allowed range for the zoom scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleExtent {
    min: f64,
    max: f64,
}

impl ScaleExtent {
    /// Creates an extent; the bounds are swapped if given in the wrong order.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Smallest allowed scale.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest allowed scale.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamps `k` into the extent.
    #[must_use]
    pub fn clamp(&self, k: f64) -> f64 {
        k.clamp(self.min, self.max)
    }

    /// Returns `true` if `k` lies inside the extent.
    #[must_use]
    pub fn contains(&self, k: f64) -> bool {
        (self.min..=self.max).contains(&k)
    }
}

impl Default for ScaleExtent {
    fn default() -> Self {
        Self::new(1.0, 8.0)
    }
}

/// Snapshot of the screen mapping handed to redraw listeners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionState {
    /// Zoom scale, always inside the projector's [`ScaleExtent`].
    pub scale: f64,
    /// Zoom translation along x.
    pub translate_x: f64,
    /// Zoom translation along y.
    pub translate_y: f64,
    /// Longitude of the base projection center.
    pub center_lon: f64,
    /// Latitude of the base projection center.
    pub center_lat: f64,
}

/// Callback invoked after every effective change of the screen mapping.
pub type RedrawListener = Box<dyn FnMut(&ProjectionState)>;

/// Natural Earth projection plus a clamped zoom transform, sized to a viewport.
///
/// The projector is the single writer-visible owner of the map's screen
/// mapping. Every change that moves points on screen bumps
/// [`GeoProjector::revision`] and calls the registered redraw listeners; calls
/// that leave the mapping unchanged do neither.
pub struct GeoProjector {
    viewport: Size,
    center: GeoPoint,
    scale_factor: f64,
    base: NaturalEarth,
    transform: ZoomTransform,
    extent: ScaleExtent,
    revision: u64,
    listeners: Vec<RedrawListener>,
}

impl GeoProjector {
    /// Creates a projector for `viewport`, centered on `center`.
    ///
    /// The base scale is `viewport.width * scale_factor` pixels per radian.
    /// The zoom transform starts at identity with the default `[1, 8]` extent.
    #[must_use]
    pub fn new(viewport: Size, center: GeoPoint, scale_factor: f64) -> Self {
        Self {
            viewport,
            center,
            scale_factor,
            base: NaturalEarth::for_viewport(center, scale_factor, viewport),
            transform: ZoomTransform::IDENTITY,
            extent: ScaleExtent::default(),
            revision: 0,
            listeners: Vec::new(),
        }
    }

    /// Replaces the scale extent, returning the projector.
    #[must_use]
    pub fn with_scale_extent(mut self, extent: ScaleExtent) -> Self {
        self.extent = extent;
        self.transform.k = extent.clamp(self.transform.k);
        self
    }

    /// Registers a listener called after every effective mapping change.
    pub fn on_redraw(&mut self, listener: RedrawListener) {
        self.listeners.push(listener);
    }

    /// Number of effective mapping changes so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current viewport size.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Current viewport as a rectangle at the origin.
    #[must_use]
    pub fn viewport_rect(&self) -> Rect {
        self.viewport.to_rect()
    }

    /// Current scale extent.
    #[must_use]
    pub fn scale_extent(&self) -> ScaleExtent {
        self.extent
    }

    /// Current zoom transform.
    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    /// The base projection, without zoom.
    #[must_use]
    pub fn base(&self) -> &NaturalEarth {
        &self.base
    }

    /// Current projection state.
    #[must_use]
    pub fn state(&self) -> ProjectionState {
        ProjectionState {
            scale: self.transform.k,
            translate_x: self.transform.x,
            translate_y: self.transform.y,
            center_lon: self.center.lon,
            center_lat: self.center.lat,
        }
    }

    /// Resizes the viewport and rebuilds the width-dependent base projection.
    ///
    /// Repeating a call with the same size changes nothing. Non-finite or
    /// negative sizes are ignored.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return;
        }
        let size = Size::new(width, height);
        if size == self.viewport {
            return;
        }
        self.viewport = size;
        self.rebuild_base();
        self.changed();
    }

    /// Moves the geographic point shown at the viewport center.
    pub fn set_center(&mut self, center: GeoPoint) {
        if !center.is_finite() {
            return;
        }
        let center = center.normalized();
        if center == self.center {
            return;
        }
        self.center = center;
        self.rebuild_base();
        self.changed();
    }

    /// Replaces the zoom transform, clamping its scale into the extent.
    ///
    /// Translation is never clamped. Non-finite fields keep their current
    /// value. Returns the transform actually in effect afterwards.
    pub fn apply_transform(&mut self, transform: ZoomTransform) -> ZoomTransform {
        let k = if transform.k.is_nan() {
            self.transform.k
        } else {
            self.extent.clamp(transform.k)
        };
        let x = if transform.x.is_finite() {
            transform.x
        } else {
            self.transform.x
        };
        let y = if transform.y.is_finite() {
            transform.y
        } else {
            self.transform.y
        };
        let next = ZoomTransform { k, x, y };
        if next != self.transform {
            self.transform = next;
            self.changed();
        }
        self.transform
    }

    /// Zooms by `factor` keeping the screen point `anchor` fixed.
    ///
    /// The resulting scale is clamped; non-positive factors are ignored.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) -> ZoomTransform {
        if !(factor.is_finite() && factor > 0.0) {
            return self.transform;
        }
        let k = self.extent.clamp(self.transform.k * factor);
        self.apply_transform(self.transform.rescaled_about(anchor, k))
    }

    /// Pans by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vec2) -> ZoomTransform {
        if delta == Vec2::ZERO {
            return self.transform;
        }
        self.apply_transform(self.transform.translated(delta))
    }

    /// Projects a geographic point to the screen.
    ///
    /// Never fails. Out-of-range longitudes wrap and latitudes clamp;
    /// non-finite input yields [`OFFSCREEN`]. Callers cull with
    /// [`GeoProjector::is_visible`] before drawing.
    #[must_use]
    pub fn project(&self, p: GeoPoint) -> Point {
        if !p.is_finite() {
            return OFFSCREEN;
        }
        let screen = self.transform.apply(self.base.project(p.normalized()));
        if screen.is_finite() { screen } else { OFFSCREEN }
    }

    /// Maps a screen point back to geographic coordinates.
    #[must_use]
    pub fn invert(&self, screen: Point) -> Option<GeoPoint> {
        if !screen.is_finite() {
            return None;
        }
        self.base.invert(self.transform.invert(screen))
    }

    /// Culling test: inclusive containment in the viewport.
    #[must_use]
    pub fn is_visible(&self, screen: Point) -> bool {
        screen.is_finite()
            && (0.0..=self.viewport.width).contains(&screen.x)
            && (0.0..=self.viewport.height).contains(&screen.y)
    }

    /// Computes the transform fitting `bounds` into the viewport.
    ///
    /// The fitted scale is clamped into the extent and the translation is
    /// recomputed so the padded bounds' center still lands on the viewport
    /// center. The projector itself is not changed.
    pub fn fit_bounds(
        &self,
        bounds: &GeoBounds,
        padding_degrees: f64,
        margin_fraction: f64,
    ) -> Result<ZoomTransform, BoundsError> {
        let fitted = fit_transform(
            &self.base,
            bounds,
            padding_degrees,
            self.viewport,
            margin_fraction,
        )?;
        if self.extent.contains(fitted.k) {
            return Ok(fitted);
        }
        Ok(self.transform_centered_on(bounds.padded(padding_degrees).center(), fitted.k))
    }

    /// Computes the transform with (clamped) scale `k` that puts `point` at
    /// the viewport center.
    #[must_use]
    pub fn transform_centered_on(&self, point: GeoPoint, k: f64) -> ZoomTransform {
        let k = self.extent.clamp(k);
        let c = self.base.project(point.normalized());
        ZoomTransform {
            k,
            x: self.viewport.width * 0.5 - k * c.x,
            y: self.viewport.height * 0.5 - k * c.y,
        }
    }

    fn rebuild_base(&mut self) {
        self.base = NaturalEarth::for_viewport(self.center, self.scale_factor, self.viewport);
    }

    fn changed(&mut self) {
        debug_assert!(self.transform.is_finite(), "zoom transform must stay finite");
        self.revision += 1;
        let state = self.state();
        for listener in &mut self.listeners {
            listener(&state);
        }
    }
}

impl fmt::Debug for GeoProjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoProjector")
            .field("viewport", &self.viewport)
            .field("center", &self.center)
            .field("scale_factor", &self.scale_factor)
            .field("transform", &self.transform)
            .field("extent", &self.extent)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use kurbo::{Point, Size, Vec2};

    use super::{GeoProjector, OFFSCREEN, ScaleExtent, ZoomTransform};
    use crate::GeoPoint;

    fn map() -> GeoProjector {
        GeoProjector::new(Size::new(800.0, 500.0), GeoPoint::new(-82.0, 27.0), 1.3)
    }

    #[test]
    fn center_projects_to_viewport_center() {
        let p = map().project(GeoPoint::new(-82.0, 27.0));
        assert!((p.x - 400.0).abs() < 1e-9);
        assert!((p.y - 250.0).abs() < 1e-9);
    }

    #[test]
    fn apply_transform_clamps_scale_but_not_translation() {
        let mut proj = map();
        let t = proj.apply_transform(ZoomTransform::new(20.0, -5000.0, 9000.0));
        assert_eq!(t, ZoomTransform::new(8.0, -5000.0, 9000.0));
        let t = proj.apply_transform(ZoomTransform::new(0.1, 1.0, 2.0));
        assert_eq!(t.k, 1.0);
        assert_eq!(proj.state().scale, 1.0);
        assert_eq!(proj.state().translate_x, 1.0);
    }

    #[test]
    fn nan_scale_keeps_current() {
        let mut proj = map();
        proj.apply_transform(ZoomTransform::new(3.0, 0.0, 0.0));
        let t = proj.apply_transform(ZoomTransform::new(f64::NAN, 1.0, f64::INFINITY));
        assert_eq!(t, ZoomTransform::new(3.0, 1.0, 0.0));
    }

    #[test]
    fn redraw_listeners_fire_only_on_effective_changes() {
        let mut proj = map();
        let calls = Rc::new(Cell::new(0_u32));
        let seen = Rc::clone(&calls);
        proj.on_redraw(Box::new(move |_| seen.set(seen.get() + 1)));

        proj.set_viewport(800.0, 500.0);
        assert_eq!(calls.get(), 0, "same viewport is a no-op");
        proj.set_viewport(640.0, 480.0);
        assert_eq!(calls.get(), 1);
        proj.apply_transform(ZoomTransform::IDENTITY);
        assert_eq!(calls.get(), 1, "identity was already in effect");
        proj.apply_transform(ZoomTransform::new(2.0, 0.0, 0.0));
        assert_eq!(calls.get(), 2);
        proj.apply_transform(ZoomTransform::new(50.0, 0.0, 0.0));
        proj.apply_transform(ZoomTransform::new(60.0, 0.0, 0.0));
        assert_eq!(calls.get(), 3, "both requests clamp to the same scale");
        assert_eq!(proj.revision(), 3);
    }

    #[test]
    fn non_finite_points_go_offscreen() {
        let proj = map();
        assert_eq!(proj.project(GeoPoint::new(f64::NAN, 10.0)), OFFSCREEN);
        assert!(!proj.is_visible(OFFSCREEN));
    }

    #[test]
    fn out_of_range_points_are_best_effort() {
        let proj = map();
        let wrapped = proj.project(GeoPoint::new(-82.0 + 360.0, 27.0));
        let direct = proj.project(GeoPoint::new(-82.0, 27.0));
        assert!((wrapped.x - direct.x).abs() < 1e-6);
        let polar = proj.project(GeoPoint::new(-82.0, 140.0));
        assert!(polar.is_finite());
    }

    #[test]
    fn invert_undoes_zoom_and_projection() {
        let mut proj = map();
        proj.apply_transform(ZoomTransform::new(4.0, -1200.0, -700.0));
        let geo = GeoPoint::new(-89.98, 29.28);
        let back = proj.invert(proj.project(geo)).unwrap();
        assert!((back.lon - geo.lon).abs() < 1e-6);
        assert!((back.lat - geo.lat).abs() < 1e-6);
    }

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let mut proj = map();
        let anchor = Point::new(300.0, 200.0);
        let before = proj.invert(anchor).unwrap();
        proj.zoom_about(anchor, 2.0);
        assert_eq!(proj.transform().k, 2.0);
        let after = proj.project(before);
        assert!((after.x - anchor.x).abs() < 1e-6);
        assert!((after.y - anchor.y).abs() < 1e-6);

        proj.zoom_about(anchor, 100.0);
        assert_eq!(proj.transform().k, 8.0, "clamped to the extent");
        let before = proj.transform();
        proj.zoom_about(anchor, -1.0);
        assert_eq!(proj.transform(), before, "non-positive factors are ignored");
    }

    #[test]
    fn pan_moves_translation_freely() {
        let mut proj = map();
        proj.pan_by(Vec2::new(-10_000.0, 25.0));
        assert_eq!(proj.transform(), ZoomTransform::new(1.0, -10_000.0, 25.0));
    }

    #[test]
    fn visibility_is_inclusive() {
        let proj = map();
        assert!(proj.is_visible(Point::new(0.0, 0.0)));
        assert!(proj.is_visible(Point::new(800.0, 500.0)));
        assert!(!proj.is_visible(Point::new(800.1, 10.0)));
        assert!(!proj.is_visible(Point::new(10.0, -0.1)));
    }

    #[test]
    fn set_center_shifts_the_map() {
        let mut proj = map();
        proj.set_center(GeoPoint::new(-79.0, 27.0));
        let p = proj.project(GeoPoint::new(-79.0, 27.0));
        assert!((p.x - 400.0).abs() < 1e-9);
        assert_eq!(proj.state().center_lon, -79.0);
        assert_eq!(proj.revision(), 1);
    }

    #[test]
    fn extent_is_normalized_and_applied() {
        let proj = map().with_scale_extent(ScaleExtent::new(8.0, 2.0));
        assert_eq!(proj.scale_extent().min(), 2.0);
        assert_eq!(proj.transform().k, 2.0);
    }

    #[test]
    fn transform_lerp_and_affine_agree() {
        let a = ZoomTransform::IDENTITY;
        let b = ZoomTransform::new(4.0, -100.0, 40.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), ZoomTransform::new(2.5, -50.0, 20.0));
        let p = Point::new(3.0, 7.0);
        assert_eq!(b.to_affine() * p, b.apply(p));
        assert_eq!(b.invert(b.apply(p)), p);
    }
}
