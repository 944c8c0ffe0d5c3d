// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Natural Earth I base projection.

use kurbo::{Point, Size};

use crate::GeoPoint;

const EPSILON: f64 = 1e-6;
const INVERT_ITERATIONS: usize = 25;

/// Forward Natural Earth I mapping from radians to unscaled plane coordinates.
///
/// `y` grows northwards here; the screen flip happens in [`NaturalEarth`].
#[must_use]
pub fn natural_earth_raw(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda
        * (0.8707 - 0.131979 * phi2
            + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi
        * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    (x, y)
}

/// Inverse of [`natural_earth_raw`], solving for latitude by Newton iteration.
///
/// Returns `None` if the iteration does not produce a finite result.
#[must_use]
pub fn natural_earth_raw_invert(x: f64, y: f64) -> Option<(f64, f64)> {
    let mut phi = y;
    for _ in 0..INVERT_ITERATIONS {
        let phi2 = phi * phi;
        let phi4 = phi2 * phi2;
        let value = phi
            * (1.007226
                + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)))
            - y;
        let slope = 1.007226
            + phi2
                * (0.015085 * 3.0
                    + phi4 * (-0.044475 * 7.0 + 0.028874 * 9.0 * phi2 - 0.005916 * 11.0 * phi4));
        let delta = value / slope;
        phi -= delta;
        if delta.abs() <= EPSILON {
            break;
        }
    }
    let phi2 = phi * phi;
    let lambda = x
        / (0.8707
            + phi2 * (-0.131979 + phi2 * (-0.013791 + phi2 * phi2 * phi2 * (0.003971 - 0.001529 * phi2))));
    (lambda.is_finite() && phi.is_finite()).then_some((lambda, phi))
}

/// Natural Earth I projection positioned in a viewport.
///
/// The projection maps its `center` to `translate` and multiplies the raw
/// radian plane by `scale` pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NaturalEarth {
    center: GeoPoint,
    scale: f64,
    translate: Point,
    center_raw: (f64, f64),
}

impl NaturalEarth {
    /// Creates a projection centered on `center`, with `scale` pixels per
    /// radian, whose center lands on `translate`.
    #[must_use]
    pub fn new(center: GeoPoint, scale: f64, translate: Point) -> Self {
        let center_raw = natural_earth_raw(center.lon.to_radians(), center.lat.to_radians());
        Self {
            center,
            scale,
            translate,
            center_raw,
        }
    }

    /// Creates the projection for a viewport of `size`.
    ///
    /// The scale is `size.width * scale_factor` and the center lands in the
    /// middle of the viewport.
    #[must_use]
    pub fn for_viewport(center: GeoPoint, scale_factor: f64, size: Size) -> Self {
        Self::new(
            center,
            size.width * scale_factor,
            Point::new(size.width * 0.5, size.height * 0.5),
        )
    }

    /// The geographic point that maps to [`NaturalEarth::translate`].
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Pixels per radian.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Screen position of the center.
    #[must_use]
    pub fn translate(&self) -> Point {
        self.translate
    }

    /// Projects a geographic point. The result may be non-finite for
    /// non-finite input; no normalization is performed here.
    #[must_use]
    pub fn project(&self, p: GeoPoint) -> Point {
        let (rx, ry) = natural_earth_raw(p.lon.to_radians(), p.lat.to_radians());
        Point::new(
            self.translate.x + self.scale * (rx - self.center_raw.0),
            self.translate.y - self.scale * (ry - self.center_raw.1),
        )
    }

    /// Maps a screen point back to geographic coordinates.
    #[must_use]
    pub fn invert(&self, p: Point) -> Option<GeoPoint> {
        if self.scale == 0.0 {
            return None;
        }
        let rx = (p.x - self.translate.x) / self.scale + self.center_raw.0;
        let ry = (self.translate.y - p.y) / self.scale + self.center_raw.1;
        let (lambda, phi) = natural_earth_raw_invert(rx, ry)?;
        let geo = GeoPoint::new(lambda.to_degrees(), phi.to_degrees());
        geo.is_in_range().then_some(geo)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size};

    use super::{NaturalEarth, natural_earth_raw, natural_earth_raw_invert};
    use crate::GeoPoint;

    #[test]
    fn raw_origin_is_fixed() {
        assert_eq!(natural_earth_raw(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn raw_invert_recovers_input() {
        for &(lambda, phi) in &[(0.3, 0.4), (-1.4, 0.1), (2.5, -1.2), (-0.02, 0.9)] {
            let (x, y) = natural_earth_raw(lambda, phi);
            let (l2, p2) = natural_earth_raw_invert(x, y).unwrap();
            assert!((l2 - lambda).abs() < 1e-6, "lambda {lambda} vs {l2}");
            assert!((p2 - phi).abs() < 1e-6, "phi {phi} vs {p2}");
        }
    }

    #[test]
    fn center_maps_to_translate() {
        let proj = NaturalEarth::for_viewport(
            GeoPoint::new(-82.0, 27.0),
            1.3,
            Size::new(800.0, 500.0),
        );
        let c = proj.project(GeoPoint::new(-82.0, 27.0));
        assert!((c.x - 400.0).abs() < 1e-9 && (c.y - 250.0).abs() < 1e-9);
        assert_eq!(proj.scale(), 1040.0);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let proj = NaturalEarth::new(GeoPoint::new(0.0, 0.0), 100.0, Point::new(0.0, 0.0));
        let north = proj.project(GeoPoint::new(0.0, 10.0));
        let east = proj.project(GeoPoint::new(10.0, 0.0));
        assert!(north.y < 0.0, "north projects above the center");
        assert!(east.x > 0.0, "east projects right of the center");
    }

    #[test]
    fn invert_round_trips_screen_points() {
        let proj = NaturalEarth::for_viewport(
            GeoPoint::new(-82.0, 27.0),
            1.3,
            Size::new(800.0, 500.0),
        );
        let geo = GeoPoint::new(-97.0, 28.0);
        let back = proj.invert(proj.project(geo)).unwrap();
        assert!((back.lon - geo.lon).abs() < 1e-6);
        assert!((back.lat - geo.lat).abs() < 1e-6);
        assert!(proj.invert(Point::new(1e7, 1e7)).is_none());
    }
}
