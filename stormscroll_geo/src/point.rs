// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A geographic position in degrees.
///
/// Longitude is expected in `[-180, 180]` and latitude in `[-90, 90]`, but
/// values outside those ranges are accepted; see [`GeoPoint::normalized`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoPoint {
    /// Longitude in degrees, positive east.
    pub lon: f64,
    /// Latitude in degrees, positive north.
    pub lat: f64,
}

impl GeoPoint {
    /// Creates a point from longitude and latitude in degrees.
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Returns `true` if the point lies in the valid longitude/latitude ranges.
    #[must_use]
    pub fn is_in_range(self) -> bool {
        (-180.0..=180.0).contains(&self.lon) && (-90.0..=90.0).contains(&self.lat)
    }

    /// Brings an out-of-range point back into the valid ranges.
    ///
    /// Longitudes outside `[-180, 180]` are wrapped, latitudes are clamped to
    /// `[-90, 90]`. In-range points are returned unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        let lon = if (-180.0..=180.0).contains(&self.lon) {
            self.lon
        } else {
            (self.lon + 180.0).rem_euclid(360.0) - 180.0
        };
        Self {
            lon,
            lat: self.lat.clamp(-90.0, 90.0),
        }
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self::new(lon, lat)
    }
}

/// Axis-aligned geographic bounds in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    /// Westernmost longitude.
    pub min_lon: f64,
    /// Southernmost latitude.
    pub min_lat: f64,
    /// Easternmost longitude.
    pub max_lon: f64,
    /// Northernmost latitude.
    pub max_lat: f64,
}

impl GeoBounds {
    /// Creates bounds from explicit extremes.
    ///
    /// The extremes are normalized so that `min <= max` on both axes.
    #[must_use]
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon: min_lon.min(max_lon),
            min_lat: min_lat.min(max_lat),
            max_lon: min_lon.max(max_lon),
            max_lat: min_lat.max(max_lat),
        }
    }

    /// Returns the smallest bounds enclosing all finite points, or `None` if
    /// there are none.
    pub fn from_points(points: impl IntoIterator<Item = GeoPoint>) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        for p in points.into_iter().filter(|p| p.is_finite()) {
            bounds = Some(match bounds {
                None => Self {
                    min_lon: p.lon,
                    min_lat: p.lat,
                    max_lon: p.lon,
                    max_lat: p.lat,
                },
                Some(b) => b.including(p),
            });
        }
        bounds
    }

    /// Returns these bounds grown to include `p`.
    #[must_use]
    pub fn including(self, p: GeoPoint) -> Self {
        Self {
            min_lon: self.min_lon.min(p.lon),
            min_lat: self.min_lat.min(p.lat),
            max_lon: self.max_lon.max(p.lon),
            max_lat: self.max_lat.max(p.lat),
        }
    }

    /// Longitude extent in degrees.
    #[must_use]
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Latitude extent in degrees.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Geographic midpoint of the bounds.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lon + self.max_lon) * 0.5,
            (self.min_lat + self.max_lat) * 0.5,
        )
    }

    /// Returns these bounds expanded by a constant number of degrees on every side.
    #[must_use]
    pub fn padded(&self, degrees: f64) -> Self {
        Self::new(
            self.min_lon - degrees,
            self.min_lat - degrees,
            self.max_lon + degrees,
            self.max_lat + degrees,
        )
    }

    /// Returns `true` if `p` lies inside or on the edge of the bounds.
    #[must_use]
    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.min_lon..=self.max_lon).contains(&p.lon)
            && (self.min_lat..=self.max_lat).contains(&p.lat)
    }

    /// Returns `true` if the latitude range crosses the equator.
    #[must_use]
    pub fn straddles_equator(&self) -> bool {
        self.min_lat < 0.0 && self.max_lat > 0.0
    }

    /// The four corners, counter-clockwise from the south-west corner.
    #[must_use]
    pub fn corners(&self) -> [GeoPoint; 4] {
        [
            GeoPoint::new(self.min_lon, self.min_lat),
            GeoPoint::new(self.max_lon, self.min_lat),
            GeoPoint::new(self.max_lon, self.max_lat),
            GeoPoint::new(self.min_lon, self.max_lat),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoBounds, GeoPoint};

    #[test]
    fn normalized_wraps_longitude_and_clamps_latitude() {
        let p = GeoPoint::new(190.0, 95.0).normalized();
        assert!((p.lon - -170.0).abs() < 1e-9, "lon wrapped: {}", p.lon);
        assert_eq!(p.lat, 90.0, "lat clamped");

        let q = GeoPoint::new(-200.0, -100.0).normalized();
        assert!((q.lon - 160.0).abs() < 1e-9, "lon wrapped: {}", q.lon);
        assert_eq!(q.lat, -90.0, "lat clamped");

        let in_range = GeoPoint::new(180.0, -12.5);
        assert_eq!(in_range.normalized(), in_range, "in-range points are untouched");
    }

    #[test]
    fn from_points_skips_non_finite_and_tracks_extremes() {
        let b = GeoBounds::from_points([
            GeoPoint::new(-90.0, 20.0),
            GeoPoint::new(f64::NAN, 50.0),
            GeoPoint::new(-80.0, 30.0),
        ])
        .unwrap();
        assert_eq!(b, GeoBounds::new(-90.0, 20.0, -80.0, 30.0));
        assert!(GeoBounds::from_points([]).is_none());
        assert!(GeoBounds::from_points([GeoPoint::new(f64::NAN, 0.0)]).is_none());
    }

    #[test]
    fn padding_is_constant_per_side() {
        let b = GeoBounds::new(-90.0, 20.0, -80.0, 30.0).padded(0.5);
        assert_eq!(b, GeoBounds::new(-90.5, 19.5, -79.5, 30.5));
        assert_eq!(b.center(), GeoPoint::new(-85.0, 25.0));
        assert!(!b.straddles_equator());
        assert!(GeoBounds::new(0.0, -5.0, 10.0, 5.0).straddles_equator());
    }

    #[test]
    fn new_normalizes_swapped_extremes() {
        let b = GeoBounds::new(-60.0, 30.0, -82.0, 18.0);
        assert_eq!(b.min_lon, -82.0);
        assert_eq!(b.max_lon, -60.0);
        assert_eq!(b.min_lat, 18.0);
        assert_eq!(b.max_lat, 30.0);
        assert!(b.contains(GeoPoint::new(-70.0, 20.0)));
        assert!(!b.contains(GeoPoint::new(-50.0, 20.0)));
    }
}
