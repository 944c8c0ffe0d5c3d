// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coarse land outlines around the Gulf of Mexico and synthetic heat
//! tables for every catalog storm.

use stormscroll::LandShape;
use stormscroll_geo::{GeoBounds, GeoPoint};
use stormscroll_tracks::{HeatRecord, MemoryTableSource, StormId, TrackSource};

const GULF_COAST: &[(f64, f64)] = &[
    (-98.0, 34.0),
    (-97.4, 27.8),
    (-97.2, 26.0),
    (-95.0, 29.2),
    (-93.8, 29.7),
    (-91.0, 29.2),
    (-89.4, 29.0),
    (-89.6, 30.2),
    (-87.5, 30.3),
    (-85.4, 29.7),
    (-84.0, 30.0),
    (-82.7, 28.2),
    (-81.8, 26.1),
    (-80.9, 25.1),
    (-80.1, 25.8),
    (-80.6, 28.4),
    (-81.4, 30.7),
    (-79.0, 33.5),
    (-76.0, 35.0),
    (-76.0, 37.0),
    (-98.0, 37.0),
];

const CUBA: &[(f64, f64)] = &[
    (-84.9, 21.9),
    (-82.0, 23.1),
    (-79.0, 22.6),
    (-75.6, 21.0),
    (-74.1, 20.2),
    (-77.7, 19.9),
    (-81.0, 21.6),
];

const YUCATAN: &[(f64, f64)] = &[
    (-92.0, 18.5),
    (-90.4, 21.1),
    (-87.0, 21.5),
    (-87.5, 18.4),
    (-88.3, 16.0),
    (-92.0, 16.0),
];

fn ring(points: &[(f64, f64)]) -> Vec<GeoPoint> {
    points
        .iter()
        .map(|&(lon, lat)| GeoPoint::new(lon, lat))
        .collect()
}

/// The demo coastline, with the continental US highlighted.
pub fn land() -> Vec<LandShape> {
    vec![
        LandShape::new("United States", ring(GULF_COAST)).highlighted(),
        LandShape::new("Cuba", ring(CUBA)),
        LandShape::new("Yucatan", ring(YUCATAN)),
    ]
}

/// Storm centers per timestamp.
///
/// Storms with a recorded track use it; the others drift from the
/// south-east to the north-west corner of their viewer extent.
pub fn track_centers(id: StormId) -> Vec<GeoPoint> {
    let spec = id.spec();
    match spec.track {
        TrackSource::Explicit(track) => track.iter().map(|p| p.position).collect(),
        TrackSource::Centroids(files) => {
            let b = spec.viewer_bounds();
            let n = files.len().max(2) - 1;
            (0..files.len())
                .map(|i| {
                    let t = i as f64 / n as f64;
                    GeoPoint::new(
                        b.min_lon + b.lon_span() * (0.7 - 0.4 * t),
                        b.min_lat + b.lat_span() * (0.2 + 0.6 * t),
                    )
                })
                .collect()
        }
    }
}

/// A ring of cold cloud tops around `center`, warming outwards.
pub fn heat_blob(center: GeoPoint, radius: f64, within: &GeoBounds) -> Vec<HeatRecord> {
    const RINGS: usize = 6;
    const SPOKES: usize = 16;
    let mut rows = vec![HeatRecord::new(center.lon, center.lat, 190.0)];
    for r in 1..=RINGS {
        let dist = radius * r as f64 / RINGS as f64;
        let cmi = 190.0 + 15.0 * r as f64;
        for s in 0..SPOKES {
            let a = core::f64::consts::TAU * s as f64 / SPOKES as f64;
            let p = GeoPoint::new(center.lon + dist * a.cos(), center.lat + dist * a.sin());
            if within.contains(p) {
                rows.push(HeatRecord::new(p.lon, p.lat, cmi));
            }
        }
    }
    rows
}

/// A source holding a synthetic table for every file of every storm.
pub fn synthetic_source() -> MemoryTableSource {
    let mut source = MemoryTableSource::new();
    for id in StormId::ALL {
        let spec = id.spec();
        let bounds = spec.viewer_bounds();
        for (key, center) in spec.file_keys().zip(track_centers(id)) {
            source.insert(key, heat_blob(center, 2.5, &bounds));
        }
    }
    source
}
