// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading storms from an in-memory table source.

use std::sync::Arc;

use pollster::block_on;
use stormscroll_geo::GeoPoint;
use stormscroll_tracks::{
    DataLoadErrorKind, DatasetCache, HeatRecord, MemoryTableSource, StormId, load_storm,
    load_storms,
};

fn full_source(ids: &[StormId]) -> MemoryTableSource {
    let mut source = MemoryTableSource::new();
    for id in ids {
        for (i, key) in id.spec().file_keys().enumerate() {
            let lon = id.spec().marker.lon + i as f64 * 0.1;
            source.insert(
                key,
                vec![
                    HeatRecord::new(lon - 0.5, 28.0, 220.0),
                    HeatRecord::new(lon + 0.5, 29.0, 260.0),
                ],
            );
        }
    }
    source
}

#[test]
fn explicit_track_keeps_catalog_positions() {
    let source = full_source(&[StormId::Ian]);
    let dataset = block_on(load_storm(&source, StormId::Ian.spec())).unwrap();
    assert_eq!(dataset.len(), 14);
    assert_eq!(dataset.track().len(), 14);
    let first = dataset.sample(0).unwrap();
    assert_eq!(first.position, GeoPoint::new(-83.4997, 21.7813));
    assert_eq!(first.label, "09/27/2022 06:00");
    assert_eq!(first.file_key, "ian_20220927_06Z_sampled");
    let b = dataset.track().bounds();
    assert_eq!((b.min_lat, b.max_lat), (21.7813, 28.3912));
    assert_eq!(dataset.rows(0).len(), 2);
    assert!(dataset.rows(99).is_empty());
}

#[test]
fn harvey_positions_are_row_centroids() {
    let source = full_source(&[StormId::Harvey]);
    let dataset = block_on(load_storm(&source, StormId::Harvey.spec())).unwrap();
    assert_eq!(dataset.len(), 16);
    for (i, sample) in dataset.track().samples().iter().enumerate() {
        let expected_lon = -97.0 + i as f64 * 0.1;
        assert!((sample.position.lon - expected_lon).abs() < 1e-9, "sample {i}");
        assert!((sample.position.lat - 28.5).abs() < 1e-9, "sample {i}");
    }
    assert_eq!(dataset.sample(15).unwrap().label, "08/26/2017 15:00");
}

#[test]
fn one_missing_file_fails_the_whole_storm() {
    let mut source = full_source(&[StormId::Irma]);
    source.remove("irma_20170909_03Z_sampled");
    source.insert_json("irma_20170910_13Z_sampled", "[1, 2, 3]");

    let err = block_on(load_storm(&source, StormId::Irma.spec())).unwrap_err();
    assert_eq!(err.storm(), StormId::Irma);
    assert!(matches!(err.kind(), DataLoadErrorKind::Tables(t) if t.len() == 2));
    assert_eq!(
        err.failed_keys().collect::<Vec<_>>(),
        ["irma_20170909_03Z_sampled", "irma_20170910_13Z_sampled"]
    );
    assert!(err.to_string().contains("irma_20170909_03Z_sampled"));
    // Every file was still requested.
    assert_eq!(source.load_count(), 16);
}

#[test]
fn failures_are_isolated_per_storm() {
    let mut source = full_source(&StormId::ALL);
    source.remove("ida_20210830_06Z_sampled");

    let report = block_on(load_storms(&source, StormId::ALL));
    assert!(!report.is_complete());
    assert_eq!(report.failed_storms().collect::<Vec<_>>(), [StormId::Ida]);
    let loaded: Vec<_> = report.loaded.iter().map(|d| d.id()).collect();
    assert_eq!(loaded, [StormId::Harvey, StormId::Ian, StormId::Irma]);
}

#[test]
fn cache_loads_each_storm_once() {
    let source = full_source(&[StormId::Ida]);
    let mut cache = DatasetCache::new();

    let a = block_on(cache.get_or_load(&source, StormId::Ida)).unwrap();
    let loads = source.load_count();
    let b = block_on(cache.get_or_load(&source, StormId::Ida)).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(source.load_count(), loads);
    assert_eq!(cache.len(), 1);

    // Failures are not cached.
    assert!(block_on(cache.get_or_load(&source, StormId::Ian)).is_err());
    assert!(!cache.contains(StormId::Ian));
}

#[test]
fn cache_absorbs_a_report() {
    let source = full_source(&[StormId::Ian, StormId::Irma]);
    let report = block_on(load_storms(&source, [StormId::Ian, StormId::Irma, StormId::Ida]));
    let mut cache = DatasetCache::new();
    cache.absorb(&report);
    assert!(cache.contains(StormId::Ian) && cache.contains(StormId::Irma));
    assert!(!cache.contains(StormId::Ida));
}
