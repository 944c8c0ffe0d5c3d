// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use pollster::block_on;
use stormscroll_surface::RecordingSurface;
use stormscroll_tracks::{HeatRecord, MemoryTableSource, StormId, load_storm};
use stormscroll_viewer::{StormViewerController, ViewerConfig};

/// A `side` by `side` grid of records covering the storm's viewer extent.
fn dense_source(id: StormId, side: usize) -> MemoryTableSource {
    let spec = id.spec();
    let b = spec.viewer_bounds();
    let mut source = MemoryTableSource::new();
    for (k, key) in spec.file_keys().enumerate() {
        let mut rows = Vec::with_capacity(side * side);
        for i in 0..side {
            for j in 0..side {
                let lon = b.min_lon + b.lon_span() * i as f64 / side as f64;
                let lat = b.min_lat + b.lat_span() * j as f64 / side as f64;
                let cmi = 180.0 + ((i + j + k) % 120) as f64;
                rows.push(HeatRecord::new(lon, lat, cmi));
            }
        }
        source.insert(key, rows);
    }
    source
}

fn ready_viewer(id: StormId, side: usize) -> StormViewerController {
    let source = dense_source(id, side);
    let dataset = block_on(load_storm(&source, id.spec())).expect("every table is present");
    let mut viewer = StormViewerController::new(id, ViewerConfig::default());
    viewer.begin_loading();
    viewer.finish_loading(Ok(Arc::new(dataset)));
    viewer
}

fn bench_viewer_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewer_render");

    for side in [50_usize, 200] {
        let mut viewer = ready_viewer(StormId::Ida, side);
        group.bench_function(format!("render(rows={})", side * side), |b| {
            b.iter_batched_ref(
                RecordingSurface::new,
                |surface| {
                    let frame = viewer.render(surface);
                    black_box(frame);
                },
                BatchSize::SmallInput,
            );
        });

        let files = isize::try_from(viewer.spec().file_count()).unwrap_or(1);
        let mut index = 0;
        group.bench_function(format!("seek_and_render(rows={})", side * side), |b| {
            b.iter_batched_ref(
                RecordingSurface::new,
                |surface| {
                    index = (index + 1) % files;
                    viewer.seek(index);
                    let frame = viewer.render(surface);
                    black_box(frame);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_viewer_render);
criterion_main!(benches);
