// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use stormscroll_geo::{BoundsCalculator, GeoPoint, GeoProjector, ScaleExtent};

fn grid(n: usize) -> Vec<GeoPoint> {
    let mut points = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let lon = -98.0 + 24.0 * i as f64 / n as f64;
            let lat = 18.0 + 18.0 * j as f64 / n as f64;
            points.push(GeoPoint::new(lon, lat));
        }
    }
    points
}

fn projector() -> GeoProjector {
    GeoProjector::new(Size::new(800.0, 500.0), GeoPoint::new(-82.0, 27.0), 1.3)
        .with_scale_extent(ScaleExtent::new(1.0, 8.0))
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for n in [32_usize, 128] {
        let points = grid(n);
        let mut proj = projector();
        proj.zoom_about(Point::new(400.0, 250.0), 3.0);

        group.bench_function(format!("project(n={})", n * n), |b| {
            b.iter(|| {
                let mut sum = 0.0;
                for p in &points {
                    let s = proj.project(*p);
                    sum += s.x + s.y;
                }
                black_box(sum);
            });
        });

        let screen: Vec<Point> = points.iter().map(|p| proj.project(*p)).collect();
        group.bench_function(format!("invert(n={})", n * n), |b| {
            b.iter(|| {
                let hits = screen.iter().filter_map(|s| proj.invert(*s)).count();
                black_box(hits);
            });
        });

        let calc = BoundsCalculator::new(0.5, 0.2);
        group.bench_function(format!("fit_points(n={})", n * n), |b| {
            b.iter(|| {
                let fitted = calc.fit_points(proj.base(), points.iter().copied(), proj.viewport());
                black_box(fitted.ok());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);
