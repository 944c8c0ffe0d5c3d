// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Storm viewer behavior: loading, playback, reopening and rendering.

use core::time::Duration;

use pollster::block_on;
use proptest::prelude::*;
use stormscroll_surface::{RecordingSurface, SurfaceOp};
use stormscroll_tracks::{DatasetCache, HeatRecord, MemoryTableSource, StormId};
use stormscroll_viewer::{
    PlaybackState, ResumePolicy, StormViewerController, ViewerConfig, ViewerPhase,
};

const INTERVAL: Duration = Duration::from_millis(500);

fn source_for(id: StormId, rows: impl Fn(usize) -> Vec<HeatRecord>) -> MemoryTableSource {
    let mut source = MemoryTableSource::new();
    for (i, key) in id.spec().file_keys().enumerate() {
        source.insert(key, rows(i));
    }
    source
}

fn ready_viewer(id: StormId, config: ViewerConfig) -> StormViewerController {
    let center = id.spec().viewer_bounds().center();
    let source = source_for(id, |_| vec![HeatRecord::new(center.lon, center.lat, 250.0)]);
    let mut viewer = StormViewerController::new(id, config);
    let phase = block_on(viewer.initialize(&mut DatasetCache::new(), &source));
    assert_eq!(phase, ViewerPhase::Ready);
    viewer
}

#[test]
fn play_at_the_last_index_stops_without_advancing() {
    let mut viewer = ready_viewer(StormId::Ian, ViewerConfig::default());
    assert_eq!(viewer.seek(13), 13);
    assert!(viewer.play());
    let tick = viewer.advance(INTERVAL);
    assert!(tick.finished);
    assert_eq!(viewer.current_index(), 13);
    assert!(!viewer.is_playing());
    assert!(viewer.playback().timer().is_none());
}

#[test]
fn seek_clamps_on_a_fourteen_sample_track() {
    let mut viewer = ready_viewer(StormId::Ian, ViewerConfig::default());
    assert_eq!(viewer.dataset().unwrap().len(), 14);
    assert_eq!(viewer.seek(-5), 0);
    assert_eq!(viewer.seek(99), 13);
}

#[test]
fn seek_and_reset_pause_playback() {
    let mut viewer = ready_viewer(StormId::Irma, ViewerConfig::default());
    viewer.play();
    viewer.seek(4);
    assert!(!viewer.is_playing());
    viewer.play();
    viewer.advance(INTERVAL * 2);
    assert_eq!(viewer.current_index(), 6);
    viewer.reset();
    assert_eq!(viewer.current_index(), 0);
    assert!(!viewer.is_playing());
}

#[test]
fn controls_are_inert_until_ready() {
    let mut viewer = StormViewerController::new(StormId::Ida, ViewerConfig::default());
    assert_eq!(viewer.phase(), ViewerPhase::Uninitialized);
    assert!(!viewer.play());
    assert!(!viewer.toggle_play());
    let mut surface = RecordingSurface::new();
    let frame = viewer.render(&mut surface);
    assert_eq!(frame.index, None);
    assert_eq!(frame.label, "Loading Hurricane Ida (2021)...");
}

#[test]
fn hide_pauses_and_show_resumes_by_default() {
    let mut viewer = ready_viewer(StormId::Ida, ViewerConfig::default());
    viewer.show();
    viewer.play();
    viewer.advance(INTERVAL * 3);
    viewer.hide();
    assert!(!viewer.is_playing(), "no background ticking after hide");
    assert!(!viewer.advance(INTERVAL * 4).moved());
    viewer.show();
    assert_eq!(viewer.current_index(), 3);
}

#[test]
fn restart_policy_rewinds_on_show() {
    let config = ViewerConfig {
        resume: ResumePolicy::Restart,
        ..ViewerConfig::default()
    };
    let mut viewer = ready_viewer(StormId::Ida, config);
    viewer.seek(7);
    viewer.hide();
    viewer.show();
    assert_eq!(viewer.current_index(), 0);
}

#[test]
fn a_missing_file_shows_an_error_and_can_retry() {
    let mut source = source_for(StormId::Harvey, |_| vec![HeatRecord::new(-95.0, 29.0, 240.0)]);
    source.remove("harvey_20170825_09Z_sampled");
    let mut cache = DatasetCache::new();
    let mut viewer = StormViewerController::new(StormId::Harvey, ViewerConfig::default());

    assert_eq!(block_on(viewer.initialize(&mut cache, &source)), ViewerPhase::Failed);
    assert!(viewer.dataset().is_none());
    let mut surface = RecordingSurface::new();
    let frame = viewer.render(&mut surface);
    assert_eq!(frame.label, "Error: Could not load all Hurricane Harvey (2017) data files.");
    assert_eq!(surface.frame_texts().collect::<Vec<_>>(), [frame.label.as_str()]);

    source.insert("harvey_20170825_09Z_sampled", vec![HeatRecord::new(-95.0, 29.0, 240.0)]);
    assert_eq!(block_on(viewer.initialize(&mut cache, &source)), ViewerPhase::Ready);
    assert!(viewer.failure().is_none());
}

#[test]
fn reopening_reuses_the_cached_dataset() {
    let source = source_for(StormId::Ian, |_| vec![HeatRecord::new(-80.0, 25.0, 230.0)]);
    let mut cache = DatasetCache::new();
    let mut viewer = StormViewerController::new(StormId::Ian, ViewerConfig::default());
    block_on(viewer.initialize(&mut cache, &source));
    let loads = source.load_count();

    let mut second = StormViewerController::new(StormId::Ian, ViewerConfig::default());
    block_on(second.initialize(&mut cache, &source));
    assert_eq!(source.load_count(), loads);
    assert!(std::sync::Arc::ptr_eq(
        viewer.dataset().unwrap(),
        second.dataset().unwrap()
    ));
}

#[test]
fn render_culls_and_colors_points() {
    let source = source_for(StormId::Ida, |i| {
        if i == 2 {
            Vec::new()
        } else {
            vec![
                HeatRecord::new(-90.0, 29.0, 200.0),
                HeatRecord::new(-92.0, 30.0, 300.0),
                // Far outside the Ida extent.
                HeatRecord::new(-20.0, 60.0, 250.0),
                HeatRecord::new(-91.0, 29.5, f64::NAN),
            ]
        }
    });
    let mut viewer = StormViewerController::new(StormId::Ida, ViewerConfig::default());
    block_on(viewer.initialize(&mut DatasetCache::new(), &source));

    let mut surface = RecordingSurface::new();
    let frame = viewer.render(&mut surface);
    assert_eq!(frame.label, "Timestamp: 08/27/2021 18:00");
    assert_eq!((frame.drawn, frame.culled), (2, 2));
    let points: Vec<_> = surface.frame_points().collect();
    assert_eq!(points.len(), 2);
    for (at, color, size) in &points {
        assert!(viewer.projector().is_visible(*at));
        assert_eq!(color.components[3], 0.5);
        assert_eq!(*size, 1.5);
    }
    let light = points[0].1.to_rgba8();
    let dark = points[1].1.to_rgba8();
    assert_eq!((light.r, light.g, light.b), (0xff, 0xff, 0xcc));
    assert_eq!((dark.r, dark.g, dark.b), (0x80, 0x00, 0x26));

    viewer.seek(2);
    let frame = viewer.render(&mut surface);
    assert_eq!(frame.label, "Timestamp: ida_20210828_00Z_sampled - (No Data Available)");
    assert_eq!(frame.drawn, 0);
    assert_eq!(surface.frame().len(), 1, "cleared, only the label remains");
    assert!(matches!(surface.frame()[0], SurfaceOp::Text { .. }));
    assert!(!viewer.needs_render());
}

#[test]
fn rendering_is_deterministic_per_index() {
    let mut viewer = ready_viewer(StormId::Irma, ViewerConfig::default());
    viewer.seek(5);
    let mut a = RecordingSurface::new();
    let mut b = RecordingSurface::new();
    viewer.render(&mut a);
    viewer.render(&mut b);
    assert_eq!(a.frame(), b.frame());
}

proptest! {
    /// Playing from any index reaches Paused within
    /// `(len - index) * interval` and never passes the last index.
    #[test]
    fn playback_always_terminates(
        len in 1_usize..40,
        start in 0_usize..40,
        frame_ms in 1_u64..700,
    ) {
        let mut playback = PlaybackState::new(len);
        let start = playback.seek(isize::try_from(start).unwrap());
        prop_assert!(playback.play(INTERVAL));

        let budget = INTERVAL * u32::try_from(len - start).unwrap();
        let mut elapsed = Duration::ZERO;
        let frame = Duration::from_millis(frame_ms);
        while playback.is_playing() {
            prop_assert!(elapsed < budget, "still playing after {:?}", elapsed);
            playback.advance(frame);
            elapsed += frame;
            prop_assert!(playback.current_index() < len);
        }
        prop_assert_eq!(playback.current_index(), len - 1);
    }
}
