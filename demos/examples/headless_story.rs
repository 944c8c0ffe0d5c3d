// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless story run.
//!
//! Scrolls through a four-section story, clicks a storm marker on the map,
//! plays its viewer for a few steps and writes every surface as SVG.
//!
//! Heat tables come from `<data_dir>/<key>.json` when a data directory is
//! given, and are synthesized otherwise. Settings are read from the user
//! config file if one exists.
//!
//! Run:
//! - `cargo run -p stormscroll_demos --example headless_story -- [out_dir] [data_dir]`
//! - `RUST_LOG=debug cargo run -p stormscroll_demos --example headless_story`

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use pollster::block_on;
use stormscroll::{Story, StoryConfig, StoryEvent, TextPanel};
use stormscroll_demos::charts::BarChart;
use stormscroll_demos::gulf;
use stormscroll_demos::svg_host::SvgHost;
use stormscroll_sections::{IntersectionSignal, ScrollDirection};
use stormscroll_tracks::{JsonDirSource, StormId, TableSource};
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let out_dir = args.next().map_or_else(|| PathBuf::from("stormscroll-out"), PathBuf::from);
    let data_dir = args.next().map(PathBuf::from);

    let config = match StoryConfig::load_user() {
        Ok(Some(config)) => config,
        Ok(None) => StoryConfig::default(),
        Err(err) => {
            tracing::warn!(%err, "ignoring unreadable user config");
            StoryConfig::default()
        }
    };

    match data_dir {
        Some(dir) => run(config, &JsonDirSource::new(dir), &out_dir),
        None => run(config, &gulf::synthetic_source(), &out_dir),
    }
}

fn run<S: TableSource>(
    config: StoryConfig,
    source: &S,
    out_dir: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let host = SvgHost::new(&config);
    let mut story = Story::new(config, host)?;
    story.add_chart(
        "hook",
        "Four storms",
        TextPanel::new(["Four hurricanes", "One coastline"]),
    )?;
    story.add_map_section("map", "Storm map")?;
    story.add_chart(
        "peaks",
        "Peak winds",
        BarChart::new([("Harvey", 130.0), ("Irma", 180.0), ("Ida", 150.0), ("Ian", 155.0)]),
    )?;
    story.add_chart(
        "outro",
        "What comes next",
        TextPanel::new(["Warmer water, stronger storms"]),
    )?;
    let init = story.initialize();
    for (index, err) in &init.failed {
        tracing::warn!(index, %err, "section failed to initialize");
    }
    story
        .context_mut()
        .map_mut()
        .set_land(gulf::land());

    let report = block_on(story.preload(source));
    for id in report.failed_storms() {
        tracing::warn!(storm = %id, "storm data unavailable");
    }

    for id in ["hook", "map"] {
        story.handle_signal(&IntersectionSignal::new(id, 0.8, ScrollDirection::Down));
    }
    if let Some(nav) = story.navigation() {
        tracing::info!(label = %nav.label, title = %nav.title, "scrolled");
    }
    story.handle_progress(1, 0.3);

    story.select_storm(StormId::Ian);
    for _ in 0..120 {
        for event in story.tick(FRAME) {
            if let StoryEvent::ViewerNeedsData(id) = event {
                block_on(story.open_viewer(id, source));
            }
        }
        if !story.map().is_animating() {
            break;
        }
    }

    if let Some(viewer) = story.viewer_mut(StormId::Ian) {
        viewer.play();
    }
    for _ in 0..4 {
        story.tick(Duration::from_millis(500));
    }
    let written = story.host().write_all(out_dir, "map")?;

    story.handle_signal(&IntersectionSignal::new("peaks", 0.8, ScrollDirection::Down));
    story.handle_progress(2, 0.5);
    let mut charts = story.host().write_all(out_dir, "peaks")?;
    charts.retain(|p| p.to_string_lossy().contains("chart-"));

    for path in written.iter().chain(&charts) {
        println!("wrote {}", path.display());
    }
    Ok(())
}
