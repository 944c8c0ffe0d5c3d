// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stormscroll: a scroll-driven hurricane story.
//!
//! This crate wires the Stormscroll building blocks into one [`Story`]:
//!
//! - [`StormMap`]: the overview map with clickable storm markers. Clicking a
//!   marker fits the storm's track, animates the zoom and, once it lands,
//!   opens that storm's viewer over the dimmed map.
//! - [`ViewerPanels`]: one playback viewer per storm, sharing a dataset cache.
//! - Sections: [`StormMapSection`] and [`ChartSection`] implement the
//!   section lifecycle against the shared [`StoryContext`].
//! - [`StoryHost`]: the seam to the page, handing out a drawing surface per
//!   [`SurfaceTarget`].
//! - [`StoryConfig`]: TOML-loadable settings.
//!
//! The host drives everything: intersection signals and progress from the
//! page's scroll position, pointer and keyboard input, one [`Story::tick`]
//! per animation frame, and data loading through the async
//! [`Story::preload`] / [`Story::open_viewer`] entry points.
//!
//! ```rust
//! use core::time::Duration;
//!
//! use stormscroll::{RecordingHost, Story, StoryConfig, StoryEvent, TextPanel};
//! use stormscroll_sections::{IntersectionSignal, ScrollDirection};
//! use stormscroll_tracks::StormId;
//!
//! let mut story = Story::new(StoryConfig::default(), RecordingHost::new()).unwrap();
//! story.add_chart("hook", "Four storms", TextPanel::new(["Four storms, one coastline"])).unwrap();
//! story.add_map_section("map", "Storm map").unwrap();
//! assert!(story.initialize().is_ok());
//!
//! story.handle_signal(&IntersectionSignal::new("hook", 1.0, ScrollDirection::Down));
//! story.handle_signal(&IntersectionSignal::new("map", 0.8, ScrollDirection::Down));
//! assert_eq!(story.navigation().unwrap().label, "Section 2 of 2");
//!
//! story.select_storm(StormId::Ian);
//! let mut events = Vec::new();
//! for _ in 0..60 {
//!     events.extend(story.tick(Duration::from_millis(16)));
//! }
//! assert_eq!(story.map().focused(), Some(StormId::Ian));
//! assert!(events.contains(&StoryEvent::ViewerNeedsData(StormId::Ian)));
//! ```

mod config;
mod host;
mod map;
mod panels;
mod sections;
mod story;

pub use config::{
    ConfigError, MapConfig, ReopenPolicy, ScrollConfig, StoryConfig, ViewerSettings,
    user_config_path,
};
pub use host::{RecordingHost, StoryHost, SurfaceTarget};
pub use map::{LandShape, MapFrame, StormMap, StormMarker};
pub use panels::{HiddenViewers, ViewerPanels};
pub use sections::{ChartDrawer, ChartSection, StormMapSection, TextPanel};
pub use story::{Story, StoryContext, StoryEvent, nav_key};
