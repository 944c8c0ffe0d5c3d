// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stormscroll Viewer: timestamp playback over one storm's heat tables.
//!
//! One generic [`StormViewerController`] serves every storm; the storm's
//! catalog entry supplies its files and geographic extent.
//!
//! - Loading: `Uninitialized → Loading → Ready`, or `Failed` when any file
//!   is missing. Partial datasets never reach `Ready`.
//! - Playback: [`PlaybackState`] steps one timestamp per interval while
//!   playing and pauses at the last index instead of wrapping.
//! - Rendering: heat rows are projected, culled against the canvas and
//!   colored through an [`IntensityScale`].
//!
//! ```rust
//! use core::time::Duration;
//! use std::sync::Arc;
//!
//! use stormscroll_surface::RecordingSurface;
//! use stormscroll_tracks::{HeatRecord, MemoryTableSource, StormId, load_storm};
//! use stormscroll_viewer::{StormViewerController, ViewerConfig};
//!
//! let spec = StormId::Ian.spec();
//! let mut source = MemoryTableSource::new();
//! for key in spec.file_keys() {
//!     source.insert(key, vec![HeatRecord::new(-82.0, 26.0, 250.0)]);
//! }
//! let dataset = pollster::block_on(load_storm(&source, spec)).unwrap();
//!
//! let mut viewer = StormViewerController::new(StormId::Ian, ViewerConfig::default());
//! viewer.begin_loading();
//! viewer.finish_loading(Ok(Arc::new(dataset)));
//! viewer.show();
//! viewer.play();
//! viewer.advance(Duration::from_millis(1000));
//! assert_eq!(viewer.current_index(), 2);
//!
//! let mut surface = RecordingSurface::new();
//! let frame = viewer.render(&mut surface);
//! assert_eq!(frame.label, "Timestamp: 09/27/2022 12:00");
//! assert_eq!(frame.drawn, 1);
//! ```

mod controller;
mod playback;
mod scale;

pub use controller::{ResumePolicy, StormViewerController, ViewerConfig, ViewerFrame, ViewerPhase};
pub use playback::{IntervalTimer, PlaybackState, PlaybackTick};
pub use scale::{IntensityScale, YL_OR_RD};
