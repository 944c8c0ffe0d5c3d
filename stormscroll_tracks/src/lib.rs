// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stormscroll Tracks: the storm catalog and its data.
//!
//! - [`StormId`] and [`StormSpec`] describe the fixed set of storms: marker,
//!   viewer extent, timestamp file keys and recorded track positions.
//! - [`HeatRecord`] is one row of a per-timestamp heat table.
//! - [`TableSource`] fetches tables by key. [`MemoryTableSource`] and
//!   [`JsonDirSource`] are provided.
//! - [`load_storm`] loads one storm all-or-nothing; [`load_storms`] loads
//!   several concurrently and reports which failed.
//! - [`DatasetCache`] shares loaded datasets between viewer reopenings.
//!
//! ```rust
//! use stormscroll_tracks::{HeatRecord, MemoryTableSource, StormId, load_storm};
//!
//! let spec = StormId::Ida.spec();
//! let mut source = MemoryTableSource::new();
//! for key in spec.file_keys() {
//!     source.insert(key, vec![HeatRecord::new(-90.0, 29.0, 240.0)]);
//! }
//!
//! let dataset = pollster::block_on(load_storm(&source, spec)).unwrap();
//! assert_eq!(dataset.len(), 13);
//! assert_eq!(dataset.sample(8).unwrap().label, "08/29/2021 12:00");
//! ```

mod catalog;
mod load;
mod record;
mod source;

pub use catalog::{StormId, StormSpec, TrackPosition, TrackSource, UnknownStormError, parse_intensity};
pub use load::{
    DataLoadError, DataLoadErrorKind, DatasetCache, LoadReport, StormDataset, load_storm,
    load_storms,
};
pub use record::{
    HeatRecord, StormTrack, TrackSample, UNKNOWN_TIMESTAMP, centroid, display_timestamp,
    timestamp_label,
};
pub use source::{JsonDirSource, MemoryTableSource, TableError, TableSource};
