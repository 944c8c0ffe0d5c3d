// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::sync::Arc;

use futures_util::future::join_all;
use hashbrown::HashMap;
use stormscroll_geo::BoundsError;

use crate::catalog::{StormSpec, TrackSource, parse_intensity};
use crate::{
    HeatRecord, StormId, StormTrack, TableError, TableSource, TrackSample, centroid,
    display_timestamp,
};

/// A storm's dataset could not be loaded completely.
///
/// Loading is all-or-nothing: a single failed file fails the storm.
#[derive(Debug)]
pub struct DataLoadError {
    storm: StormId,
    kind: DataLoadErrorKind,
}

/// What went wrong while loading a storm.
#[derive(Debug)]
pub enum DataLoadErrorKind {
    /// One or more tables failed to load, in file order.
    Tables(Vec<TableError>),
    /// Every table loaded but no sample position could be derived.
    EmptyTrack(BoundsError),
}

impl DataLoadError {
    /// Storm that failed.
    #[must_use]
    pub fn storm(&self) -> StormId {
        self.storm
    }

    /// Failure details.
    #[must_use]
    pub fn kind(&self) -> &DataLoadErrorKind {
        &self.kind
    }

    /// Keys of the files that failed, in file order.
    pub fn failed_keys(&self) -> impl Iterator<Item = &str> + '_ {
        let tables: &[TableError] = match &self.kind {
            DataLoadErrorKind::Tables(tables) => tables.as_slice(),
            DataLoadErrorKind::EmptyTrack(_) => &[],
        };
        tables.iter().map(TableError::key)
    }
}

impl fmt::Display for DataLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DataLoadErrorKind::Tables(tables) => {
                write!(f, "could not load {} data file(s) for {}:", tables.len(), self.storm)?;
                for t in tables {
                    write!(f, " {}", t.key())?;
                }
                Ok(())
            }
            DataLoadErrorKind::EmptyTrack(err) => {
                write!(f, "no track positions for {}: {err}", self.storm)
            }
        }
    }
}

impl core::error::Error for DataLoadError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.kind {
            DataLoadErrorKind::Tables(tables) => tables
                .first()
                .map(|t| t as &(dyn core::error::Error + 'static)),
            DataLoadErrorKind::EmptyTrack(err) => Some(err),
        }
    }
}

/// A fully loaded storm: its track plus one heat table per sample.
#[derive(Clone, Debug, PartialEq)]
pub struct StormDataset {
    track: StormTrack,
    tables: Vec<Vec<HeatRecord>>,
}

impl StormDataset {
    /// Pairs a track with its tables.
    ///
    /// Returns `None` unless there is exactly one table per sample.
    #[must_use]
    pub fn new(track: StormTrack, tables: Vec<Vec<HeatRecord>>) -> Option<Self> {
        (track.len() == tables.len()).then_some(Self { track, tables })
    }

    /// Storm id.
    #[must_use]
    pub fn id(&self) -> StormId {
        self.track.id()
    }

    /// The track.
    #[must_use]
    pub fn track(&self) -> &StormTrack {
        &self.track
    }

    /// Number of timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// `true` if there are no timestamps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Heat rows for timestamp `index`; empty when out of range.
    #[must_use]
    pub fn rows(&self, index: usize) -> &[HeatRecord] {
        self.tables.get(index).map_or(&[][..], Vec::as_slice)
    }

    /// Sample for timestamp `index`.
    #[must_use]
    pub fn sample(&self, index: usize) -> Option<&TrackSample> {
        self.track.samples().get(index)
    }
}

/// Loads every file of one storm concurrently.
///
/// Either all tables load and a complete dataset is returned, or the error
/// names every file that failed.
pub async fn load_storm<S: TableSource + ?Sized>(
    source: &S,
    spec: &StormSpec,
) -> Result<StormDataset, DataLoadError> {
    let keys: Vec<&'static str> = spec.file_keys().collect();
    let results = join_all(keys.iter().map(|key| source.load_table(key))).await;

    let mut tables = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(rows) => tables.push(rows),
            Err(err) => {
                tracing::error!(storm = %spec.id, key = err.key(), error = %err, "data file failed to load");
                failures.push(err);
            }
        }
    }
    if !failures.is_empty() {
        tracing::error!(storm = %spec.id, failed = failures.len(), total = keys.len(), "storm dataset incomplete");
        return Err(DataLoadError {
            storm: spec.id,
            kind: DataLoadErrorKind::Tables(failures),
        });
    }

    let samples = build_samples(spec, &keys, &tables);
    let track = StormTrack::new(spec.id, samples).map_err(|err| DataLoadError {
        storm: spec.id,
        kind: DataLoadErrorKind::EmptyTrack(err),
    })?;
    tracing::debug!(storm = %spec.id, samples = track.len(), "storm dataset loaded");
    Ok(StormDataset { track, tables })
}

fn build_samples(spec: &StormSpec, keys: &[&str], tables: &[Vec<HeatRecord>]) -> Vec<TrackSample> {
    let fallback_color = spec.marker_color();
    match spec.track {
        TrackSource::Explicit(track) => track
            .iter()
            .map(|p| TrackSample {
                position: p.position,
                label: display_timestamp(spec.id, p.file_key),
                intensity: parse_intensity(p.intensity).unwrap_or(fallback_color),
                file_key: p.file_key.to_owned(),
            })
            .collect(),
        // A timestamp without usable rows has no centroid and no sample
        // position of its own; it keeps the marker position.
        TrackSource::Centroids(_) => keys
            .iter()
            .zip(tables)
            .map(|(key, rows)| TrackSample {
                position: centroid(rows).unwrap_or(spec.marker),
                label: display_timestamp(spec.id, key),
                intensity: fallback_color,
                file_key: (*key).to_owned(),
            })
            .collect(),
    }
}

/// Outcome of loading several storms.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Storms that loaded completely.
    pub loaded: Vec<Arc<StormDataset>>,
    /// Storms that failed, with the reason.
    pub failed: Vec<DataLoadError>,
}

impl LoadReport {
    /// `true` if every storm loaded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Ids of the storms that failed.
    pub fn failed_storms(&self) -> impl Iterator<Item = StormId> + '_ {
        self.failed.iter().map(DataLoadError::storm)
    }
}

/// Loads several storms concurrently; one storm failing does not affect
/// the others.
pub async fn load_storms<S: TableSource + ?Sized>(
    source: &S,
    ids: impl IntoIterator<Item = StormId>,
) -> LoadReport {
    let results = join_all(ids.into_iter().map(|id| load_storm(source, id.spec()))).await;
    let mut report = LoadReport::default();
    for result in results {
        match result {
            Ok(dataset) => report.loaded.push(Arc::new(dataset)),
            Err(err) => report.failed.push(err),
        }
    }
    report
}

/// Loaded datasets, shared read-only across viewer reopenings.
#[derive(Clone, Debug, Default)]
pub struct DatasetCache {
    datasets: HashMap<StormId, Arc<StormDataset>>,
}

impl DatasetCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached dataset for `id`.
    #[must_use]
    pub fn get(&self, id: StormId) -> Option<Arc<StormDataset>> {
        self.datasets.get(&id).cloned()
    }

    /// `true` if `id` is cached.
    #[must_use]
    pub fn contains(&self, id: StormId) -> bool {
        self.datasets.contains_key(&id)
    }

    /// Number of cached storms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Caches a dataset, replacing any previous one for the same storm.
    pub fn insert(&mut self, dataset: Arc<StormDataset>) {
        self.datasets.insert(dataset.id(), dataset);
    }

    /// Caches everything a [`LoadReport`] loaded.
    pub fn absorb(&mut self, report: &LoadReport) {
        for dataset in &report.loaded {
            self.insert(Arc::clone(dataset));
        }
    }

    /// Returns the cached dataset, loading and caching it on a miss.
    ///
    /// Failures are not cached; a later call retries.
    pub async fn get_or_load<S: TableSource + ?Sized>(
        &mut self,
        source: &S,
        id: StormId,
    ) -> Result<Arc<StormDataset>, DataLoadError> {
        if let Some(dataset) = self.get(id) {
            return Ok(dataset);
        }
        let dataset = Arc::new(load_storm(source, id.spec()).await?);
        self.insert(Arc::clone(&dataset));
        Ok(dataset)
    }
}
