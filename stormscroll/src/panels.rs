// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use kurbo::Size;
use smallvec::SmallVec;
use stormscroll_tracks::{DatasetCache, LoadReport, StormId, TableSource, load_storms};
use stormscroll_viewer::{StormViewerController, ViewerConfig, ViewerPhase};

/// Storms whose viewer was hidden by a call.
pub type HiddenViewers = SmallVec<[StormId; 4]>;

/// One viewer per catalog storm plus the dataset cache they share.
///
/// At most one viewer is visible at a time.
#[derive(Debug)]
pub struct ViewerPanels {
    viewers: Vec<StormViewerController>,
    cache: DatasetCache,
}

impl ViewerPanels {
    /// Creates hidden, uninitialized viewers for every storm.
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            viewers: StormId::ALL
                .into_iter()
                .map(|id| StormViewerController::new(id, config))
                .collect(),
            cache: DatasetCache::new(),
        }
    }

    /// The viewer for `id`.
    #[must_use]
    pub fn get(&self, id: StormId) -> Option<&StormViewerController> {
        self.viewers.iter().find(|v| v.id() == id)
    }

    /// The viewer for `id`, mutably.
    pub fn get_mut(&mut self, id: StormId) -> Option<&mut StormViewerController> {
        self.viewers.iter_mut().find(|v| v.id() == id)
    }

    /// All viewers in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &StormViewerController> + '_ {
        self.viewers.iter()
    }

    /// All viewers in catalog order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StormViewerController> + '_ {
        self.viewers.iter_mut()
    }

    /// Shared dataset cache.
    #[must_use]
    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// The visible viewer, if any.
    #[must_use]
    pub fn visible(&self) -> Option<StormId> {
        self.viewers.iter().find(|v| v.is_visible()).map(StormViewerController::id)
    }

    /// Gets the viewer for `id` ready to show.
    ///
    /// A viewer without data picks it up from the cache when it's there;
    /// otherwise it starts loading. Returns `true` if the caller needs to
    /// fetch the data: the viewer had none and nothing requested it yet, or
    /// the last attempt failed.
    pub fn prepare(&mut self, id: StormId) -> bool {
        let Some(viewer) = self.viewers.iter_mut().find(|v| v.id() == id) else {
            return false;
        };
        if viewer.is_ready() {
            return false;
        }
        if let Some(dataset) = self.cache.get(id) {
            viewer.begin_loading();
            viewer.finish_loading(Ok(dataset));
            return false;
        }
        viewer.begin_loading()
    }

    /// Shows the viewer for `id` and hides every other one.
    ///
    /// Returns the viewers that got hidden.
    pub fn show_only(&mut self, id: StormId) -> HiddenViewers {
        let mut hidden = HiddenViewers::new();
        for viewer in &mut self.viewers {
            if viewer.id() == id {
                viewer.show();
            } else if viewer.is_visible() {
                viewer.hide();
                hidden.push(viewer.id());
            }
        }
        hidden
    }

    /// Hides every visible viewer, which also stops its playback.
    pub fn hide_all(&mut self) -> HiddenViewers {
        let mut hidden = HiddenViewers::new();
        for viewer in &mut self.viewers {
            if viewer.is_visible() {
                viewer.hide();
                hidden.push(viewer.id());
            }
        }
        hidden
    }

    /// Resizes every viewer canvas.
    pub fn set_viewport(&mut self, size: Size) {
        for viewer in &mut self.viewers {
            viewer.set_viewport(size);
        }
    }

    /// Stops every running playback timer; visibility is unchanged.
    pub fn pause_all(&mut self) {
        for viewer in &mut self.viewers {
            viewer.pause();
        }
    }

    /// Advances playback time for every viewer.
    ///
    /// Returns the storms whose playback reached the end.
    pub fn advance(&mut self, dt: Duration) -> SmallVec<[StormId; 4]> {
        let mut finished = SmallVec::new();
        for viewer in &mut self.viewers {
            if viewer.advance(dt).finished {
                finished.push(viewer.id());
            }
        }
        finished
    }

    /// Loads `id` through the cache and returns the viewer's phase.
    pub async fn initialize<S: TableSource + ?Sized>(&mut self, id: StormId, source: &S) -> ViewerPhase {
        let Some(viewer) = self.viewers.iter_mut().find(|v| v.id() == id) else {
            return ViewerPhase::Uninitialized;
        };
        viewer.initialize(&mut self.cache, source).await
    }

    /// Loads every storm not cached yet, concurrently.
    ///
    /// Viewers waiting for data are completed from the result, failures
    /// included.
    pub async fn preload<S: TableSource + ?Sized>(&mut self, source: &S) -> LoadReport {
        let missing: SmallVec<[StormId; 4]> = StormId::ALL
            .into_iter()
            .filter(|id| !self.cache.contains(*id))
            .collect();
        let report = load_storms(source, missing).await;
        self.cache.absorb(&report);
        tracing::info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "preloaded storm data"
        );
        self.complete_waiting(&report);
        report
    }

    /// Completes loading viewers from the cache or the failures in `report`.
    pub fn complete_waiting(&mut self, report: &LoadReport) {
        for viewer in &mut self.viewers {
            if viewer.phase() != ViewerPhase::Loading {
                continue;
            }
            if let Some(dataset) = self.cache.get(viewer.id()) {
                viewer.finish_loading(Ok(dataset));
            } else if let Some(err) = report.failed.iter().find(|e| e.storm() == viewer.id()) {
                viewer.finish_loading(Err(err));
            }
        }
    }
}
