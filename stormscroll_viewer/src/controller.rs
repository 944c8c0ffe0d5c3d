// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;
use std::sync::Arc;

use kurbo::{Point, Size};
use peniko::Color;
use peniko::color::palette;
use stormscroll_geo::{GeoBounds, GeoProjector, ScaleExtent};
use stormscroll_surface::Surface;
use stormscroll_tracks::{DataLoadError, DatasetCache, StormDataset, StormId, StormSpec, TableSource};

use crate::{IntensityScale, PlaybackState, PlaybackTick};

/// What [`StormViewerController::show`] does with the persisted position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResumePolicy {
    /// Continue at the last displayed index.
    #[default]
    Resume,
    /// Rewind to index 0.
    Restart,
}

/// Viewer settings shared by every storm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerConfig {
    /// Canvas size in pixels.
    pub viewport: Size,
    /// Playback step interval.
    pub interval: Duration,
    /// Heat point size in pixels.
    pub point_size: f64,
    /// Heat point alpha.
    pub point_alpha: f32,
    /// Intensity domain mapped onto the color ramp.
    pub color_domain: (f64, f64),
    /// Behavior on reopen.
    pub resume: ResumePolicy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            viewport: Size::new(290.0, 400.0),
            interval: Duration::from_millis(500),
            point_size: 1.5,
            point_alpha: 0.5,
            color_domain: (200.0, 300.0),
            resume: ResumePolicy::Resume,
        }
    }
}

/// Loading state of a viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewerPhase {
    /// Nothing requested yet.
    Uninitialized,
    /// Waiting for the dataset.
    Loading,
    /// Dataset present; playback available.
    Ready,
    /// The dataset failed to load; an error message is shown.
    Failed,
}

/// Summary of one rendered frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewerFrame {
    /// Rendered timestamp index, if a dataset is present.
    pub index: Option<usize>,
    /// Text shown above the canvas.
    pub label: String,
    /// Points drawn.
    pub drawn: usize,
    /// Points skipped: off the canvas, or with no intensity value.
    pub culled: usize,
}

const LABEL_ANCHOR: Point = Point::new(8.0, 16.0);
const LABEL_COLOR: Color = palette::css::BLACK;

/// Playback and rendering for one storm's heat tables.
///
/// The viewer owns its projection, fitted once to the storm's geographic
/// extent, and its [`PlaybackState`], which survives hide/show cycles.
#[derive(Debug)]
pub struct StormViewerController {
    spec: &'static StormSpec,
    config: ViewerConfig,
    phase: ViewerPhase,
    dataset: Option<Arc<StormDataset>>,
    failure: Option<String>,
    playback: PlaybackState,
    projector: GeoProjector,
    scale: IntensityScale,
    visible: bool,
    needs_render: bool,
}

impl StormViewerController {
    /// Creates an uninitialized, hidden viewer for `id`.
    #[must_use]
    pub fn new(id: StormId, config: ViewerConfig) -> Self {
        let spec = id.spec();
        Self {
            spec,
            config,
            phase: ViewerPhase::Uninitialized,
            dataset: None,
            failure: None,
            playback: PlaybackState::new(0),
            projector: fitted_projector(&spec.viewer_bounds(), config.viewport),
            scale: IntensityScale::yl_or_rd(config.color_domain, config.point_alpha),
            visible: false,
            needs_render: false,
        }
    }

    /// Storm id.
    #[must_use]
    pub fn id(&self) -> StormId {
        self.spec.id
    }

    /// Catalog entry.
    #[must_use]
    pub fn spec(&self) -> &'static StormSpec {
        self.spec
    }

    /// Settings.
    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Loading state.
    #[must_use]
    pub fn phase(&self) -> ViewerPhase {
        self.phase
    }

    /// `true` once the dataset is present.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == ViewerPhase::Ready
    }

    /// `true` while shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// `true` if state changed since the last [`render`](Self::render).
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Playback state.
    #[must_use]
    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    /// Displayed index.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.playback.current_index()
    }

    /// `true` while playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// The viewer's projection.
    #[must_use]
    pub fn projector(&self) -> &GeoProjector {
        &self.projector
    }

    /// Loaded dataset.
    #[must_use]
    pub fn dataset(&self) -> Option<&Arc<StormDataset>> {
        self.dataset.as_ref()
    }

    /// Failure message, once loading failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Marks the dataset as requested.
    ///
    /// Returns `false` (and changes nothing) unless the viewer is
    /// uninitialized or failed.
    pub fn begin_loading(&mut self) -> bool {
        match self.phase {
            ViewerPhase::Uninitialized | ViewerPhase::Failed => {
                self.phase = ViewerPhase::Loading;
                self.failure = None;
                self.needs_render = true;
                true
            }
            ViewerPhase::Loading | ViewerPhase::Ready => false,
        }
    }

    /// Completes a load started with [`begin_loading`](Self::begin_loading).
    ///
    /// A viewer that is already ready keeps its dataset and playback.
    pub fn finish_loading(&mut self, result: Result<Arc<StormDataset>, &DataLoadError>) {
        if self.phase == ViewerPhase::Ready {
            return;
        }
        match result {
            Ok(dataset) => {
                self.playback = PlaybackState::new(dataset.len());
                self.dataset = Some(dataset);
                self.phase = ViewerPhase::Ready;
                tracing::debug!(storm = %self.spec.id, "viewer ready");
            }
            Err(err) => {
                tracing::error!(storm = %self.spec.id, error = %err, "viewer data unavailable");
                self.failure = Some(format!(
                    "Error: Could not load all {} data files.",
                    self.spec.name
                ));
                self.phase = ViewerPhase::Failed;
            }
        }
        self.needs_render = true;
    }

    /// Loads the dataset through `cache`, fetching from `source` on a miss.
    ///
    /// Returns the phase afterwards. A ready viewer returns immediately.
    pub async fn initialize<S: TableSource + ?Sized>(
        &mut self,
        cache: &mut DatasetCache,
        source: &S,
    ) -> ViewerPhase {
        if self.phase == ViewerPhase::Ready {
            return self.phase;
        }
        self.begin_loading();
        match cache.get_or_load(source, self.spec.id).await {
            Ok(dataset) => self.finish_loading(Ok(dataset)),
            Err(err) => self.finish_loading(Err(&err)),
        }
        self.phase
    }

    /// Shows the viewer.
    ///
    /// The persisted index is kept or rewound according to
    /// [`ViewerConfig::resume`].
    pub fn show(&mut self) {
        if self.config.resume == ResumePolicy::Restart {
            self.playback.reset();
        }
        self.visible = true;
        self.needs_render = true;
    }

    /// Hides the viewer, stopping playback.
    pub fn hide(&mut self) {
        self.playback.pause();
        self.visible = false;
    }

    /// Starts playback. No-op unless ready and paused.
    pub fn play(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        let started = self.playback.play(self.config.interval);
        if started {
            tracing::debug!(storm = %self.spec.id, index = self.playback.current_index(), "playback started");
        }
        started
    }

    /// Stops playback; idempotent.
    pub fn pause(&mut self) -> bool {
        self.playback.pause()
    }

    /// The play/pause button.
    pub fn toggle_play(&mut self) -> bool {
        if self.is_playing() {
            self.pause();
            false
        } else {
            self.play()
        }
    }

    /// Pauses and rewinds to the first timestamp.
    pub fn reset(&mut self) {
        self.playback.reset();
        self.needs_render = true;
    }

    /// Pauses and shows timestamp `index`, clamped into range.
    pub fn seek(&mut self, index: isize) -> usize {
        let index = self.playback.seek(index);
        self.needs_render = true;
        index
    }

    /// Advances playback time.
    pub fn advance(&mut self, dt: Duration) -> PlaybackTick {
        let tick = self.playback.advance(dt);
        if tick.moved() || tick.finished {
            self.needs_render = true;
        }
        if tick.finished {
            tracing::debug!(storm = %self.spec.id, "playback finished");
        }
        tick
    }

    /// Resizes the canvas and refits the projection.
    pub fn set_viewport(&mut self, size: Size) {
        if size == self.config.viewport {
            return;
        }
        self.config.viewport = size;
        self.projector = fitted_projector(&self.spec.viewer_bounds(), size);
        self.needs_render = true;
    }

    /// Draws the current state into `surface`.
    ///
    /// The surface is always cleared first. Rendering is deterministic for a
    /// given index and projection.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) -> ViewerFrame {
        self.needs_render = false;
        surface.clear();
        let frame = match (&self.dataset, self.phase) {
            (Some(dataset), ViewerPhase::Ready) => self.render_index(dataset, surface),
            (_, ViewerPhase::Failed) => ViewerFrame {
                index: None,
                label: self.failure.clone().unwrap_or_default(),
                drawn: 0,
                culled: 0,
            },
            _ => ViewerFrame {
                index: None,
                label: format!("Loading {}...", self.spec.name),
                drawn: 0,
                culled: 0,
            },
        };
        surface.draw_text(LABEL_ANCHOR, &frame.label, LABEL_COLOR);
        frame
    }

    fn render_index<S: Surface + ?Sized>(&self, dataset: &StormDataset, surface: &mut S) -> ViewerFrame {
        let index = self.playback.current_index();
        let rows = dataset.rows(index);
        let sample = dataset.sample(index);
        if rows.is_empty() {
            let key = sample.map_or("", |s| s.file_key.as_str());
            return ViewerFrame {
                index: Some(index),
                label: format!("Timestamp: {key} - (No Data Available)"),
                drawn: 0,
                culled: 0,
            };
        }

        let mut frame = ViewerFrame {
            index: Some(index),
            label: format!(
                "Timestamp: {}",
                sample.map_or(stormscroll_tracks::UNKNOWN_TIMESTAMP, |s| s.label.as_str())
            ),
            drawn: 0,
            culled: 0,
        };
        for row in rows {
            let screen = self.projector.project(row.position());
            let color = self.scale.color(row.cmi);
            match color {
                Some(color) if self.projector.is_visible(screen) => {
                    surface.draw_point(screen, color, self.config.point_size);
                    frame.drawn += 1;
                }
                _ => frame.culled += 1,
            }
        }
        frame
    }
}

/// A projector whose zoom fits `bounds` exactly into `viewport`.
fn fitted_projector(bounds: &GeoBounds, viewport: Size) -> GeoProjector {
    let mut projector = GeoProjector::new(viewport, bounds.center(), 1.0)
        .with_scale_extent(ScaleExtent::new(1e-3, 1e3));
    match projector.fit_bounds(bounds, 0.0, 0.0) {
        Ok(transform) => {
            projector.apply_transform(transform);
        }
        Err(err) => tracing::warn!(error = %err, "viewer extent could not be fitted"),
    }
    projector
}
