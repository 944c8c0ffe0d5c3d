// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::time::Duration;

use kurbo::{Point, Size};
use smallvec::SmallVec;
use stormscroll_sections::{
    DuplicateIdError, InitReport, IntersectionSignal, LifecycleCall, NavKey, NavigationState,
    ProgressThrottle, ScrollCommand, ScrollCoordinator, ScrollDirection, Section, SectionRegistry,
};
use stormscroll_tracks::{LoadReport, StormDataset, StormId, TableSource};
use stormscroll_viewer::{StormViewerController, ViewerPhase};

use crate::config::{ConfigError, StoryConfig};
use crate::host::{StoryHost, SurfaceTarget};
use crate::map::StormMap;
use crate::panels::ViewerPanels;
use crate::sections::{ChartDrawer, ChartSection, StormMapSection};

/// Something the host should react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoryEvent {
    /// Scroll the page so this section comes into view.
    ScrollTo(ScrollCommand),
    /// The map started zooming onto a storm.
    ZoomStarted(StormId),
    /// The zoom finished and the storm's viewer is shown.
    ViewerOpened(StormId),
    /// The shown viewer has no data; the host should load it, e.g. with
    /// [`Story::open_viewer`] or [`Story::preload`].
    ViewerNeedsData(StormId),
    /// Viewers were hidden.
    ViewersHidden(SmallVec<[StormId; 4]>),
    /// A viewer's playback reached the last timestamp.
    PlaybackFinished(StormId),
}

/// Maps a DOM-style key name to a navigation key.
///
/// ```rust
/// use stormscroll::nav_key;
/// use stormscroll_sections::NavKey;
///
/// assert_eq!(nav_key("PageDown"), Some(NavKey::Next));
/// assert_eq!(nav_key("Home"), Some(NavKey::Home));
/// assert_eq!(nav_key("Enter"), None);
/// ```
#[must_use]
pub fn nav_key(key: &str) -> Option<NavKey> {
    match key {
        "ArrowDown" | "PageDown" => Some(NavKey::Next),
        "ArrowUp" | "PageUp" => Some(NavKey::Previous),
        "Home" => Some(NavKey::Home),
        "End" => Some(NavKey::End),
        _ => None,
    }
}

/// State shared by every section: the host, the map and the viewers.
pub struct StoryContext<H> {
    host: H,
    map: StormMap,
    panels: ViewerPanels,
    map_interactive: bool,
    events: Vec<StoryEvent>,
}

impl<H> fmt::Debug for StoryContext<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryContext")
            .field("map", &self.map)
            .field("panels", &self.panels)
            .field("map_interactive", &self.map_interactive)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl<H: StoryHost> StoryContext<H> {
    fn new(config: &StoryConfig, host: H) -> Self {
        Self {
            host,
            map: StormMap::new(config.map.clone()),
            panels: ViewerPanels::new(config.viewer.to_viewer_config()),
            map_interactive: false,
            events: Vec::new(),
        }
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The overview map.
    pub fn map(&self) -> &StormMap {
        &self.map
    }

    /// The overview map, mutably.
    pub fn map_mut(&mut self) -> &mut StormMap {
        &mut self.map
    }

    /// The storm viewers.
    pub fn panels(&self) -> &ViewerPanels {
        &self.panels
    }

    /// The storm viewers, mutably.
    pub fn panels_mut(&mut self) -> &mut ViewerPanels {
        &mut self.panels
    }

    /// `true` while pointer input reaches the map.
    pub fn is_map_interactive(&self) -> bool {
        self.map_interactive
    }

    /// Enables or disables pointer input on the map.
    pub fn set_map_interactive(&mut self, interactive: bool) {
        self.map_interactive = interactive;
    }

    /// Queues an event for the next [`Story::tick`].
    pub fn push_event(&mut self, event: StoryEvent) {
        self.events.push(event);
    }

    /// Draws the map into its surface.
    pub fn render_map(&mut self) {
        if let Some(surface) = self.host.surface(&SurfaceTarget::Map) {
            self.map.render(surface);
        }
    }

    /// Draws every visible viewer whose state changed.
    pub fn render_viewers(&mut self) {
        for viewer in self.panels.iter_mut() {
            if !(viewer.is_visible() && viewer.needs_render()) {
                continue;
            }
            if let Some(surface) = self.host.surface(&SurfaceTarget::Viewer(viewer.id())) {
                viewer.render(surface);
            }
        }
    }

    /// Starts the zoom onto `id`, fitted to its loaded track if cached.
    pub fn zoom_to_storm(&mut self, id: StormId) {
        let dataset = self.panels.cache().get(id);
        self.map.zoom_to_storm(id, dataset.as_deref().map(StormDataset::track));
        self.events.push(StoryEvent::ZoomStarted(id));
    }

    /// Hides the viewers, undims the map and zooms back out.
    pub fn reset_zoom(&mut self) {
        self.hide_viewers();
        self.map.reset_zoom();
    }

    /// Hides every viewer and blanks their surfaces.
    pub fn hide_viewers(&mut self) {
        let hidden = self.panels.hide_all();
        self.clear_viewers(&hidden);
    }

    /// Shows the viewer for `id`, hiding any other.
    ///
    /// A viewer without data starts loading and queues
    /// [`StoryEvent::ViewerNeedsData`].
    pub fn show_viewer(&mut self, id: StormId) {
        if self.panels.prepare(id) {
            self.events.push(StoryEvent::ViewerNeedsData(id));
        }
        self.display_viewer(id);
    }

    pub(crate) fn display_viewer(&mut self, id: StormId) {
        let hidden = self.panels.show_only(id);
        self.clear_viewers(&hidden);
        self.events.push(StoryEvent::ViewerOpened(id));
        self.render_viewers();
    }

    fn clear_viewers(&mut self, hidden: &[StormId]) {
        if hidden.is_empty() {
            return;
        }
        for id in hidden {
            if let Some(surface) = self.host.surface(&SurfaceTarget::Viewer(*id)) {
                surface.clear();
            }
        }
        self.events.push(StoryEvent::ViewersHidden(hidden.iter().copied().collect()));
    }
}

/// The whole scroll-driven story.
///
/// Owns the section registry, the scroll coordinator and the shared
/// [`StoryContext`]. The host feeds it intersection signals, progress,
/// keyboard and pointer input, calls [`Story::tick`] once per animation
/// frame and reacts to the returned [`StoryEvent`]s.
pub struct Story<H> {
    config: StoryConfig,
    registry: SectionRegistry<StoryContext<H>>,
    coordinator: ScrollCoordinator,
    throttle: ProgressThrottle,
    throttled: Option<usize>,
    ctx: StoryContext<H>,
}

impl<H> fmt::Debug for Story<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Story")
            .field("registry", &self.registry)
            .field("coordinator", &self.coordinator)
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}

impl<H: StoryHost + 'static> Story<H> {
    /// Creates an empty story; `config` is validated first.
    pub fn new(config: StoryConfig, host: H) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry: SectionRegistry::new(),
            coordinator: ScrollCoordinator::new(config.scroll.threshold),
            throttle: ProgressThrottle::new(config.scroll.progress_step),
            throttled: None,
            ctx: StoryContext::new(&config, host),
            config,
        })
    }

    /// Settings.
    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    /// Appends a section.
    pub fn add_section(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        section: Box<dyn Section<StoryContext<H>>>,
    ) -> Result<usize, DuplicateIdError> {
        self.registry.register(id, title, section)
    }

    /// Appends the interactive storm map section.
    pub fn add_map_section(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<usize, DuplicateIdError> {
        self.add_section(id, title, Box::new(StormMapSection::new()))
    }

    /// Appends a chart section drawn by `drawer`.
    pub fn add_chart<D: ChartDrawer + 'static>(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        drawer: D,
    ) -> Result<usize, DuplicateIdError> {
        let id = id.into();
        let section = ChartSection::new(id.clone(), drawer);
        self.add_section(id, title, Box::new(section))
    }

    /// Runs one-time setup of every section; failures are reported, not fatal.
    pub fn initialize(&mut self) -> InitReport {
        self.registry.initialize_all(&mut self.ctx)
    }

    /// The registry.
    pub fn registry(&self) -> &SectionRegistry<StoryContext<H>> {
        &self.registry
    }

    /// The coordinator.
    pub fn coordinator(&self) -> &ScrollCoordinator {
        &self.coordinator
    }

    /// Shared context.
    pub fn context(&self) -> &StoryContext<H> {
        &self.ctx
    }

    /// Shared context, mutably.
    pub fn context_mut(&mut self) -> &mut StoryContext<H> {
        &mut self.ctx
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.ctx.host
    }

    /// The overview map.
    pub fn map(&self) -> &StormMap {
        &self.ctx.map
    }

    /// The viewer for `id`.
    pub fn viewer(&self, id: StormId) -> Option<&StormViewerController> {
        self.ctx.panels.get(id)
    }

    /// The viewer for `id`, mutably, for play/pause/seek controls.
    ///
    /// Call [`Story::render`] afterwards to redraw.
    pub fn viewer_mut(&mut self, id: StormId) -> Option<&mut StormViewerController> {
        self.ctx.panels.get_mut(id)
    }

    /// Active section index.
    pub fn current_section(&self) -> Option<usize> {
        self.coordinator.current()
    }

    /// Progress indicator state.
    pub fn navigation(&self) -> Option<NavigationState> {
        self.coordinator.navigation(&self.registry)
    }

    /// Feeds one intersection observation.
    pub fn handle_signal(&mut self, signal: &IntersectionSignal) -> SmallVec<[LifecycleCall; 4]> {
        let calls = self
            .coordinator
            .handle_signal(&mut self.registry, &mut self.ctx, signal);
        if !calls.is_empty() {
            self.throttled = None;
        }
        calls
    }

    /// Feeds scroll progress through section `index`.
    ///
    /// Updates that moved less than the configured step are dropped.
    pub fn handle_progress(&mut self, index: usize, progress: f64) -> Option<LifecycleCall> {
        if self.coordinator.current() != Some(index) {
            return None;
        }
        if self.throttled != Some(index) {
            self.throttle.reset();
            self.throttled = Some(index);
        }
        let progress = self.throttle.admit(progress)?;
        self.coordinator
            .handle_progress(&mut self.registry, &mut self.ctx, index, progress)
    }

    /// Exits the active section, e.g. when the story is torn down.
    pub fn leave(&mut self, direction: ScrollDirection) -> Option<LifecycleCall> {
        self.throttled = None;
        self.coordinator.leave(&mut self.registry, &mut self.ctx, direction)
    }

    /// Keyboard navigation; the resulting command is also queued as an event.
    pub fn handle_key(&mut self, key: NavKey) -> Option<ScrollCommand> {
        let command = self.coordinator.navigate(&self.registry, key)?;
        self.ctx.push_event(StoryEvent::ScrollTo(command.clone()));
        Some(command)
    }

    /// Navigation to a section by index, e.g. from a progress indicator dot.
    pub fn scroll_to_section(&mut self, index: usize) -> Option<ScrollCommand> {
        let command = self.coordinator.scroll_to_section(&self.registry, index)?;
        self.ctx.push_event(StoryEvent::ScrollTo(command.clone()));
        Some(command)
    }

    /// Resizes the map.
    pub fn set_viewport(&mut self, size: Size) {
        self.ctx.map.set_viewport(size.width, size.height);
    }

    /// Resizes the storm viewer canvases and redraws the visible one.
    pub fn set_viewer_viewport(&mut self, size: Size) {
        self.ctx.panels.set_viewport(size);
        self.ctx.render_viewers();
    }

    /// Pointer pressed over the map.
    pub fn pointer_down(&mut self, pos: Point) {
        if self.ctx.map_interactive {
            self.ctx.map.pointer_down(pos);
        }
    }

    /// Pointer moved over the map.
    pub fn pointer_move(&mut self, pos: Point) {
        if self.ctx.map_interactive {
            self.ctx.map.pointer_move(pos);
        }
    }

    /// Pointer released over the map; a click on a marker zooms to it.
    pub fn pointer_up(&mut self, pos: Point) -> Option<StormId> {
        if !self.ctx.map_interactive {
            return None;
        }
        let clicked = self.ctx.map.pointer_up(pos)?;
        self.ctx.zoom_to_storm(clicked);
        Some(clicked)
    }

    /// Pointer left the map.
    pub fn pointer_leave(&mut self) {
        self.ctx.map.pointer_leave();
    }

    /// Wheel over the map.
    pub fn wheel(&mut self, anchor: Point, delta_y: f64) {
        if self.ctx.map_interactive {
            self.ctx.map.wheel(anchor, delta_y);
        }
    }

    /// Selects a storm as if its marker was clicked.
    ///
    /// Ignored unless the map section is active, like pointer input.
    /// Returns `true` if the zoom started.
    pub fn select_storm(&mut self, id: StormId) -> bool {
        if !self.ctx.map_interactive {
            tracing::debug!(storm = %id, "storm selected while the map is inactive");
            return false;
        }
        self.ctx.zoom_to_storm(id);
        true
    }

    /// Advances zoom and playback by `dt`, redraws what changed and returns
    /// the events queued since the last tick.
    pub fn tick(&mut self, dt: Duration) -> Vec<StoryEvent> {
        if let Some(id) = self.ctx.map.tick(dt) {
            self.ctx.show_viewer(id);
        }
        for id in self.ctx.panels.advance(dt) {
            self.ctx.push_event(StoryEvent::PlaybackFinished(id));
        }
        self.render();
        core::mem::take(&mut self.ctx.events)
    }

    /// Redraws the map and visible viewers if they changed.
    pub fn render(&mut self) {
        if self.ctx.map.needs_render() {
            self.ctx.render_map();
        }
        self.ctx.render_viewers();
    }

    /// Loads every storm's data up front.
    pub async fn preload<S: TableSource + ?Sized>(&mut self, source: &S) -> LoadReport {
        let report = self.ctx.panels.preload(source).await;
        self.ctx.render_viewers();
        report
    }

    /// Loads `id` if needed and shows its viewer.
    pub async fn open_viewer<S: TableSource + ?Sized>(&mut self, id: StormId, source: &S) -> ViewerPhase {
        let phase = self.ctx.panels.initialize(id, source).await;
        self.ctx.display_viewer(id);
        phase
    }
}
