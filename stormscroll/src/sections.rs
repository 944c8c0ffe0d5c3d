// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;
use peniko::Color;
use peniko::color::palette;
use stormscroll_sections::{ScrollDirection, Section, SectionError};
use stormscroll_surface::Surface;

use crate::host::{StoryHost, SurfaceTarget};
use crate::story::StoryContext;

/// The interactive storm map.
///
/// Entering rebuilds the map from scratch, so re-entry never stacks state.
/// Exiting stops every viewer's playback and clears hover; exiting upwards
/// also closes the viewers and zooms back out.
#[derive(Clone, Copy, Debug, Default)]
pub struct StormMapSection;

impl StormMapSection {
    /// Creates the section.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<H: StoryHost> Section<StoryContext<H>> for StormMapSection {
    fn on_enter(&mut self, ctx: &mut StoryContext<H>, _direction: ScrollDirection) {
        ctx.hide_viewers();
        ctx.map_mut().rebuild();
        ctx.set_map_interactive(true);
        ctx.render_map();
    }

    fn on_exit(&mut self, ctx: &mut StoryContext<H>, direction: ScrollDirection) {
        ctx.set_map_interactive(false);
        ctx.panels_mut().pause_all();
        ctx.map_mut().pointer_leave();
        ctx.map_mut().cancel_zoom();
        if direction == ScrollDirection::Up {
            ctx.reset_zoom();
        }
    }

    fn on_progress(&mut self, ctx: &mut StoryContext<H>, progress: f64) {
        ctx.map_mut().apply_progress(progress);
        ctx.render_map();
    }
}

/// Draws one chart section.
///
/// Drawers are handed the section's surface already cleared; they never
/// need to undo earlier drawing.
pub trait ChartDrawer {
    /// One-time setup, e.g. checking that the chart's data is present.
    fn prepare(&mut self) -> Result<(), SectionError> {
        Ok(())
    }

    /// Draws the chart.
    fn draw(&mut self, surface: &mut dyn Surface);

    /// Scroll progress through the section, in `[0, 1]`.
    fn progress(&mut self, surface: &mut dyn Surface, progress: f64) {
        let _ = (surface, progress);
    }
}

/// A section whose content comes from a [`ChartDrawer`].
#[derive(Debug)]
pub struct ChartSection<D> {
    target: SurfaceTarget,
    drawer: D,
}

impl<D: ChartDrawer> ChartSection<D> {
    /// Creates the section for element `id`; it draws into
    /// [`SurfaceTarget::Chart`] with the same id.
    pub fn new(id: impl Into<String>, drawer: D) -> Self {
        Self {
            target: SurfaceTarget::Chart(id.into()),
            drawer,
        }
    }

    /// The drawer.
    pub fn drawer(&self) -> &D {
        &self.drawer
    }
}

impl<H: StoryHost, D: ChartDrawer> Section<StoryContext<H>> for ChartSection<D> {
    fn initialize(&mut self, _ctx: &mut StoryContext<H>) -> Result<(), SectionError> {
        self.drawer.prepare()
    }

    fn on_enter(&mut self, ctx: &mut StoryContext<H>, _direction: ScrollDirection) {
        if let Some(surface) = ctx.host_mut().surface(&self.target) {
            surface.clear();
            self.drawer.draw(surface);
        }
    }

    fn on_exit(&mut self, ctx: &mut StoryContext<H>, _direction: ScrollDirection) {
        if let Some(surface) = ctx.host_mut().surface(&self.target) {
            surface.clear();
        }
    }

    fn on_progress(&mut self, ctx: &mut StoryContext<H>, progress: f64) {
        if let Some(surface) = ctx.host_mut().surface(&self.target) {
            self.drawer.progress(surface, progress);
        }
    }
}

/// A chart drawer that prints lines of text, for title and closing sections.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPanel {
    lines: Vec<String>,
    color: Color,
    line_height: f64,
}

impl TextPanel {
    /// A panel showing `lines` top to bottom.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            color: palette::css::BLACK,
            line_height: 24.0,
        }
    }

    /// Replaces the text color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// The lines shown.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl ChartDrawer for TextPanel {
    fn prepare(&mut self) -> Result<(), SectionError> {
        if self.lines.is_empty() {
            return Err(SectionError::new("text panel has no lines"));
        }
        Ok(())
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let mut y = self.line_height;
        for line in &self.lines {
            surface.draw_text(Point::new(16.0, y), line, self.color);
            y += self.line_height;
        }
    }
}
