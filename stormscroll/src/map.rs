// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::cell::Cell;
use core::time::Duration;
use std::rc::Rc;

use kurbo::{Point, Vec2};
use peniko::Color;
use peniko::color::palette;
use stormscroll_geo::{BoundsCalculator, GeoPoint, GeoProjector, ZoomTransform};
use stormscroll_surface::{PathStyle, Surface};
use stormscroll_tracks::{StormId, StormTrack, TrackSource};
use stormscroll_zoom::{
    PanDrag, PointerRelease, TransitionId, ZoomAnimator, ZoomEventKind, ZoomGesture, apply_gesture,
    wheel_zoom_factor,
};

use crate::config::MapConfig;

const WATER: Color = Color::from_rgb8(0xd6, 0xea, 0xf8);
const LAND: Color = Color::from_rgb8(0x38, 0x8e, 0x3c);
const LAND_EDGE: Color = Color::from_rgb8(0x2e, 0x7d, 0x32);
const OUTLINE: Color = Color::from_rgb8(0x2c, 0x3e, 0x50);
const MARKER_EDGE: Color = palette::css::WHITE;
const TOOLTIP: Color = palette::css::BLACK;

/// A clickable storm on the overview map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StormMarker {
    /// Storm id.
    pub id: StormId,
    /// Marker position.
    pub position: GeoPoint,
    /// Fill color.
    pub color: Color,
}

impl StormMarker {
    /// The catalog marker for `id`.
    #[must_use]
    pub fn for_storm(id: StormId) -> Self {
        let spec = id.spec();
        Self {
            id,
            position: spec.marker,
            color: spec.marker_color(),
        }
    }
}

/// A land polygon drawn under the markers.
#[derive(Clone, Debug, PartialEq)]
pub struct LandShape {
    /// Name, e.g. a state.
    pub name: String,
    /// Closed outline ring.
    pub ring: Vec<GeoPoint>,
    /// Draw with the emphasized outline.
    pub highlighted: bool,
}

impl LandShape {
    /// Creates a plain shape.
    pub fn new(name: impl Into<String>, ring: Vec<GeoPoint>) -> Self {
        Self {
            name: name.into(),
            ring,
            highlighted: false,
        }
    }

    /// Marks the shape as emphasized.
    #[must_use]
    pub fn highlighted(mut self) -> Self {
        self.highlighted = true;
        self
    }
}

/// What one [`StormMap::render`] drew.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapFrame {
    /// Land shapes drawn.
    pub shapes: usize,
    /// Markers drawn (on screen).
    pub markers: usize,
    /// Opacity applied to the surface.
    pub opacity: f64,
}

/// The overview map: projection, zoom, markers and pointer state.
///
/// The projector has one writer at a time. Programmatic zooms go through the
/// [`ZoomAnimator`]; pointer gestures interrupt any running zoom before
/// touching the transform.
#[derive(Debug)]
pub struct StormMap {
    config: MapConfig,
    projector: GeoProjector,
    animator: ZoomAnimator,
    calculator: BoundsCalculator,
    drag: PanDrag,
    markers: Vec<StormMarker>,
    land: Vec<LandShape>,
    hovered: Option<StormId>,
    /// Zoom in flight towards a storm.
    pending: Option<(TransitionId, StormId)>,
    focused: Option<StormId>,
    /// Set by the projector's redraw listener.
    projection_changed: Rc<Cell<bool>>,
    dirty: bool,
}

impl StormMap {
    /// Creates the map with a marker for every catalog storm.
    #[must_use]
    pub fn new(config: MapConfig) -> Self {
        let mut projector =
            GeoProjector::new(config.viewport(), config.center(), config.scale_factor)
                .with_scale_extent(config.scale_extent());
        let projection_changed = Rc::new(Cell::new(true));
        let flag = Rc::clone(&projection_changed);
        projector.on_redraw(Box::new(move |_| flag.set(true)));
        Self {
            calculator: BoundsCalculator::new(config.fit_padding_degrees, config.fit_margin),
            config,
            projector,
            animator: ZoomAnimator::new(),
            drag: PanDrag::default(),
            markers: StormId::ALL.into_iter().map(StormMarker::for_storm).collect(),
            land: Vec::new(),
            hovered: None,
            pending: None,
            focused: None,
            projection_changed,
            dirty: true,
        }
    }

    /// Settings.
    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// The map projection.
    #[must_use]
    pub fn projector(&self) -> &GeoProjector {
        &self.projector
    }

    /// The zoom animator.
    #[must_use]
    pub fn animator(&self) -> &ZoomAnimator {
        &self.animator
    }

    /// Markers in draw order.
    #[must_use]
    pub fn markers(&self) -> &[StormMarker] {
        &self.markers
    }

    /// Land shapes in draw order.
    #[must_use]
    pub fn land(&self) -> &[LandShape] {
        &self.land
    }

    /// Replaces the land shapes.
    pub fn set_land(&mut self, land: Vec<LandShape>) {
        self.land = land;
        self.dirty = true;
    }

    /// Hovered storm.
    #[must_use]
    pub fn hovered(&self) -> Option<StormId> {
        self.hovered
    }

    /// Storm the map is zoomed onto, once its zoom finished.
    #[must_use]
    pub fn focused(&self) -> Option<StormId> {
        self.focused
    }

    /// `true` while dimmed behind a storm viewer.
    #[must_use]
    pub fn is_dimmed(&self) -> bool {
        self.focused.is_some()
    }

    /// `true` while a zoom transition runs.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_transitioning()
    }

    /// `true` if anything visible changed since the last render.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.dirty || self.projection_changed.get()
    }

    /// Resets the map to its initial view.
    ///
    /// Cancels zoom and drag, clears hover and focus, and restores the base
    /// center and the identity transform.
    pub fn rebuild(&mut self) {
        self.animator.cancel(&mut self.projector);
        self.animator.drain_events();
        self.projector.apply_transform(ZoomTransform::IDENTITY);
        self.projector.set_center(self.config.center());
        self.drag = PanDrag::default();
        self.hovered = None;
        self.pending = None;
        self.focused = None;
        self.dirty = true;
    }

    /// Resizes the map.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.projector.set_viewport(width, height);
    }

    /// Starts the animated zoom onto storm `id`.
    ///
    /// The target fits the storm's track, `track` if given or else the
    /// catalog positions. A track that can't be fitted (no positions, or all
    /// at one point) falls back to the maximum zoom centered on the marker.
    /// Any running zoom is interrupted.
    pub fn zoom_to_storm(&mut self, id: StormId, track: Option<&StormTrack>) -> TransitionId {
        let spec = id.spec();
        let fitted = match (track, spec.track) {
            (Some(track), _) => self.calculator.compute_bounds(track.positions()),
            (None, TrackSource::Explicit(positions)) => {
                self.calculator.compute_bounds(positions.iter().map(|p| p.position))
            }
            (None, TrackSource::Centroids(_)) => self.calculator.compute_bounds([spec.marker]),
        }
        .and_then(|bounds| {
            self.projector.fit_bounds(
                &bounds,
                self.calculator.padding_degrees,
                self.calculator.margin_fraction,
            )
        });
        let target = fitted.unwrap_or_else(|err| {
            tracing::debug!(storm = %id, error = %err, "zooming to the marker instead");
            self.projector
                .transform_centered_on(spec.marker, self.projector.scale_extent().max())
        });

        self.focused = None;
        self.hovered = None;
        self.dirty = true;
        let transition = self
            .animator
            .retarget(&mut self.projector, target, self.config.zoom_duration());
        self.pending = Some((transition, id));
        tracing::debug!(storm = %id, k = target.k, "zooming to storm");
        transition
    }

    /// Stops a zoom in flight where it is.
    ///
    /// The storm it was heading for is never focused.
    pub fn cancel_zoom(&mut self) {
        if self.animator.cancel(&mut self.projector) {
            tracing::debug!("storm zoom cancelled");
        }
        self.animator.drain_events();
        self.pending = None;
    }

    /// Animates back to the initial view and undims.
    pub fn reset_zoom(&mut self) {
        self.pending = None;
        self.focused = None;
        self.dirty = true;
        if self.projector.transform() != ZoomTransform::IDENTITY || self.animator.is_transitioning() {
            self.animator.retarget(
                &mut self.projector,
                ZoomTransform::IDENTITY,
                self.config.zoom_duration(),
            );
        }
    }

    /// Advances the zoom animation.
    ///
    /// Returns the storm whose zoom completed during this tick; the map is
    /// dimmed from then on.
    pub fn tick(&mut self, dt: Duration) -> Option<StormId> {
        self.animator.tick(dt, &mut self.projector);
        let mut completed = None;
        for event in self.animator.drain_events() {
            let Some((pending, storm)) = self.pending else {
                continue;
            };
            if event.id != pending {
                continue;
            }
            match event.kind {
                ZoomEventKind::Start => {}
                ZoomEventKind::End => {
                    self.pending = None;
                    self.focused = Some(storm);
                    self.dirty = true;
                    completed = Some(storm);
                }
                ZoomEventKind::Interrupt => self.pending = None,
            }
        }
        completed
    }

    /// Moves the base center with section scroll progress.
    ///
    /// Above the drift threshold the center shifts east by
    /// `progress * progress_drift_degrees`; below it the base center holds.
    pub fn apply_progress(&mut self, progress: f64) {
        let base = self.config.center();
        let center = if progress > self.config.progress_drift_threshold {
            GeoPoint::new(base.lon + progress * self.config.progress_drift_degrees, base.lat)
        } else {
            base
        };
        self.projector.set_center(center);
    }

    /// Marker under `pos`, topmost first.
    #[must_use]
    pub fn hit_test(&self, pos: Point) -> Option<StormId> {
        self.markers.iter().rev().find_map(|marker| {
            let radius = self.marker_radius(marker.id);
            let screen = self.projector.project(marker.position);
            (screen.distance(pos) <= radius).then_some(marker.id)
        })
    }

    /// Pointer pressed.
    pub fn pointer_down(&mut self, pos: Point) {
        self.drag.pointer_down(pos);
    }

    /// Pointer moved: pans while dragging, otherwise updates hover.
    pub fn pointer_move(&mut self, pos: Point) {
        if let Some(gesture) = self.drag.pointer_move(pos) {
            apply_gesture(&mut self.animator, &mut self.projector, gesture);
            self.pending = None;
            return;
        }
        if self.drag.is_pressed() {
            return;
        }
        let hovered = self.hit_test(pos);
        if hovered != self.hovered {
            self.hovered = hovered;
            self.dirty = true;
        }
    }

    /// Pointer released. Returns the storm clicked, if any.
    pub fn pointer_up(&mut self, pos: Point) -> Option<StormId> {
        match self.drag.pointer_up(pos) {
            PointerRelease::Click(at) => self.hit_test(at),
            PointerRelease::DragEnd | PointerRelease::None => None,
        }
    }

    /// Pointer left the map.
    pub fn pointer_leave(&mut self) {
        self.clear_hover();
        if self.drag.is_pressed() {
            self.drag = PanDrag::default();
        }
    }

    /// Clears the hover highlight.
    pub fn clear_hover(&mut self) {
        if self.hovered.take().is_some() {
            self.dirty = true;
        }
    }

    /// Wheel zoom about `anchor`; positive `delta_y` zooms out.
    pub fn wheel(&mut self, anchor: Point, delta_y: f64) {
        let gesture = ZoomGesture::Wheel {
            anchor,
            factor: wheel_zoom_factor(delta_y),
        };
        apply_gesture(&mut self.animator, &mut self.projector, gesture);
        self.pending = None;
    }

    /// Pans by a screen delta, interrupting any zoom.
    pub fn pan_by(&mut self, delta: Vec2) {
        apply_gesture(&mut self.animator, &mut self.projector, ZoomGesture::Pan { delta });
        self.pending = None;
    }

    /// Draws water, land and markers.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) -> MapFrame {
        self.projection_changed.set(false);
        self.dirty = false;

        let opacity = if self.is_dimmed() {
            self.config.dimmed_opacity
        } else {
            1.0
        };
        let mut frame = MapFrame {
            opacity,
            ..MapFrame::default()
        };
        surface.clear();
        surface.set_opacity(opacity);

        let viewport = self.projector.viewport_rect();
        let water = [
            Point::new(viewport.x0, viewport.y0),
            Point::new(viewport.x1, viewport.y0),
            Point::new(viewport.x1, viewport.y1),
            Point::new(viewport.x0, viewport.y1),
        ];
        surface.draw_path(&water, &PathStyle::filled(WATER, None));

        let mut ring = Vec::new();
        for shape in &self.land {
            ring.clear();
            ring.extend(shape.ring.iter().map(|p| self.projector.project(*p)));
            if ring.len() < 3 {
                continue;
            }
            let style = if shape.highlighted {
                PathStyle::filled(LAND, Some((OUTLINE, 1.5)))
            } else {
                PathStyle::filled(LAND, Some((LAND_EDGE, 0.5)))
            };
            surface.draw_path(&ring, &style);
            frame.shapes += 1;
        }

        for marker in &self.markers {
            let screen = self.projector.project(marker.position);
            if !self.projector.is_visible(screen) {
                continue;
            }
            let radius = self.marker_radius(marker.id);
            surface.draw_point(screen, MARKER_EDGE, radius * 2.0 + 4.0);
            surface.draw_point(screen, marker.color, radius * 2.0);
            frame.markers += 1;
            if self.hovered == Some(marker.id) {
                let at = screen + Vec2::new(radius + 4.0, -radius);
                surface.draw_text(at, marker.id.spec().name, TOOLTIP);
            }
        }
        frame
    }

    fn marker_radius(&self, id: StormId) -> f64 {
        if self.hovered == Some(id) {
            self.config.marker_hover_radius
        } else {
            self.config.marker_radius
        }
    }
}
