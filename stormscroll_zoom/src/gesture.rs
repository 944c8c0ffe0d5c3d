// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direct user zoom and pan.
//!
//! Gestures write the projector directly. Because the projector has a single
//! writer at a time, [`apply_gesture`] interrupts any running programmatic
//! transition before touching the transform.
//!
//! ```
//! use kurbo::{Point, Size};
//! use stormscroll_geo::{GeoPoint, GeoProjector};
//! use stormscroll_zoom::{PanDrag, PointerRelease, ZoomAnimator, ZoomGesture, apply_gesture};
//!
//! let mut map = GeoProjector::new(Size::new(800.0, 500.0), GeoPoint::new(-82.0, 27.0), 1.3);
//! let mut zoom = ZoomAnimator::new();
//! let mut drag = PanDrag::default();
//!
//! drag.pointer_down(Point::new(100.0, 100.0));
//! if let Some(gesture) = drag.pointer_move(Point::new(140.0, 90.0)) {
//!     apply_gesture(&mut zoom, &mut map, gesture);
//! }
//! assert_eq!(drag.pointer_up(Point::new(140.0, 90.0)), PointerRelease::DragEnd);
//! assert_eq!(map.transform().x, 40.0);
//! ```

use kurbo::{Point, Vec2};
use stormscroll_geo::{GeoProjector, ZoomTransform};

use crate::ZoomAnimator;

/// Pointer travel below which a press/release pair counts as a click.
pub const DEFAULT_CLICK_SLOP: f64 = 3.0;

/// A direct manipulation of the zoom transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomGesture {
    /// Multiply the scale by `factor`, keeping `anchor` fixed on screen.
    Wheel {
        /// Screen point that stays put.
        anchor: Point,
        /// Scale multiplier; values above 1 zoom in.
        factor: f64,
    },
    /// Move the map by a screen-space delta.
    Pan {
        /// Screen-space movement.
        delta: Vec2,
    },
}

/// Converts a wheel delta (pixels, positive = scroll down) into a zoom factor.
///
/// Scrolling down zooms out and scrolling up zooms in, one doubling per
/// 500 pixels of wheel travel.
#[must_use]
pub fn wheel_zoom_factor(delta_y: f64) -> f64 {
    (-delta_y * 0.002).exp2()
}

/// Applies a gesture to `projector`, interrupting any running transition first.
pub fn apply_gesture(
    animator: &mut ZoomAnimator,
    projector: &mut GeoProjector,
    gesture: ZoomGesture,
) -> ZoomTransform {
    animator.cancel(projector);
    match gesture {
        ZoomGesture::Wheel { anchor, factor } => projector.zoom_about(anchor, factor),
        ZoomGesture::Pan { delta } => projector.pan_by(delta),
    }
}

/// Tracks drag state for move event processing.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragState {
    /// Start position of the drag operation.
    pub start_pos: Option<Point>,
    /// Last recorded pointer position during drag.
    pub last_pos: Option<Point>,
}

impl DragState {
    /// Start tracking a new drag operation from the given position.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Update the drag state with a new position, returning the movement delta since last update.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let delta = self.last_pos.map(|last| pos - last);
        self.last_pos = Some(pos);
        delta
    }

    /// Get total offset from drag start position.
    pub fn total_offset(&self, current_pos: Point) -> Option<Vec2> {
        self.start_pos.map(|start| current_pos - start)
    }

    /// End the current drag operation and reset state.
    pub fn end(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
    }

    /// Returns `true` while a drag operation is active.
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }
}

/// What a pointer release turned out to be.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerRelease {
    /// The pointer barely moved; treat as a click at this position.
    Click(Point),
    /// The pointer dragged the map.
    DragEnd,
    /// No press was being tracked.
    None,
}

/// Turns pointer press/move/release into pan gestures and clicks.
///
/// Movement only becomes a pan once the pointer has travelled further than
/// the click slop from where it was pressed; the first pan then carries the
/// whole offset so no motion is lost.
#[derive(Clone, Copy, Debug)]
pub struct PanDrag {
    drag: DragState,
    slop: f64,
    panning: bool,
}

impl Default for PanDrag {
    fn default() -> Self {
        Self::new(DEFAULT_CLICK_SLOP)
    }
}

impl PanDrag {
    /// Creates a tracker with the given click slop in pixels.
    #[must_use]
    pub fn new(slop: f64) -> Self {
        Self {
            drag: DragState::default(),
            slop: slop.max(0.0),
            panning: false,
        }
    }

    /// Returns `true` between press and release.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Returns `true` once the current press has turned into a pan.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Pointer pressed at `pos`.
    pub fn pointer_down(&mut self, pos: Point) {
        self.drag.start(pos);
        self.panning = false;
    }

    /// Pointer moved to `pos`; yields a pan once beyond the slop.
    pub fn pointer_move(&mut self, pos: Point) -> Option<ZoomGesture> {
        if self.panning {
            let delta = self.drag.update(pos)?;
            return (delta != Vec2::ZERO).then_some(ZoomGesture::Pan { delta });
        }
        let total = self.drag.total_offset(pos)?;
        if total.length() <= self.slop {
            return None;
        }
        self.panning = true;
        self.drag.last_pos = Some(pos);
        Some(ZoomGesture::Pan { delta: total })
    }

    /// Pointer released at `pos`.
    pub fn pointer_up(&mut self, pos: Point) -> PointerRelease {
        let release = match self.drag.total_offset(pos) {
            None => PointerRelease::None,
            Some(_) if self.panning => PointerRelease::DragEnd,
            Some(total) if total.length() <= self.slop => PointerRelease::Click(pos),
            Some(_) => PointerRelease::DragEnd,
        };
        self.drag.end();
        self.panning = false;
        release
    }
}
