// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stormscroll Zoom: animated and direct changes to a map's zoom transform.
//!
//! - [`ZoomAnimator`] runs one timed, eased transition at a time from one
//!   [`ZoomTransform`](stormscroll_geo::ZoomTransform) to another, emitting
//!   `Start` followed by exactly one of `Interrupt` or `End`.
//! - [`ZoomGesture`] and [`apply_gesture`] cover wheel zoom and drag pan,
//!   interrupting programmatic transitions so the projector keeps a single
//!   writer.
//! - [`PanDrag`] separates clicks from drags for pointer input.
//!
//! The animator owns no clock: the host calls [`ZoomAnimator::tick`] once per
//! animation frame with the elapsed wall-clock time.

mod animator;
pub mod easing;
mod gesture;

pub use animator::{
    AnimatorPhase, TransitionId, ZoomAnimator, ZoomError, ZoomEvent, ZoomEventKind,
};
pub use gesture::{
    DEFAULT_CLICK_SLOP, DragState, PanDrag, PointerRelease, ZoomGesture, apply_gesture,
    wheel_zoom_factor,
};
