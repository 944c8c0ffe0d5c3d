// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stormscroll Geo: geographic points, the map projection, and zoom fitting.
//!
//! This crate holds the geometry underneath the storm map and the per-storm
//! viewers:
//! - [`GeoPoint`] / [`GeoBounds`] in degrees.
//! - [`NaturalEarth`], the single base projection.
//! - [`GeoProjector`], which combines the base projection with a uniform
//!   [`ZoomTransform`] whose scale is clamped into a [`ScaleExtent`], and
//!   notifies redraw listeners whenever the screen mapping changes.
//! - [`BoundsCalculator`] / [`fit_transform`], which compute the transform that
//!   fits a storm's bounds into the viewport.
//!
//! It does not draw anything; callers project points and cull them with
//! [`GeoProjector::is_visible`] before handing them to a surface.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Size;
//! use stormscroll_geo::{GeoPoint, GeoProjector, compute_bounds};
//!
//! let mut map = GeoProjector::new(Size::new(800.0, 500.0), GeoPoint::new(-82.0, 27.0), 1.3);
//!
//! let track = [GeoPoint::new(-90.0, 20.0), GeoPoint::new(-80.0, 30.0)];
//! let bounds = compute_bounds(track).unwrap();
//! let target = map.fit_bounds(&bounds, 0.5, 0.2).unwrap();
//! map.apply_transform(target);
//!
//! for p in track {
//!     assert!(map.is_visible(map.project(p)));
//! }
//! ```

mod fit;
mod point;
mod projection;
mod projector;

pub use fit::{BoundsCalculator, BoundsError, compute_bounds, fit_transform, projected_box};
pub use point::{GeoBounds, GeoPoint};
pub use projection::{NaturalEarth, natural_earth_raw, natural_earth_raw_invert};
pub use projector::{
    GeoProjector, OFFSCREEN, ProjectionState, RedrawListener, ScaleExtent, ZoomTransform,
};
