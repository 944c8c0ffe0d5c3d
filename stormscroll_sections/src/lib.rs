// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stormscroll Sections: the scroll-driven section lifecycle.
//!
//! A story is a fixed, ordered list of sections. Each implements [`Section`]
//! over a shared context type `C`. The pieces:
//! - [`SectionRegistry`] owns the sections, rejects duplicate ids, runs each
//!   section's `initialize` once with failures isolated, and maps visibility
//!   ratios to a section index.
//! - [`ScrollCoordinator`] owns the current-section state and turns
//!   intersection signals into `on_exit` / `on_enter` calls, exit first, one
//!   pair per boundary crossed. It also forwards progress to the active
//!   section and turns keyboard navigation into [`ScrollCommand`]s.
//! - [`ProgressThrottle`] lets sections skip progress updates that barely moved.
//!
//! Scroll listening itself belongs to the host: it reports what is visible
//! through [`IntersectionSignal`]s and performs the [`ScrollCommand`]s it is
//! handed.
//!
//! ## Example
//!
//! ```rust
//! use stormscroll_sections::{
//!     IntersectionSignal, LifecycleCall, ScrollCoordinator, ScrollDirection, Section,
//!     SectionRegistry,
//! };
//!
//! struct Quiet;
//! impl Section<()> for Quiet {
//!     fn on_enter(&mut self, _: &mut (), _: ScrollDirection) {}
//!     fn on_exit(&mut self, _: &mut (), _: ScrollDirection) {}
//! }
//!
//! let mut registry = SectionRegistry::new();
//! for id in ["hook", "tracks", "damage"] {
//!     registry.register(id, id, Box::new(Quiet)).unwrap();
//! }
//! let mut scroll = ScrollCoordinator::default();
//! let down = ScrollDirection::Down;
//!
//! scroll.handle_signal(&mut registry, &mut (), &IntersectionSignal::new("hook", 0.9, down));
//! // A fast scroll lands on "damage" directly; "tracks" still gets its turn.
//! let calls = scroll.handle_signal(&mut registry, &mut (), &IntersectionSignal::new("damage", 0.7, down));
//! assert_eq!(
//!     calls.as_slice(),
//!     [
//!         LifecycleCall::Exit { index: 0, direction: down },
//!         LifecycleCall::Enter { index: 1, direction: down },
//!         LifecycleCall::Exit { index: 1, direction: down },
//!         LifecycleCall::Enter { index: 2, direction: down },
//!     ]
//! );
//! assert_eq!(scroll.current(), Some(2));
//! ```

mod coordinator;
mod registry;
mod section;
mod throttle;

pub use coordinator::{
    DEFAULT_THRESHOLD, IntersectionSignal, LifecycleCall, NavKey, NavigationState, ScrollCommand,
    ScrollCoordinator,
};
pub use registry::{DuplicateIdError, InitReport, SectionRegistry};
pub use section::{InitState, ScrollDirection, Section, SectionDescriptor, SectionError};
pub use throttle::ProgressThrottle;
