// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Direction of the scroll that caused a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Towards earlier sections.
    Up,
    /// Towards later sections.
    Down,
}

/// Failure reported by [`Section::initialize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionError {
    message: String,
}

impl SectionError {
    /// Creates an error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl core::error::Error for SectionError {}

/// Lifecycle contract implemented by every narrative section.
///
/// `C` is the shared application context handed to every hook.
///
/// Hooks are called by the [`ScrollCoordinator`](crate::ScrollCoordinator):
/// `on_exit` of the previous section always returns before `on_enter` of the
/// next one begins. `on_exit` must be safe to call on a section that never
/// finished entering, and `on_enter` may be called again on a section that
/// was only just exited, so implementations clear what they drew before
/// drawing again.
pub trait Section<C> {
    /// One-time setup, run by [`SectionRegistry::initialize_all`](crate::SectionRegistry::initialize_all).
    fn initialize(&mut self, ctx: &mut C) -> Result<(), SectionError> {
        let _ = ctx;
        Ok(())
    }

    /// The section became the active one.
    fn on_enter(&mut self, ctx: &mut C, direction: ScrollDirection);

    /// The section stopped being the active one.
    fn on_exit(&mut self, ctx: &mut C, direction: ScrollDirection);

    /// Scroll progress through the active section, in `[0, 1]`.
    ///
    /// May be called every animation frame.
    fn on_progress(&mut self, ctx: &mut C, progress: f64) {
        let _ = (ctx, progress);
    }
}

/// A registered section: stable id, display title, position, and lifecycle.
pub struct SectionDescriptor<C> {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) index: usize,
    pub(crate) section: Box<dyn Section<C>>,
    pub(crate) init: InitState,
}

/// Where a section is in its one-time initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitState {
    /// `initialize` has not run yet.
    Pending,
    /// `initialize` succeeded.
    Ready,
    /// `initialize` failed; the failure was logged and the section still
    /// receives lifecycle calls.
    Failed,
}

impl<C> SectionDescriptor<C> {
    /// Element id the section is bound to.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Zero-based display position.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Initialization state.
    #[must_use]
    pub fn init_state(&self) -> InitState {
        self.init
    }
}

impl<C> fmt::Debug for SectionDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("index", &self.index)
            .field("init", &self.init)
            .finish_non_exhaustive()
    }
}
