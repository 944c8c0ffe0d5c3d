// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use smallvec::SmallVec;

use crate::{ScrollDirection, SectionRegistry};

/// Default visible ratio at which a section becomes active.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// One viewport-intersection observation.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionSignal {
    /// Element id of the observed section.
    pub element_id: String,
    /// Fraction of the element that is visible, in `[0, 1]`.
    pub visible_ratio: f64,
    /// Direction the page was scrolling.
    pub direction: ScrollDirection,
}

impl IntersectionSignal {
    /// Creates a signal.
    pub fn new(element_id: impl Into<String>, visible_ratio: f64, direction: ScrollDirection) -> Self {
        Self {
            element_id: element_id.into(),
            visible_ratio,
            direction,
        }
    }
}

/// A lifecycle hook invocation made by the coordinator, in call order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LifecycleCall {
    /// `on_enter` was called.
    Enter {
        /// Section index.
        index: usize,
        /// Scroll direction.
        direction: ScrollDirection,
    },
    /// `on_exit` was called.
    Exit {
        /// Section index.
        index: usize,
        /// Scroll direction.
        direction: ScrollDirection,
    },
    /// `on_progress` was called.
    Progress {
        /// Section index.
        index: usize,
        /// Clamped progress.
        progress: f64,
    },
}

/// Request for the host to scroll a section into view.
///
/// Explicit navigation never calls hooks itself; the resulting scroll
/// produces intersection signals that drive the normal enter/exit sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrollCommand {
    /// Target section index.
    pub index: usize,
    /// Element id to scroll to.
    pub element_id: String,
}

/// Keyboard navigation keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavKey {
    /// Arrow down / page down.
    Next,
    /// Arrow up / page up.
    Previous,
    /// First section.
    Home,
    /// Last section.
    End,
}

/// Data for the progress indicator and previous/next buttons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationState {
    /// Current section index.
    pub index: usize,
    /// Number of sections.
    pub count: usize,
    /// "Section N of M".
    pub label: String,
    /// Title of the current section.
    pub title: String,
    /// Whether a previous section exists.
    pub can_go_previous: bool,
    /// Whether a next section exists.
    pub can_go_next: bool,
}

/// Turns intersection and progress signals into ordered lifecycle calls.
///
/// The coordinator owns the "current section" state. For every transition it
/// calls `on_exit` of the section being left before `on_enter` of the section
/// being entered. A signal that skips sections walks every boundary in
/// between, so each intermediate section is entered and exited once.
#[derive(Clone, Debug)]
pub struct ScrollCoordinator {
    threshold: f64,
    current: Option<usize>,
}

impl Default for ScrollCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ScrollCoordinator {
    /// Creates a coordinator activating sections at `threshold` visibility.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            current: None,
        }
    }

    /// Visibility threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Currently active section.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Processes one intersection signal, calling hooks as needed.
    ///
    /// Signals for unknown ids, or for the already-active section crossing
    /// the threshold again, call nothing. A signal for the active section
    /// dropping below the threshold only matters at the ends of the story:
    /// scrolling up past the first section or down past the last exits it
    /// and leaves no section active.
    pub fn handle_signal<C>(
        &mut self,
        registry: &mut SectionRegistry<C>,
        ctx: &mut C,
        signal: &IntersectionSignal,
    ) -> SmallVec<[LifecycleCall; 4]> {
        let mut calls = SmallVec::new();
        let Some(target) = registry.index_of(&signal.element_id) else {
            tracing::debug!(id = %signal.element_id, "signal for unknown section");
            return calls;
        };

        if signal.visible_ratio >= self.threshold {
            self.walk_to(registry, ctx, target, signal.direction, &mut calls);
            return calls;
        }

        if self.current != Some(target) {
            return calls;
        }
        let leaving_top = target == 0 && signal.direction == ScrollDirection::Up;
        let leaving_bottom = target + 1 == registry.len() && signal.direction == ScrollDirection::Down;
        if leaving_top || leaving_bottom {
            registry.exit(target, ctx, signal.direction);
            calls.push(LifecycleCall::Exit {
                index: target,
                direction: signal.direction,
            });
            self.current = None;
        }
        calls
    }

    /// Forwards progress for the section at `index`, clamped to `[0, 1]`.
    ///
    /// Progress for any section other than the active one is dropped.
    pub fn handle_progress<C>(
        &mut self,
        registry: &mut SectionRegistry<C>,
        ctx: &mut C,
        index: usize,
        progress: f64,
    ) -> Option<LifecycleCall> {
        if self.current != Some(index) || progress.is_nan() {
            return None;
        }
        let progress = progress.clamp(0.0, 1.0);
        registry.progress(index, ctx, progress).then_some(LifecycleCall::Progress { index, progress })
    }

    /// Exits the active section, if any, leaving none active.
    pub fn leave<C>(
        &mut self,
        registry: &mut SectionRegistry<C>,
        ctx: &mut C,
        direction: ScrollDirection,
    ) -> Option<LifecycleCall> {
        let index = self.current.take()?;
        registry.exit(index, ctx, direction);
        Some(LifecycleCall::Exit { index, direction })
    }

    /// Builds the scroll command for `index`, or `None` if out of range.
    #[must_use]
    pub fn scroll_to_section<C>(
        &self,
        registry: &SectionRegistry<C>,
        index: usize,
    ) -> Option<ScrollCommand> {
        registry.get(index).map(|desc| ScrollCommand {
            index,
            element_id: desc.id().to_owned(),
        })
    }

    /// Maps a navigation key to a scroll command.
    ///
    /// With no active section navigation behaves as if the first one were
    /// active. Targets past either end yield `None`.
    #[must_use]
    pub fn navigate<C>(&self, registry: &SectionRegistry<C>, key: NavKey) -> Option<ScrollCommand> {
        let current = self.current.unwrap_or(0);
        let target = match key {
            NavKey::Next => current.checked_add(1)?,
            NavKey::Previous => current.checked_sub(1)?,
            NavKey::Home => 0,
            NavKey::End => registry.len().checked_sub(1)?,
        };
        self.scroll_to_section(registry, target)
    }

    /// Progress indicator and button state for the active section.
    #[must_use]
    pub fn navigation<C>(&self, registry: &SectionRegistry<C>) -> Option<NavigationState> {
        let index = self.current?;
        let desc = registry.get(index)?;
        let count = registry.len();
        Some(NavigationState {
            index,
            count,
            label: format!("Section {} of {}", index + 1, count),
            title: desc.title().to_owned(),
            can_go_previous: index > 0,
            can_go_next: index + 1 < count,
        })
    }

    fn walk_to<C>(
        &mut self,
        registry: &mut SectionRegistry<C>,
        ctx: &mut C,
        target: usize,
        entry_direction: ScrollDirection,
        calls: &mut SmallVec<[LifecycleCall; 4]>,
    ) {
        let Some(mut at) = self.current else {
            let direction = entry_direction;
            self.current = Some(target);
            registry.enter(target, ctx, direction);
            calls.push(LifecycleCall::Enter { index: target, direction });
            return;
        };
        while at != target {
            let (next, direction) = if target > at {
                (at + 1, ScrollDirection::Down)
            } else {
                (at - 1, ScrollDirection::Up)
            };
            registry.exit(at, ctx, direction);
            calls.push(LifecycleCall::Exit { index: at, direction });
            self.current = Some(next);
            registry.enter(next, ctx, direction);
            calls.push(LifecycleCall::Enter { index: next, direction });
            at = next;
        }
    }
}
