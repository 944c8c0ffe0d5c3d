// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use hashbrown::HashMap;

use crate::section::{InitState, Section, SectionDescriptor, SectionError};
use crate::ScrollDirection;

/// A section id was registered twice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateIdError {
    /// The offending id.
    pub id: String,
}

impl fmt::Display for DuplicateIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section id `{}` is already registered", self.id)
    }
}

impl core::error::Error for DuplicateIdError {}

/// Outcome of [`SectionRegistry::initialize_all`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Indices whose `initialize` succeeded during this call.
    pub ready: Vec<usize>,
    /// Indices whose `initialize` failed during this call, with the error.
    pub failed: Vec<(usize, SectionError)>,
}

impl InitReport {
    /// Returns `true` if no section failed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Ordered, id-indexed collection of sections.
///
/// Sections are appended in display order; a section's index is its
/// registration position. The registry owns the sections and is the only way
/// their hooks get called.
pub struct SectionRegistry<C> {
    sections: Vec<SectionDescriptor<C>>,
    by_id: HashMap<String, usize>,
}

impl<C> Default for SectionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for SectionRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionRegistry")
            .field("sections", &self.sections)
            .finish_non_exhaustive()
    }
}

impl<C> SectionRegistry<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Appends a section, returning its index.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        section: Box<dyn Section<C>>,
    ) -> Result<usize, DuplicateIdError> {
        let id = id.into();
        if self.by_id.contains_key(&id) {
            return Err(DuplicateIdError { id });
        }
        let index = self.sections.len();
        self.by_id.insert(id.clone(), index);
        self.sections.push(SectionDescriptor {
            id,
            title: title.into(),
            index,
            section,
            init: InitState::Pending,
        });
        Ok(index)
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Descriptor at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SectionDescriptor<C>> {
        self.sections.get(index)
    }

    /// Index of the section bound to `id`.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Descriptors in display order.
    pub fn iter(&self) -> impl Iterator<Item = &SectionDescriptor<C>> {
        self.sections.iter()
    }

    /// Runs `initialize` on every section that has not been initialized yet,
    /// in registration order.
    ///
    /// A failing section is logged and recorded in the report; the remaining
    /// sections still initialize. Each section's `initialize` runs at most
    /// once over the registry's lifetime.
    pub fn initialize_all(&mut self, ctx: &mut C) -> InitReport {
        let mut report = InitReport::default();
        for desc in &mut self.sections {
            if desc.init != InitState::Pending {
                continue;
            }
            match desc.section.initialize(ctx) {
                Ok(()) => {
                    desc.init = InitState::Ready;
                    tracing::debug!(index = desc.index, id = %desc.id, "section initialized");
                    report.ready.push(desc.index);
                }
                Err(err) => {
                    desc.init = InitState::Failed;
                    tracing::warn!(index = desc.index, id = %desc.id, error = %err, "section failed to initialize");
                    report.failed.push((desc.index, err));
                }
            }
        }
        report
    }

    /// Picks the section that should be active given per-element visibility.
    ///
    /// Returns the index of the section with the highest visible ratio at or
    /// above `threshold`; ties go to the earlier section. Unknown ids and
    /// non-finite ratios are ignored.
    pub fn resolve_section<'a>(
        &self,
        visibility: impl IntoIterator<Item = (&'a str, f64)>,
        threshold: f64,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (id, ratio) in visibility {
            let Some(index) = self.index_of(id) else {
                continue;
            };
            if !ratio.is_finite() || ratio < threshold {
                continue;
            }
            best = match best {
                Some((bi, br)) if br > ratio || (br == ratio && bi < index) => Some((bi, br)),
                _ => Some((index, ratio)),
            };
        }
        best.map(|(index, _)| index)
    }

    /// Calls `on_enter` of the section at `index`. Returns `false` if there is none.
    pub fn enter(&mut self, index: usize, ctx: &mut C, direction: ScrollDirection) -> bool {
        let Some(desc) = self.sections.get_mut(index) else {
            return false;
        };
        tracing::debug!(index, id = %desc.id, ?direction, "section enter");
        desc.section.on_enter(ctx, direction);
        true
    }

    /// Calls `on_exit` of the section at `index`. Returns `false` if there is none.
    pub fn exit(&mut self, index: usize, ctx: &mut C, direction: ScrollDirection) -> bool {
        let Some(desc) = self.sections.get_mut(index) else {
            return false;
        };
        tracing::debug!(index, id = %desc.id, ?direction, "section exit");
        desc.section.on_exit(ctx, direction);
        true
    }

    /// Calls `on_progress` of the section at `index`. Returns `false` if there is none.
    pub fn progress(&mut self, index: usize, ctx: &mut C, progress: f64) -> bool {
        let Some(desc) = self.sections.get_mut(index) else {
            return false;
        };
        desc.section.on_progress(ctx, progress);
        true
    }
}
