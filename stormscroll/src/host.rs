// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use hashbrown::HashMap;
use stormscroll_surface::{RecordingSurface, Surface};
use stormscroll_tracks::StormId;

/// A drawable region the story renders into.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceTarget {
    /// The overview map.
    Map,
    /// One storm's viewer canvas.
    Viewer(StormId),
    /// The canvas of the chart section with this id.
    Chart(String),
}

impl fmt::Display for SurfaceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map => f.write_str("map"),
            Self::Viewer(id) => write!(f, "viewer-{id}"),
            Self::Chart(id) => write!(f, "chart-{id}"),
        }
    }
}

/// The page the story is embedded in.
///
/// The host owns the actual drawing surfaces and hands them out per target.
/// A host that doesn't display a target returns `None` and the story skips
/// drawing it.
pub trait StoryHost {
    /// The surface for `target`, if the host shows it.
    fn surface(&mut self, target: &SurfaceTarget) -> Option<&mut dyn Surface>;
}

impl<H: StoryHost + ?Sized> StoryHost for &mut H {
    fn surface(&mut self, target: &SurfaceTarget) -> Option<&mut dyn Surface> {
        (**self).surface(target)
    }
}

/// A host backed by [`RecordingSurface`]s, created on first use.
///
/// ```rust
/// use stormscroll::{RecordingHost, StoryHost, SurfaceTarget};
///
/// let mut host = RecordingHost::new();
/// host.surface(&SurfaceTarget::Map).unwrap().clear();
/// assert_eq!(host.recording(&SurfaceTarget::Map).unwrap().clear_count(), 1);
/// assert!(host.recording(&SurfaceTarget::Chart("trend".into())).is_none());
/// ```
#[derive(Debug, Default)]
pub struct RecordingHost {
    surfaces: HashMap<SurfaceTarget, RecordingSurface>,
}

impl RecordingHost {
    /// Creates a host with no surfaces yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recording for `target`, if it was ever requested.
    #[must_use]
    pub fn recording(&self, target: &SurfaceTarget) -> Option<&RecordingSurface> {
        self.surfaces.get(target)
    }

    /// Targets requested so far.
    pub fn targets(&self) -> impl Iterator<Item = &SurfaceTarget> + '_ {
        self.surfaces.keys()
    }
}

impl StoryHost for RecordingHost {
    fn surface(&mut self, target: &SurfaceTarget) -> Option<&mut dyn Surface> {
        let surface = self
            .surfaces
            .entry(target.clone())
            .or_insert_with(RecordingSurface::new);
        Some(surface)
    }
}
