// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A story host that keeps one [`SvgSurface`] per target and writes them
//! out as files.

use std::io;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use kurbo::Size;
use stormscroll::{StoryConfig, StoryHost, SurfaceTarget};
use stormscroll_surface::{Surface, SvgSurface};

/// Size of chart section canvases.
pub const CHART_SIZE: Size = Size::new(640.0, 360.0);

/// Host whose surfaces export as SVG.
#[derive(Debug)]
pub struct SvgHost {
    map_size: Size,
    viewer_size: Size,
    surfaces: HashMap<SurfaceTarget, SvgSurface>,
}

impl SvgHost {
    /// Sizes the map and viewer canvases from `config`.
    pub fn new(config: &StoryConfig) -> Self {
        Self {
            map_size: config.map.viewport(),
            viewer_size: Size::new(config.viewer.width, config.viewer.height),
            surfaces: HashMap::new(),
        }
    }

    fn size_for(&self, target: &SurfaceTarget) -> Size {
        match target {
            SurfaceTarget::Map => self.map_size,
            SurfaceTarget::Viewer(_) => self.viewer_size,
            SurfaceTarget::Chart(_) => CHART_SIZE,
        }
    }

    /// The surface for `target`, if anything drew into it.
    pub fn get(&self, target: &SurfaceTarget) -> Option<&SvgSurface> {
        self.surfaces.get(target)
    }

    /// Writes every non-empty surface to `dir/<prefix>-<target>.svg`.
    ///
    /// Returns the paths written.
    pub fn write_all(&self, dir: &Path, prefix: &str) -> io::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for (target, surface) in &self.surfaces {
            if surface.recording().frame().is_empty() {
                continue;
            }
            let path = dir.join(format!("{prefix}-{target}.svg"));
            std::fs::write(&path, surface.to_svg())?;
            written.push(path);
        }
        written.sort();
        Ok(written)
    }
}

impl StoryHost for SvgHost {
    fn surface(&mut self, target: &SurfaceTarget) -> Option<&mut dyn Surface> {
        let size = self.size_for(target);
        let surface = self
            .surfaces
            .entry(target.clone())
            .or_insert_with(|| SvgSurface::new(size.width, size.height));
        Some(surface)
    }
}
