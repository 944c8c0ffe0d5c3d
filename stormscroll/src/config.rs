// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Story settings, loadable from TOML.
//!
//! Every section is `#[serde(default)]`, so a file only needs the keys it
//! changes:
//!
//! ```rust
//! use stormscroll::StoryConfig;
//!
//! let config = StoryConfig::from_toml_str("[viewer]\ninterval_ms = 250\n").unwrap();
//! assert_eq!(config.viewer.interval_ms, 250);
//! assert_eq!(config.scroll.threshold, 0.6);
//! ```

use core::fmt;
use core::time::Duration;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use stormscroll_geo::{GeoPoint, ScaleExtent};
use stormscroll_viewer::{ResumePolicy, ViewerConfig};

/// Errors from loading, saving or validating a [`StoryConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// No per-user config directory could be resolved.
    NoConfigDir,
    /// Reading or writing the file failed.
    Io(io::Error),
    /// The file is not valid TOML for this schema.
    Parse(toml::de::Error),
    /// The config could not be serialized.
    Serialize(toml::ser::Error),
    /// A value is out of range.
    Invalid {
        /// Dotted key of the offending value.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConfigDir => write!(f, "could not determine config directory"),
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::Parse(e) => write!(f, "config parse error: {e}"),
            Self::Serialize(e) => write!(f, "config serialize error: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
        }
    }
}

impl core::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Serialize(e) => Some(e),
            Self::NoConfigDir | Self::Invalid { .. } => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Serialize(e)
    }
}

/// Section activation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Visible ratio at which a section becomes active, in `(0, 1]`.
    pub threshold: f64,
    /// Smallest progress change forwarded to a section.
    pub progress_step: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            threshold: stormscroll_sections::DEFAULT_THRESHOLD,
            progress_step: 0.01,
        }
    }
}

/// The overview map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Viewport width in pixels.
    pub width: f64,
    /// Viewport height; derived from the width when absent.
    pub height: Option<f64>,
    /// Projection center, `[lon, lat]`.
    pub center: [f64; 2],
    /// Base scale as a multiple of the viewport width.
    pub scale_factor: f64,
    /// Allowed zoom scale, `[min, max]`.
    pub scale_extent: [f64; 2],
    /// Duration of the zoom to a storm.
    pub zoom_duration_ms: u64,
    /// Degrees of padding around a storm track before fitting.
    pub fit_padding_degrees: f64,
    /// Fraction of the viewport left empty around a fitted track.
    pub fit_margin: f64,
    /// Storm marker radius.
    pub marker_radius: f64,
    /// Storm marker radius while hovered.
    pub marker_hover_radius: f64,
    /// Map opacity while a storm viewer is open.
    pub dimmed_opacity: f64,
    /// Longitude shift of the center at full section progress.
    pub progress_drift_degrees: f64,
    /// Progress below which the map stays at its base center.
    pub progress_drift_threshold: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: None,
            center: [-82.0, 27.0],
            scale_factor: 1.3,
            scale_extent: [1.0, 8.0],
            zoom_duration_ms: 750,
            fit_padding_degrees: 0.5,
            fit_margin: 0.2,
            marker_radius: 8.0,
            marker_hover_radius: 12.0,
            dimmed_opacity: 0.5,
            progress_drift_degrees: 3.0,
            progress_drift_threshold: 0.1,
        }
    }
}

impl MapConfig {
    /// Viewport size; the height defaults to `min(width * 0.75, 500)`.
    #[must_use]
    pub fn viewport(&self) -> Size {
        let height = self.height.unwrap_or_else(|| (self.width * 0.75).min(500.0));
        Size::new(self.width, height)
    }

    /// Projection center.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.center[0], self.center[1])
    }

    /// Zoom scale extent.
    #[must_use]
    pub fn scale_extent(&self) -> ScaleExtent {
        ScaleExtent::new(self.scale_extent[0], self.scale_extent[1])
    }

    /// Zoom transition duration.
    #[must_use]
    pub fn zoom_duration(&self) -> Duration {
        Duration::from_millis(self.zoom_duration_ms)
    }
}

/// What reopening a storm viewer does with its playback position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReopenPolicy {
    /// Continue where the viewer was closed.
    #[default]
    Resume,
    /// Start again from the first timestamp.
    Restart,
}

/// Storm viewers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
    /// Playback step interval.
    pub interval_ms: u64,
    /// Heat point size.
    pub point_size: f64,
    /// Heat point alpha.
    pub point_alpha: f32,
    /// Intensity domain, `[low, high]`.
    pub color_domain: [f64; 2],
    /// Reopen behavior.
    pub reopen: ReopenPolicy,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for ViewerSettings {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            width: config.viewport.width,
            height: config.viewport.height,
            interval_ms: u64::try_from(config.interval.as_millis()).unwrap_or(u64::MAX),
            point_size: config.point_size,
            point_alpha: config.point_alpha,
            color_domain: [config.color_domain.0, config.color_domain.1],
            reopen: match config.resume {
                ResumePolicy::Resume => ReopenPolicy::Resume,
                ResumePolicy::Restart => ReopenPolicy::Restart,
            },
        }
    }
}

impl ViewerSettings {
    /// Settings in the form the viewer takes.
    #[must_use]
    pub fn to_viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            viewport: Size::new(self.width, self.height),
            interval: Duration::from_millis(self.interval_ms),
            point_size: self.point_size,
            point_alpha: self.point_alpha,
            color_domain: (self.color_domain[0], self.color_domain[1]),
            resume: match self.reopen {
                ReopenPolicy::Resume => ResumePolicy::Resume,
                ReopenPolicy::Restart => ResumePolicy::Restart,
            },
        }
    }
}

/// All story settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Section activation.
    pub scroll: ScrollConfig,
    /// The overview map.
    pub map: MapConfig,
    /// Storm viewers.
    pub viewer: ViewerSettings,
}

impl StoryConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty TOML for this config.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads `path`, returning `Ok(None)` if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded story config");
        Ok(Some(config))
    }

    /// Loads the per-user config file, if there is one.
    pub fn load_user() -> Result<Option<Self>, ConfigError> {
        Self::load(&user_config_path()?)
    }

    /// Writes this config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Rejects values the story can't run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scroll = &self.scroll;
        check(
            "scroll.threshold",
            scroll.threshold > 0.0 && scroll.threshold <= 1.0,
            "must be in (0, 1]",
        )?;
        check(
            "scroll.progress_step",
            (0.0..1.0).contains(&scroll.progress_step),
            "must be in [0, 1)",
        )?;

        let map = &self.map;
        let viewport = map.viewport();
        check(
            "map.width",
            positive(viewport.width) && positive(viewport.height),
            "viewport must have a positive size",
        )?;
        check(
            "map.center",
            GeoPoint::new(map.center[0], map.center[1]).is_in_range(),
            "must be a valid [lon, lat]",
        )?;
        check("map.scale_factor", positive(map.scale_factor), "must be positive")?;
        let [min_k, max_k] = map.scale_extent;
        check(
            "map.scale_extent",
            positive(min_k) && positive(max_k),
            "bounds must be positive",
        )?;
        check("map.scale_extent", min_k <= max_k, "min must not exceed max")?;
        check(
            "map.fit_margin",
            (0.0..0.5).contains(&map.fit_margin),
            "must be in [0, 0.5)",
        )?;
        check(
            "map.fit_padding_degrees",
            map.fit_padding_degrees.is_finite() && map.fit_padding_degrees >= 0.0,
            "must not be negative",
        )?;
        check(
            "map.marker_radius",
            positive(map.marker_radius) && positive(map.marker_hover_radius),
            "marker radii must be positive",
        )?;
        check(
            "map.dimmed_opacity",
            (0.0..=1.0).contains(&map.dimmed_opacity),
            "must be in [0, 1]",
        )?;

        let viewer = &self.viewer;
        check(
            "viewer.width",
            positive(viewer.width) && positive(viewer.height),
            "viewport must have a positive size",
        )?;
        check("viewer.interval_ms", viewer.interval_ms > 0, "must be positive")?;
        check("viewer.point_size", positive(viewer.point_size), "must be positive")?;
        check(
            "viewer.point_alpha",
            (0.0..=1.0).contains(&viewer.point_alpha),
            "must be in [0, 1]",
        )?;
        let [lo, hi] = viewer.color_domain;
        check(
            "viewer.color_domain",
            lo.is_finite() && hi.is_finite() && lo < hi,
            "must be a finite, increasing range",
        )?;
        Ok(())
    }
}

/// Location of the per-user config file.
pub fn user_config_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("org", "stormscroll", "stormscroll").ok_or(ConfigError::NoConfigDir)?;
    Ok(dirs.config_dir().join("story.toml"))
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn check(field: &'static str, ok: bool, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: reason.to_owned(),
        })
    }
}
