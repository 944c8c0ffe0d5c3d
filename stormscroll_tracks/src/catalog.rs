// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fixed set of storms the story presents.

use core::fmt;
use core::str::FromStr;

use peniko::Color;
use peniko::color::{Srgb, palette};
use stormscroll_geo::{GeoBounds, GeoPoint};

/// Identifies one storm in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StormId {
    /// Hurricane Ida (2021).
    Ida,
    /// Hurricane Harvey (2017).
    Harvey,
    /// Hurricane Ian (2022).
    Ian,
    /// Hurricane Irma (2017).
    Irma,
}

impl StormId {
    /// Every storm, in marker order.
    pub const ALL: [Self; 4] = [Self::Ida, Self::Harvey, Self::Ian, Self::Irma];

    /// Lowercase key, as used in file keys and element ids.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Ida => "ida",
            Self::Harvey => "harvey",
            Self::Ian => "ian",
            Self::Irma => "irma",
        }
    }

    /// Catalog entry for this storm.
    #[must_use]
    pub fn spec(self) -> &'static StormSpec {
        match self {
            Self::Ida => &IDA,
            Self::Harvey => &HARVEY,
            Self::Ian => &IAN,
            Self::Irma => &IRMA,
        }
    }
}

impl fmt::Display for StormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when parsing a [`StormId`] from an unknown key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownStormError {
    key: String,
}

impl UnknownStormError {
    /// The key that failed to parse.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for UnknownStormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown storm `{}`", self.key)
    }
}

impl core::error::Error for UnknownStormError {}

impl FromStr for StormId {
    type Err = UnknownStormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStormError { key: s.to_owned() })
    }
}

/// A recorded storm position for one timestamp file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackPosition {
    /// Source file key for this timestamp.
    pub file_key: &'static str,
    /// Storm center.
    pub position: GeoPoint,
    /// Intensity color token, `#rrggbb`.
    pub intensity: &'static str,
}

impl TrackPosition {
    const fn new(file_key: &'static str, lat: f64, lon: f64, intensity: &'static str) -> Self {
        Self {
            file_key,
            position: GeoPoint::new(lon, lat),
            intensity,
        }
    }
}

/// Where a storm's track sample positions come from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrackSource {
    /// Positions recorded per timestamp.
    Explicit(&'static [TrackPosition]),
    /// Only file keys are known; each sample is placed at the centroid of
    /// its timestamp's heat rows once loaded.
    Centroids(&'static [&'static str]),
}

/// Static description of one storm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StormSpec {
    /// Storm id.
    pub id: StormId,
    /// Display name, e.g. "Hurricane Ida (2021)".
    pub name: &'static str,
    /// Marker position on the overview map.
    pub marker: GeoPoint,
    /// Marker color token.
    pub marker_color: &'static str,
    /// Track positions or the bare file list.
    pub track: TrackSource,
    viewer_extent: [f64; 4],
}

impl StormSpec {
    /// Timestamp file keys in chronological order.
    pub fn file_keys(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        let (explicit, bare): (&'static [TrackPosition], &'static [&'static str]) = match self.track {
            TrackSource::Explicit(track) => (track, &[]),
            TrackSource::Centroids(files) => (&[], files),
        };
        FileKeys {
            explicit: explicit.iter(),
            bare: bare.iter(),
        }
    }

    /// Number of timestamps.
    #[must_use]
    pub fn file_count(&self) -> usize {
        match self.track {
            TrackSource::Explicit(track) => track.len(),
            TrackSource::Centroids(files) => files.len(),
        }
    }

    /// Geographic extent the storm viewer is fitted to.
    #[must_use]
    pub fn viewer_bounds(&self) -> GeoBounds {
        let [min_lon, min_lat, max_lon, max_lat] = self.viewer_extent;
        GeoBounds::new(min_lon, min_lat, max_lon, max_lat)
    }

    /// Parsed marker color.
    #[must_use]
    pub fn marker_color(&self) -> Color {
        parse_intensity(self.marker_color).unwrap_or(palette::css::GRAY)
    }
}

struct FileKeys {
    explicit: core::slice::Iter<'static, TrackPosition>,
    bare: core::slice::Iter<'static, &'static str>,
}

impl Iterator for FileKeys {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        match self.explicit.next() {
            Some(p) => Some(p.file_key),
            None => self.bare.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.explicit.len() + self.bare.len();
        (n, Some(n))
    }
}

impl ExactSizeIterator for FileKeys {}

/// Parses a `#rrggbb` (or any CSS) color token.
#[must_use]
pub fn parse_intensity(token: &str) -> Option<Color> {
    peniko::color::parse_color(token)
        .ok()
        .map(|c| c.to_alpha_color::<Srgb>())
}

static IDA: StormSpec = StormSpec {
    id: StormId::Ida,
    name: "Hurricane Ida (2021)",
    marker: GeoPoint::new(-89.98, 29.28),
    marker_color: "#e74c3c",
    track: TrackSource::Explicit(&[
        TrackPosition::new("ida_20210827_18Z_sampled", 21.5076, -82.6180, "#ffea00"),
        TrackPosition::new("ida_20210827_23Z_sampled", 22.4274, -83.2202, "#ffea00"),
        TrackPosition::new("ida_20210828_00Z_sampled", 22.6019, -83.5154, "#ffea00"),
        TrackPosition::new("ida_20210828_06Z_sampled", 23.5036, -84.6960, "#ffea00"),
        TrackPosition::new("ida_20210828_12Z_sampled", 24.4314, -85.7114, "#ffea00"),
        TrackPosition::new("ida_20210828_18Z_sampled", 25.6026, -86.6013, "#ffea00"),
        TrackPosition::new("ida_20210829_00Z_sampled", 26.7153, -87.6048, "#ff8000"),
        TrackPosition::new("ida_20210829_06Z_sampled", 27.6082, -88.7029, "#ff00cc"),
        TrackPosition::new("ida_20210829_12Z_sampled", 28.5055, -89.6031, "#ff00cc"),
        TrackPosition::new("ida_20210829_16Z_sampled", 29.0850, -90.2170, "#ff00cc"),
        TrackPosition::new("ida_20210829_18Z_sampled", 29.2293, -90.4059, "#ff00cc"),
        TrackPosition::new("ida_20210830_00Z_sampled", 29.9071, -90.6185, "#ff0033"),
        TrackPosition::new("ida_20210830_06Z_sampled", 30.6006, -90.8074, "#ffea00"),
    ]),
    viewer_extent: [-102.0, 18.0, -83.0, 40.0],
};

static HARVEY: StormSpec = StormSpec {
    id: StormId::Harvey,
    name: "Hurricane Harvey (2017)",
    marker: GeoPoint::new(-97.0, 28.0),
    marker_color: "#f39c12",
    track: TrackSource::Centroids(&[
        "harvey_20170824_12Z_sampled",
        "harvey_20170824_18Z_sampled",
        "harvey_20170825_00Z_sampled",
        "harvey_20170825_03Z_sampled",
        "harvey_20170825_06Z_sampled",
        "harvey_20170825_09Z_sampled",
        "harvey_20170825_12Z_sampled",
        "harvey_20170825_15Z_sampled",
        "harvey_20170825_18Z_sampled",
        "harvey_20170825_21Z_sampled",
        "harvey_20170826_00Z_sampled",
        "harvey_20170826_03Z_sampled",
        "harvey_20170826_06Z_sampled",
        "harvey_20170826_09Z_sampled",
        "harvey_20170826_12Z_sampled",
        "harvey_20170826_15Z_sampled",
    ]),
    viewer_extent: [-104.0, 24.0, -85.0, 46.0],
};

static IAN: StormSpec = StormSpec {
    id: StormId::Ian,
    name: "Hurricane Ian (2022)",
    marker: GeoPoint::new(-81.4, 27.5),
    marker_color: "#3498db",
    track: TrackSource::Explicit(&[
        TrackPosition::new("ian_20220927_06Z_sampled", 21.7813, -83.4997, "#ff0033"),
        TrackPosition::new("ian_20220927_08Z_sampled", 22.2059, -83.6443, "#ff0033"),
        TrackPosition::new("ian_20220927_12Z_sampled", 22.5847, -83.5720, "#ff0033"),
        TrackPosition::new("ian_20220927_18Z_sampled", 23.5382, -83.3310, "#ff0033"),
        TrackPosition::new("ian_20220928_00Z_sampled", 24.3312, -83.1141, "#ff0033"),
        TrackPosition::new("ian_20220928_02Z_sampled", 24.5944, -83.0659, "#ff0033"),
        TrackPosition::new("ian_20220928_06Z_sampled", 25.1629, -83.0418, "#ff00cc"),
        TrackPosition::new("ian_20220928_12Z_sampled", 25.9456, -82.9454, "#9d00ff"),
        TrackPosition::new("ian_20220928_18Z_sampled", 26.5724, -82.7044, "#ff00cc"),
        TrackPosition::new("ian_20220928_19Z_sampled", 26.7016, -82.5116, "#ff00cc"),
        TrackPosition::new("ian_20220928_20Z_sampled", 26.8092, -82.4152, "#ff00cc"),
        TrackPosition::new("ian_20220929_00Z_sampled", 27.1529, -82.2224, "#ff0033"),
        TrackPosition::new("ian_20220929_06Z_sampled", 27.6877, -81.0404, "#ffea00"),
        TrackPosition::new("ian_20220929_12Z_sampled", 28.3912, -80.5218, "#00e676"),
    ]),
    viewer_extent: [-90.0, 20.0, -71.0, 42.0],
};

static IRMA: StormSpec = StormSpec {
    id: StormId::Irma,
    name: "Hurricane Irma (2017)",
    marker: GeoPoint::new(-81.5, 24.7),
    marker_color: "#2ecc71",
    track: TrackSource::Explicit(&[
        TrackPosition::new("irma_20170907_12Z_sampled", 20.1980, -68.9962, "#9d00ff"),
        TrackPosition::new("irma_20170907_18Z_sampled", 20.6895, -70.4136, "#9d00ff"),
        TrackPosition::new("irma_20170908_00Z_sampled", 21.1274, -71.8198, "#9d00ff"),
        TrackPosition::new("irma_20170908_05Z_sampled", 21.1274, -71.8198, "#ff00cc"),
        TrackPosition::new("irma_20170908_06Z_sampled", 21.1274, -71.8198, "#ff00cc"),
        TrackPosition::new("irma_20170908_12Z_sampled", 21.1274, -71.8198, "#ff00cc"),
        TrackPosition::new("irma_20170908_18Z_sampled", 21.5121, -73.0139, "#9d00ff"),
        TrackPosition::new("irma_20170909_00Z_sampled", 21.5121, -73.2036, "#9d00ff"),
        TrackPosition::new("irma_20170909_03Z_sampled", 21.8336, -74.7103, "#9d00ff"),
        TrackPosition::new("irma_20170909_06Z_sampled", 22.0406, -76.0049, "#ff00cc"),
        TrackPosition::new("irma_20170909_12Z_sampled", 22.7217, -79.3077, "#ff0033"),
        TrackPosition::new("irma_20170909_18Z_sampled", 23.1123, -80.2117, "#ff8000"),
        TrackPosition::new("irma_20170910_00Z_sampled", 23.4302, -80.9148, "#ff0033"),
        TrackPosition::new("irma_20170910_06Z_sampled", 23.7034, -81.3054, "#ff00cc"),
        TrackPosition::new("irma_20170910_12Z_sampled", 24.5213, -81.5063, "#ff00cc"),
        TrackPosition::new("irma_20170910_13Z_sampled", 24.7140, -81.5063, "#ff00cc"),
    ]),
    viewer_extent: [-82.0, 18.0, -60.0, 30.0],
};
