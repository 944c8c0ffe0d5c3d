// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::Color;
use serde::{Deserialize, Serialize};
use stormscroll_geo::{BoundsError, GeoBounds, GeoPoint, compute_bounds};

use crate::StormId;

/// Label shown when a file key carries no recognizable timestamp.
pub const UNKNOWN_TIMESTAMP: &str = "(unknown)";

/// One row of a storm heat table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeatRecord {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Cloud-top brightness temperature, in kelvin.
    #[serde(rename = "CMI", alias = "cmi")]
    pub cmi: f64,
    /// Observation time, as written by the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl HeatRecord {
    /// Creates a record without a time field.
    #[must_use]
    pub fn new(lon: f64, lat: f64, cmi: f64) -> Self {
        Self {
            lon,
            lat,
            cmi,
            time: None,
        }
    }

    /// Position of this record.
    #[must_use]
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}

/// Mean position of the finite rows, or `None` if there are none.
pub fn centroid<'a>(rows: impl IntoIterator<Item = &'a HeatRecord>) -> Option<GeoPoint> {
    let (mut lon, mut lat, mut n) = (0.0, 0.0, 0_u32);
    for p in rows.into_iter().map(HeatRecord::position).filter(|p| p.is_finite()) {
        lon += p.lon;
        lat += p.lat;
        n += 1;
    }
    (n > 0).then(|| GeoPoint::new(lon / f64::from(n), lat / f64::from(n)))
}

/// One timestamped storm position.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackSample {
    /// Storm center.
    pub position: GeoPoint,
    /// Human-readable timestamp, e.g. `08/29/2021 12:00`.
    pub label: String,
    /// Intensity color.
    pub intensity: Color,
    /// Key of the heat table this sample belongs to.
    pub file_key: String,
}

/// A storm's samples in chronological order, with bounds derived once.
#[derive(Clone, Debug, PartialEq)]
pub struct StormTrack {
    id: StormId,
    samples: Vec<TrackSample>,
    bounds: GeoBounds,
}

impl StormTrack {
    /// Builds a track, deriving its bounds from the sample positions.
    ///
    /// Fails with [`BoundsError::EmptyInput`] when no sample has a finite
    /// position.
    pub fn new(id: StormId, samples: Vec<TrackSample>) -> Result<Self, BoundsError> {
        let bounds = compute_bounds(samples.iter().map(|s| s.position))?;
        Ok(Self {
            id,
            samples,
            bounds,
        })
    }

    /// Storm id.
    #[must_use]
    pub fn id(&self) -> StormId {
        self.id
    }

    /// Samples in playback order.
    #[must_use]
    pub fn samples(&self) -> &[TrackSample] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; a track holds at least one sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Min/max over every sample position.
    #[must_use]
    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    /// Sample positions in order.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = GeoPoint> + '_ {
        self.samples.iter().map(|s| s.position)
    }
}

/// Formats the timestamp embedded in a file key.
///
/// Keys look like `ida_20210829_12Z_sampled`; the storm key may be preceded
/// by a directory. Returns `MM/DD/YYYY HH:00`, or `None` when no
/// `<storm>_YYYYMMDD_HHZ` run is present.
#[must_use]
pub fn timestamp_label(storm: StormId, file_key: &str) -> Option<String> {
    let prefix = format!("{}_", storm.key());
    file_key.match_indices(&prefix).find_map(|(at, _)| {
        let rest = file_key[at + prefix.len()..].as_bytes();
        let stamp = rest.get(..12)?;
        let digits = |r: core::ops::Range<usize>| stamp[r].iter().all(u8::is_ascii_digit);
        if !(digits(0..8) && stamp[8] == b'_' && digits(9..11) && stamp[11] == b'Z') {
            return None;
        }
        let s = |r: core::ops::Range<usize>| core::str::from_utf8(&stamp[r]).ok();
        Some(format!("{}/{}/{} {}:00", s(4..6)?, s(6..8)?, s(0..4)?, s(9..11)?))
    })
}

/// [`timestamp_label`], falling back to [`UNKNOWN_TIMESTAMP`].
#[must_use]
pub fn display_timestamp(storm: StormId, file_key: &str) -> String {
    timestamp_label(storm, file_key).unwrap_or_else(|| UNKNOWN_TIMESTAMP.to_owned())
}

#[cfg(test)]
mod tests {
    use peniko::color::palette;
    use stormscroll_geo::{BoundsError, GeoPoint};

    use super::{
        HeatRecord, StormTrack, TrackSample, centroid, display_timestamp, timestamp_label,
    };
    use crate::StormId;

    #[test]
    fn labels_from_file_keys() {
        assert_eq!(
            timestamp_label(StormId::Ida, "ida_20210829_12Z_sampled").as_deref(),
            Some("08/29/2021 12:00")
        );
        assert_eq!(
            timestamp_label(StormId::Irma, "./data/irma_20170910_13Z_sampled.csv").as_deref(),
            Some("09/10/2017 13:00")
        );
        assert_eq!(timestamp_label(StormId::Ida, "ian_20220927_06Z_sampled"), None);
        assert_eq!(timestamp_label(StormId::Ian, "ian_2022092_06Z"), None);
        assert_eq!(display_timestamp(StormId::Harvey, "harvey_latest"), "(unknown)");
    }

    #[test]
    fn heat_rows_deserialize_with_either_field_case() {
        let rows: Vec<HeatRecord> = serde_json::from_str(
            r#"[{"lon":-90.1,"lat":29.0,"CMI":231.5,"time":"2021-08-29T12:00"},
                {"lon":-90.2,"lat":29.1,"cmi":250}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].cmi, 231.5);
        assert_eq!(rows[0].time.as_deref(), Some("2021-08-29T12:00"));
        assert_eq!(rows[1], HeatRecord::new(-90.2, 29.1, 250.0));
    }

    #[test]
    fn centroid_skips_non_finite_rows() {
        let rows = [
            HeatRecord::new(-96.0, 27.0, 250.0),
            HeatRecord::new(-98.0, 29.0, 250.0),
            HeatRecord::new(f64::NAN, 0.0, 250.0),
        ];
        assert_eq!(centroid(&rows), Some(GeoPoint::new(-97.0, 28.0)));
        assert_eq!(centroid(&[] as &[HeatRecord]), None);
    }

    #[test]
    fn track_bounds_cover_every_sample() {
        let sample = |lon, lat| TrackSample {
            position: GeoPoint::new(lon, lat),
            label: String::new(),
            intensity: palette::css::RED,
            file_key: String::new(),
        };
        let track =
            StormTrack::new(StormId::Ian, vec![sample(-83.5, 21.8), sample(-80.5, 28.4)]).unwrap();
        let b = track.bounds();
        assert_eq!((b.min_lon, b.min_lat, b.max_lon, b.max_lat), (-83.5, 21.8, -80.5, 28.4));
        assert!(track.positions().all(|p| b.contains(p)));
        assert_eq!(StormTrack::new(StormId::Ian, vec![]), Err(BoundsError::EmptyInput));
    }
}
