//! Location history export loading.
//!
//! Reads a Takeout-style export: a JSON document with a top-level
//! `locations` array of `{timestampMs, latitudeE7, longitudeE7}` records.
//! Older exports carry `timestampMs` as a JSON string, newer ones as an
//! integer; both are accepted.
//!
//! Exports run to millions of records, so the array is visited record by
//! record and the threshold cutoff applied as each one is decoded; records
//! older than the cutoff never materialize as samples.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};
use serde::de::{DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::{CheckerError, Result};
use crate::PositionSample;

/// One record as it appears in the export, E7 fixed-point coordinates.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocation {
    #[serde(deserialize_with = "string_or_i64")]
    timestamp_ms: i64,
    latitude_e7: i64,
    longitude_e7: i64,
}

fn string_or_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(i64),
        Str(String),
    }

    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.parse::<i64>().map_err(serde::de::Error::custom),
    }
}

/// Samples surviving the cutoff, plus counts for the load log line.
struct FilteredSamples {
    samples: Vec<PositionSample>,
    total: usize,
    dropped_invalid: usize,
}

struct DocVisitor {
    threshold_ms: i64,
}

impl<'de> Visitor<'de> for DocVisitor {
    type Value = FilteredSamples;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a location history export with a 'locations' array")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut filtered = FilteredSamples {
            samples: Vec::new(),
            total: 0,
            dropped_invalid: 0,
        };
        while let Some(key) = map.next_key::<String>()? {
            if key == "locations" {
                filtered = map.next_value_seed(LocationsSeed {
                    threshold_ms: self.threshold_ms,
                })?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(filtered)
    }
}

struct LocationsSeed {
    threshold_ms: i64,
}

impl<'de> DeserializeSeed<'de> for LocationsSeed {
    type Value = FilteredSamples;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(LocationsVisitor {
            threshold_ms: self.threshold_ms,
        })
    }
}

struct LocationsVisitor {
    threshold_ms: i64,
}

impl<'de> Visitor<'de> for LocationsVisitor {
    type Value = FilteredSamples;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of location records")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut filtered = FilteredSamples {
            samples: Vec::new(),
            total: 0,
            dropped_invalid: 0,
        };
        while let Some(raw) = seq.next_element::<RawLocation>()? {
            filtered.total += 1;
            if raw.timestamp_ms < self.threshold_ms {
                continue;
            }
            let sample =
                PositionSample::from_e7(raw.timestamp_ms, raw.latitude_e7, raw.longitude_e7);
            if !sample.point.is_valid() {
                filtered.dropped_invalid += 1;
                continue;
            }
            filtered.samples.push(sample);
        }
        Ok(filtered)
    }
}

/// Decode a location history export, keeping samples recorded at or after
/// `threshold_ms` (pass `i64::MIN` or `0` for "keep everything" on real
/// exports).
///
/// Records with out-of-range coordinates are dropped, not fatal.
pub fn read_location_history<R: Read>(reader: R, threshold_ms: i64) -> Result<Vec<PositionSample>> {
    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    let filtered = deserializer
        .deserialize_map(DocVisitor { threshold_ms })
        .map_err(|source| CheckerError::Json {
            what: "location history export",
            source,
        })?;

    if filtered.dropped_invalid > 0 {
        debug!(
            "Dropped {} records with invalid coordinates",
            filtered.dropped_invalid
        );
    }
    info!(
        "Loaded {} of {} location history records (threshold {threshold_ms} ms)",
        filtered.samples.len(),
        filtered.total
    );
    Ok(filtered.samples)
}

/// Load a location history export from disk. See [`read_location_history`].
pub fn load_location_history(path: &Path, threshold_ms: i64) -> Result<Vec<PositionSample>> {
    info!("Loading location history from {}", path.display());
    let file = File::open(path).map_err(|source| CheckerError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_location_history(BufReader::new(file), threshold_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "locations": [
            {"timestampMs": "500", "latitudeE7": -368759904, "longitudeE7": 1747639883},
            {"timestampMs": 1000, "latitudeE7": -368760000, "longitudeE7": 1747640000},
            {"timestampMs": "1500", "latitudeE7": -368761000, "longitudeE7": 1747641000}
        ]
    }"#;

    #[test]
    fn test_reads_string_and_integer_timestamps() {
        let samples = read_location_history(EXPORT.as_bytes(), 0).unwrap();
        let times: Vec<i64> = samples.iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(times, vec![500, 1000, 1500]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let samples = read_location_history(EXPORT.as_bytes(), 1000).unwrap();
        let times: Vec<i64> = samples.iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(times, vec![1000, 1500]);
    }

    #[test]
    fn test_e7_conversion() {
        let samples = read_location_history(EXPORT.as_bytes(), 0).unwrap();
        assert!((samples[0].point.latitude - -36.8759904).abs() < 1e-9);
        assert!((samples[0].point.longitude - 174.7639883).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_coordinates_are_dropped() {
        let export = r#"{
            "locations": [
                {"timestampMs": "100", "latitudeE7": 950000000, "longitudeE7": 0},
                {"timestampMs": "200", "latitudeE7": 0, "longitudeE7": 0}
            ]
        }"#;
        let samples = read_location_history(export.as_bytes(), 0).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].timestamp_ms, 200);
    }

    #[test]
    fn test_extra_keys_and_fields_are_ignored() {
        let export = r#"{
            "settings": {"exportVersion": 2},
            "locations": [
                {"timestampMs": "100", "latitudeE7": 0, "longitudeE7": 0, "accuracy": 20}
            ]
        }"#;
        let samples = read_location_history(export.as_bytes(), 0).unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_missing_locations_key_is_empty() {
        let samples = read_location_history("{}".as_bytes(), 0).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_garbage_is_a_load_error() {
        let err = read_location_history("not json".as_bytes(), 0).unwrap_err();
        assert!(matches!(err, CheckerError::Json { .. }));
    }
}
