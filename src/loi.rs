//! Locations-of-interest feed loading.
//!
//! The feed is a GeoJSON FeatureCollection of Point features whose
//! properties carry an event name, an optional venue name and the active
//! window as `"DD/MM/YYYY, H:MM am|pm"` local-time strings. Unparseable
//! times or broken geometry are fatal at load time; the matching core only
//! ever sees well-formed values.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::FixedOffset;
use log::info;
use serde::Deserialize;

use crate::error::{CheckerError, Result};
use crate::time_utils::parse_loi_time;
use crate::{GpsPoint, LocationOfInterest};

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: LoiProperties,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LoiProperties {
    event: String,
    #[serde(default)]
    location: Option<String>,
    start: String,
    end: String,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    /// GeoJSON order: [longitude, latitude]
    coordinates: Vec<f64>,
}

/// Decode a locations-of-interest GeoJSON feed.
///
/// `utc_offset` anchors the feed's naive local times to absolute instants;
/// it is explicit configuration rather than ambient host state so runs are
/// reproducible across machines.
pub fn read_locations_of_interest<R: Read>(
    reader: R,
    utc_offset: FixedOffset,
) -> Result<Vec<LocationOfInterest>> {
    let collection: FeatureCollection =
        serde_json::from_reader(reader).map_err(|source| CheckerError::Json {
            what: "locations-of-interest feed",
            source,
        })?;

    let mut lois = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let point = feature_point(index, feature.geometry)?;
        let start_ms = parse_loi_time(&feature.properties.start, utc_offset)?;
        let end_ms = parse_loi_time(&feature.properties.end, utc_offset)?;
        lois.push(LocationOfInterest {
            event: feature.properties.event,
            location: feature.properties.location,
            start_ms,
            end_ms,
            point,
        });
    }

    info!("Loaded {} locations of interest", lois.len());
    Ok(lois)
}

fn feature_point(index: usize, geometry: Option<Geometry>) -> Result<GpsPoint> {
    let geometry = geometry.ok_or_else(|| CheckerError::MalformedFeed {
        message: format!("feature {index} has no geometry"),
    })?;
    if geometry.kind != "Point" {
        return Err(CheckerError::MalformedFeed {
            message: format!("feature {index} has geometry '{}', expected Point", geometry.kind),
        });
    }
    if geometry.coordinates.len() < 2 {
        return Err(CheckerError::MalformedFeed {
            message: format!("feature {index} has incomplete coordinates"),
        });
    }
    Ok(GpsPoint::new(geometry.coordinates[1], geometry.coordinates[0]))
}

/// Load a locations-of-interest feed from disk. See [`read_locations_of_interest`].
pub fn load_locations_of_interest(
    path: &Path,
    utc_offset: FixedOffset,
) -> Result<Vec<LocationOfInterest>> {
    info!("Loading locations of interest from {}", path.display());
    let file = File::open(path).map_err(|source| CheckerError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_locations_of_interest(BufReader::new(file), utc_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn nzst() -> FixedOffset {
        FixedOffset::east_opt(12 * 3600).expect("valid offset")
    }

    const FEED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "Event": "Countdown Birkenhead",
                    "Location": "Birkenhead, Auckland",
                    "Start": "11/08/2021, 9:30 am",
                    "End": "11/08/2021, 11:00 am"
                },
                "geometry": {"type": "Point", "coordinates": [174.7263, -36.8108]}
            },
            {
                "type": "Feature",
                "properties": {
                    "Event": "Bus NX1",
                    "Location": null,
                    "Start": "12/08/2021, 5:15 pm",
                    "End": "12/08/2021, 5:50 pm"
                },
                "geometry": {"type": "Point", "coordinates": [174.7633, -36.8485]}
            }
        ]
    }"#;

    #[test]
    fn test_reads_feed() {
        let lois = read_locations_of_interest(FEED.as_bytes(), nzst()).unwrap();
        assert_eq!(lois.len(), 2);

        let first = &lois[0];
        assert_eq!(first.event, "Countdown Birkenhead");
        assert_eq!(first.location.as_deref(), Some("Birkenhead, Auckland"));
        assert_eq!(first.point, GpsPoint::new(-36.8108, 174.7263));

        let expected_start = nzst()
            .with_ymd_and_hms(2021, 8, 11, 9, 30, 0)
            .single()
            .expect("valid datetime")
            .timestamp_millis();
        assert_eq!(first.start_ms, expected_start);
        assert!(first.start_ms < first.end_ms);

        assert!(lois[1].location.is_none());
    }

    #[test]
    fn test_bad_time_string_is_fatal() {
        let feed = FEED.replace("11/08/2021, 9:30 am", "2021-08-11 09:30");
        let err = read_locations_of_interest(feed.as_bytes(), nzst()).unwrap_err();
        assert!(matches!(err, CheckerError::InvalidTime { .. }));
    }

    #[test]
    fn test_missing_geometry_is_fatal() {
        let feed = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {
                        "Event": "Ghost event",
                        "Location": null,
                        "Start": "11/08/2021, 9:30 am",
                        "End": "11/08/2021, 11:00 am"
                    },
                    "geometry": null
                }
            ]
        }"#;
        let err = read_locations_of_interest(feed.as_bytes(), nzst()).unwrap_err();
        assert!(matches!(err, CheckerError::MalformedFeed { .. }));
    }

    #[test]
    fn test_non_point_geometry_is_fatal() {
        let feed = FEED.replace("\"Point\"", "\"LineString\"");
        let err = read_locations_of_interest(feed.as_bytes(), nzst()).unwrap_err();
        assert!(matches!(err, CheckerError::MalformedFeed { .. }));
    }

    #[test]
    fn test_empty_collection() {
        let feed = r#"{"type": "FeatureCollection", "features": []}"#;
        let lois = read_locations_of_interest(feed.as_bytes(), nzst()).unwrap();
        assert!(lois.is_empty());
    }
}
