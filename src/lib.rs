//! # Exposure Matcher
//!
//! Cross-reference a personal location history log against a published list of
//! exposure "locations of interest" (places with associated time windows).
//!
//! For each location of interest, the matcher finds every position sample
//! recorded inside its time window, computes the geodesic distance to each
//! candidate, and reports the closest match (or flags the window as having no
//! data). Results are aggregated into a report sorted by distance.
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel batch matching with rayon
//! - **`synthetic`** - Enable synthetic location history generation for demo runs
//! - **`http`** - Enable HTTP client for downloading the locations-of-interest feed
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use exposure_matcher::{build_report, LocationOfInterest, PositionHistory, PositionSample};
//!
//! // One sample at the equator, recorded at t=100s.
//! let history = PositionHistory::new(vec![PositionSample::new(100_000, 0.0, 0.0)]);
//!
//! // An event ~1.1 km north of the sample, active while it was recorded.
//! let feed = vec![LocationOfInterest::new("Cafe on the corner", 50_000, 150_000, 0.01, 0.0)];
//!
//! let report = build_report(&feed, &history);
//! assert_eq!(report.summary.matched, 1);
//! assert_eq!(report.matches[0].distance_km, Some(1.11));
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{CheckerError, Result};

// Geographic utilities (geodesic distance)
pub mod geo_utils;
pub use geo_utils::geodesic_distance_km;

// Time parsing and formatting for the locations-of-interest feed
pub mod time_utils;
pub use time_utils::{parse_loi_time, LOI_TIME_FORMAT};

// Time-indexed position history (threshold filter + window queries)
pub mod history;
pub use history::{filter_since, PositionHistory};

// Interval matcher (one location of interest against the history)
pub mod matching;
pub use matching::match_location;

// Batch report builder
pub mod report;
#[cfg(feature = "parallel")]
pub use report::build_report_parallel;
pub use report::{build_report, ExposureReport, ReportSummary};

// Location history export loading
pub mod loader;
pub use loader::{load_location_history, read_location_history};

// Locations-of-interest feed loading
pub mod loi;
pub use loi::{load_locations_of_interest, read_locations_of_interest};

// CSV report serialization
pub mod export;
pub use export::{export_csv, write_csv};

// Synthetic location history for demo runs
#[cfg(feature = "synthetic")]
pub mod synthetic;
#[cfg(feature = "synthetic")]
pub use synthetic::synthetic_history;

// HTTP client for feed download
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub use http::fetch_locations_of_interest;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use exposure_matcher::GpsPoint;
/// let point = GpsPoint::new(-36.8760, 174.7640); // Auckland
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// One timestamped reading from a personal location history log.
///
/// Immutable after load; the full set lives for the duration of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSample {
    /// Unix timestamp (milliseconds since epoch)
    pub timestamp_ms: i64,
    pub point: GpsPoint,
}

impl PositionSample {
    /// Create a sample from an epoch-milliseconds timestamp and degrees.
    pub fn new(timestamp_ms: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp_ms,
            point: GpsPoint::new(latitude, longitude),
        }
    }

    /// Create a sample from E7 fixed-point coordinates (degrees x 10^7),
    /// the encoding used by exported location history logs.
    pub fn from_e7(timestamp_ms: i64, latitude_e7: i64, longitude_e7: i64) -> Self {
        Self::new(
            timestamp_ms,
            latitude_e7 as f64 * 1e-7,
            longitude_e7 as f64 * 1e-7,
        )
    }
}

/// A published point location with an associated active time window.
///
/// The window is strictly exclusive on both ends: a sample recorded exactly
/// at `start_ms` or `end_ms` does not count as in-window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationOfInterest {
    /// Event name from the feed (free text)
    pub event: String,
    /// Venue/place name, where the feed provides one
    pub location: Option<String>,
    /// Window start, Unix milliseconds
    pub start_ms: i64,
    /// Window end, Unix milliseconds
    pub end_ms: i64,
    pub point: GpsPoint,
}

impl LocationOfInterest {
    /// Create a location of interest with no venue name.
    pub fn new(
        event: impl Into<String>,
        start_ms: i64,
        end_ms: i64,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            event: event.into(),
            location: None,
            start_ms,
            end_ms,
            point: GpsPoint::new(latitude, longitude),
        }
    }
}

/// Result of matching one location of interest against the position history.
///
/// The optional fields are all populated together: `None` means no samples
/// fell inside the event's time window. Flat and serializable so external
/// writers can emit it without reshaping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureMatch {
    /// Event name of the originating location of interest
    pub event: String,
    /// Venue/place name of the originating location of interest
    pub location: Option<String>,
    /// Window start, Unix milliseconds
    pub start_ms: i64,
    /// Window end, Unix milliseconds
    pub end_ms: i64,
    /// Latitude of the location of interest
    pub latitude: f64,
    /// Longitude of the location of interest
    pub longitude: f64,
    /// Timestamp of the closest in-window sample, Unix milliseconds
    pub matched_time_ms: Option<i64>,
    /// Geodesic distance to the closest in-window sample, km (2 dp)
    pub distance_km: Option<f64>,
    /// Latitude of the closest in-window sample
    pub personal_latitude: Option<f64>,
    /// Longitude of the closest in-window sample
    pub personal_longitude: Option<f64>,
    /// Number of samples that fell inside the window
    pub match_count: Option<u32>,
    /// Human-readable annotation of the match outcome
    pub comment: String,
}

impl ExposureMatch {
    /// True when at least one sample fell inside the event's window.
    pub fn is_matched(&self) -> bool {
        self.distance_km.is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gps_point_validation() {
        assert!(GpsPoint::new(-36.8760, 174.7640).is_valid());
        assert!(!GpsPoint::new(91.0, 0.0).is_valid());
        assert!(!GpsPoint::new(0.0, 181.0).is_valid());
        assert!(!GpsPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_sample_from_e7() {
        let sample = PositionSample::from_e7(1_628_640_000_000, -368_759_904, 1_747_639_883);
        assert!((sample.point.latitude - -36.8759904).abs() < 1e-9);
        assert!((sample.point.longitude - 174.7639883).abs() < 1e-9);
        assert_eq!(sample.timestamp_ms, 1_628_640_000_000);
    }

    #[test]
    fn test_location_of_interest_new() {
        let loi = LocationOfInterest::new("Countdown Birkenhead", 100, 200, -36.81, 174.73);
        assert_eq!(loi.event, "Countdown Birkenhead");
        assert!(loi.location.is_none());
        assert_eq!(loi.point, GpsPoint::new(-36.81, 174.73));
    }
}
