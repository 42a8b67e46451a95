//! Interval matching: one location of interest against the position history.
//!
//! The matcher is purely computational. It queries the history for the
//! event's time window, computes the geodesic distance to every candidate
//! sample and keeps the minimum. A window with no samples produces an
//! unmatched result and an advisory log line, never an error.

use log::warn;

use crate::geo_utils::geodesic_distance_km;
use crate::history::PositionHistory;
use crate::time_utils::format_timestamp_utc;
use crate::{ExposureMatch, LocationOfInterest};

/// Annotation for a window containing no position samples.
pub const NO_MATCH_COMMENT: &str = "No matching records found in location history";

/// Match one location of interest against the history.
///
/// Ties on minimum distance go to the earliest in-window sample: candidates
/// arrive in ascending timestamp order and only a strictly smaller distance
/// displaces the current best.
///
/// # Example
/// ```
/// use exposure_matcher::{match_location, LocationOfInterest, PositionHistory, PositionSample};
///
/// let history = PositionHistory::new(vec![PositionSample::new(100_000, 0.0, 0.0)]);
/// let loi = LocationOfInterest::new("Cafe", 50_000, 150_000, 0.01, 0.0);
///
/// let result = match_location(&loi, &history);
/// assert_eq!(result.match_count, Some(1));
/// assert_eq!(result.distance_km, Some(1.11));
/// ```
pub fn match_location(loi: &LocationOfInterest, history: &PositionHistory) -> ExposureMatch {
    let candidates = history.samples_in_window(loi.start_ms, loi.end_ms);

    if candidates.is_empty() {
        warn!(
            "No records found in location history at the time of event '{}' ({} to {} UTC) - check manually",
            loi.event,
            format_timestamp_utc(loi.start_ms),
            format_timestamp_utc(loi.end_ms),
        );
        return unmatched(loi);
    }

    let mut best = &candidates[0];
    let mut best_distance = geodesic_distance_km(&best.point, &loi.point);
    for sample in &candidates[1..] {
        let distance = geodesic_distance_km(&sample.point, &loi.point);
        if distance < best_distance {
            best = sample;
            best_distance = distance;
        }
    }

    ExposureMatch {
        event: loi.event.clone(),
        location: loi.location.clone(),
        start_ms: loi.start_ms,
        end_ms: loi.end_ms,
        latitude: loi.point.latitude,
        longitude: loi.point.longitude,
        matched_time_ms: Some(best.timestamp_ms),
        distance_km: Some(best_distance),
        personal_latitude: Some(best.point.latitude),
        personal_longitude: Some(best.point.longitude),
        match_count: Some(candidates.len() as u32),
        comment: format!(
            "{} matching records found in location history",
            candidates.len()
        ),
    }
}

fn unmatched(loi: &LocationOfInterest) -> ExposureMatch {
    ExposureMatch {
        event: loi.event.clone(),
        location: loi.location.clone(),
        start_ms: loi.start_ms,
        end_ms: loi.end_ms,
        latitude: loi.point.latitude,
        longitude: loi.point.longitude,
        matched_time_ms: None,
        distance_km: None,
        personal_latitude: None,
        personal_longitude: None,
        match_count: None,
        comment: NO_MATCH_COMMENT.to_string(),
    }
}
