//! Batch report builder.
//!
//! Runs the interval matcher over every location of interest, sorts the
//! results by distance (unmatched entries last) and computes the summary
//! counts plus the single closest match for headline reporting.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::history::PositionHistory;
use crate::matching::match_location;
use crate::{ExposureMatch, LocationOfInterest};

/// Summary statistics for one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Total locations of interest processed
    pub total: usize,
    /// Entries with at least one in-window sample
    pub matched: usize,
    /// Entries with no in-window samples (data gaps)
    pub unmatched: usize,
    /// Globally closest match, absent when nothing matched
    pub closest: Option<ExposureMatch>,
}

/// The full output of one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureReport {
    /// Matches sorted ascending by distance, unmatched entries last
    pub matches: Vec<ExposureMatch>,
    pub summary: ReportSummary,
}

/// Match every location of interest against the history and build the report.
///
/// Each entry is matched independently; input order does not affect any
/// individual result. The returned matches are sorted ascending by
/// `distance_km` with unmatched entries after all matched ones; ties keep
/// feed order.
pub fn build_report(lois: &[LocationOfInterest], history: &PositionHistory) -> ExposureReport {
    let matches: Vec<ExposureMatch> = lois.iter().map(|loi| match_location(loi, history)).collect();
    finalize(matches)
}

/// Parallel variant of [`build_report`].
///
/// Safe because the history is read-only and the matcher has no shared
/// mutable state; produces a report identical to the sequential build.
#[cfg(feature = "parallel")]
pub fn build_report_parallel(
    lois: &[LocationOfInterest],
    history: &PositionHistory,
) -> ExposureReport {
    let matches: Vec<ExposureMatch> = lois
        .par_iter()
        .map(|loi| match_location(loi, history))
        .collect();
    finalize(matches)
}

fn finalize(mut matches: Vec<ExposureMatch>) -> ExposureReport {
    matches.sort_by(|a, b| compare_distances(a.distance_km, b.distance_km));

    let total = matches.len();
    let matched = matches.iter().filter(|m| m.is_matched()).count();
    // Sorted ascending with unmatched last, so the head is the closest match
    // whenever one exists.
    let closest = matches.first().filter(|m| m.is_matched()).cloned();

    ExposureReport {
        summary: ReportSummary {
            total,
            matched,
            unmatched: total - matched,
            closest,
        },
        matches,
    }
}

/// Ascending by distance; entries without a distance sort after all entries
/// that have one. Distances are rounded finite values, so incomparable pairs
/// are treated as equal.
fn compare_distances(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
