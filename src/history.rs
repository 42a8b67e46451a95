//! Time-indexed position history.
//!
//! The history is built once per run and read-only afterwards: samples are
//! sorted by timestamp at construction so that window queries resolve with
//! two binary searches instead of a scan. Query results are identical to a
//! linear filter over the raw samples.

use log::debug;

use crate::PositionSample;

/// An ordered, time-indexed collection of position samples.
#[derive(Debug, Clone, Default)]
pub struct PositionHistory {
    /// Sorted by `timestamp_ms` ascending.
    samples: Vec<PositionSample>,
}

impl PositionHistory {
    /// Build the index from raw samples. Input order does not matter; equal
    /// timestamps keep their input order.
    pub fn new(mut samples: Vec<PositionSample>) -> Self {
        samples.sort_by_key(|s| s.timestamp_ms);
        debug!("Indexed {} position samples", samples.len());
        Self { samples }
    }

    /// Number of samples in the history.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the history holds no samples. Every window query against an
    /// empty history returns an empty slice; that is a data gap, not an error.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples, in timestamp order.
    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    /// All samples with `start_ms < timestamp < end_ms`, in timestamp order.
    ///
    /// Both ends are strictly exclusive: a sample recorded exactly at the
    /// window boundary is not returned. An empty slice is a valid result,
    /// including for malformed windows where `start_ms >= end_ms`.
    pub fn samples_in_window(&self, start_ms: i64, end_ms: i64) -> &[PositionSample] {
        let lo = self.samples.partition_point(|s| s.timestamp_ms <= start_ms);
        let hi = self.samples.partition_point(|s| s.timestamp_ms < end_ms);
        if lo >= hi {
            return &[];
        }
        &self.samples[lo..hi]
    }
}

/// Retain only samples recorded at or after `cutoff_ms`.
///
/// The cutoff is inclusive and caller-supplied; it bounds the working set for
/// large histories and is applied before the index is built. Pure: the input
/// order of the survivors is preserved.
pub fn filter_since(samples: Vec<PositionSample>, cutoff_ms: i64) -> Vec<PositionSample> {
    samples
        .into_iter()
        .filter(|s| s.timestamp_ms >= cutoff_ms)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: i64) -> PositionSample {
        PositionSample::new(t, -36.88, 174.76)
    }

    #[test]
    fn test_sorts_on_construction() {
        let history = PositionHistory::new(vec![sample(300), sample(100), sample(200)]);
        let times: Vec<i64> = history.samples().iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(times, vec![100, 200, 300]);
    }

    #[test]
    fn test_window_is_strictly_exclusive() {
        let history = PositionHistory::new(vec![sample(100), sample(150), sample(200)]);

        // Boundary samples are excluded on both ends.
        let hits = history.samples_in_window(100, 200);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].timestamp_ms, 150);

        // Widening past the boundaries picks them up.
        assert_eq!(history.samples_in_window(99, 201).len(), 3);
    }

    #[test]
    fn test_empty_window_is_not_an_error() {
        let history = PositionHistory::new(vec![sample(100)]);
        assert!(history.samples_in_window(200, 300).is_empty());
        assert!(history.samples_in_window(0, 50).is_empty());
    }

    #[test]
    fn test_malformed_window_yields_empty() {
        let history = PositionHistory::new(vec![sample(100), sample(200)]);
        assert!(history.samples_in_window(300, 100).is_empty());
        assert!(history.samples_in_window(150, 150).is_empty());
    }

    #[test]
    fn test_empty_history() {
        let history = PositionHistory::new(Vec::new());
        assert!(history.is_empty());
        assert!(history.samples_in_window(0, i64::MAX).is_empty());
    }

    #[test]
    fn test_window_matches_linear_scan() {
        let samples: Vec<PositionSample> = (0..50).map(|i| sample(i * 7)).collect();
        let history = PositionHistory::new(samples.clone());

        for (start, end) in [(0, 343), (35, 36), (-10, 500), (70, 70), (13, 200)] {
            let indexed: Vec<i64> = history
                .samples_in_window(start, end)
                .iter()
                .map(|s| s.timestamp_ms)
                .collect();
            let scanned: Vec<i64> = samples
                .iter()
                .filter(|s| s.timestamp_ms > start && s.timestamp_ms < end)
                .map(|s| s.timestamp_ms)
                .collect();
            assert_eq!(indexed, scanned, "window ({start}, {end})");
        }
    }

    #[test]
    fn test_filter_since_is_inclusive() {
        let filtered = filter_since(vec![sample(500), sample(1000), sample(1500)], 1000);
        let times: Vec<i64> = filtered.iter().map(|s| s.timestamp_ms).collect();
        assert_eq!(times, vec![1000, 1500]);
    }
}
