//! Geographic utilities.
//!
//! Distance is computed on the WGS-84 ellipsoid (Karney's geodesic
//! algorithm via the `geo` crate). At the tens-of-kilometres scale a planar
//! approximation drifts badly away from the equator, so flat-earth math is
//! deliberately not offered here.

use geo::{Distance, Geodesic, Point};

use crate::GpsPoint;

/// Geodesic distance between two lat/lon points in kilometres, rounded to
/// two decimal places.
///
/// Coordinates outside the valid lat/lon ranges are passed through to the
/// geodesic formula unvalidated.
///
/// # Example
/// ```
/// use exposure_matcher::{geodesic_distance_km, GpsPoint};
///
/// let a = GpsPoint::new(0.0, 0.0);
/// let b = GpsPoint::new(0.01, 0.0);
/// assert_eq!(geodesic_distance_km(&a, &b), 1.11);
/// ```
pub fn geodesic_distance_km(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let a = Point::new(p1.longitude, p1.latitude);
    let b = Point::new(p2.longitude, p2.latitude);
    round_km(Geodesic::distance(a, b) / 1000.0)
}

/// Round a kilometre value to two decimal places.
fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
