//! Stateless geometry over pairs of coordinates
//!
//! Distances and bearings are computed on a sphere. Interpolation is a plain
//! linear blend of latitude and longitude, which is good enough at city or
//! region scale but visibly wrong across the antimeridian or near the poles.

use crate::core::constants::{DURATION_SCALE, EARTH_RADIUS_M};
use crate::core::{Coordinate, GeoBounds};
use nalgebra::Vector2;

fn to_vector(c: &Coordinate) -> Vector2<f64> {
    Vector2::new(c.latitude(), c.longitude())
}

fn from_vector(v: &Vector2<f64>) -> Coordinate {
    Coordinate::from_raw(v.x, v.y)
}

/// Great-circle (haversine) distance in meters
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude() - a.longitude()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h marginally above 1 for antipodal points
    let c = 2.0 * h.min(1.0).sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Initial compass bearing from `a` toward `b`, in [0, 360)
///
/// Returns 0 when both points are equal.
pub fn initial_bearing_degrees(a: &Coordinate, b: &Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let dlon = (b.longitude() - a.longitude()).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Linear blend `fraction * b + (1 - fraction) * a` on each axis
///
/// `fraction` is not clamped: values outside [0, 1] extrapolate along the
/// same line, and the result may fall outside the valid coordinate ranges.
pub fn interpolate(a: &Coordinate, b: &Coordinate, fraction: f64) -> Coordinate {
    from_vector(&to_vector(a).lerp(&to_vector(b), fraction))
}

/// Duration of one traversal in milliseconds: `trunc(distance_m * 0.001)`
pub fn traversal_duration_millis(a: &Coordinate, b: &Coordinate) -> u64 {
    (distance_meters(a, b) * DURATION_SCALE) as u64
}

/// Smallest box containing both points
pub fn bounds(a: &Coordinate, b: &Coordinate) -> GeoBounds {
    let (va, vb) = (to_vector(a), to_vector(b));
    GeoBounds {
        south_west: from_vector(&va.inf(&vb)),
        north_east: from_vector(&va.sup(&vb)),
    }
}
