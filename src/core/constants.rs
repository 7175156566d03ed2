//! Geodetic constants and animation parameters

/// Mean Earth radius used by the haversine distance (m)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Multiplier applied to the route length in meters to obtain the traversal
/// duration in milliseconds.
///
/// This is a meters-to-kilometers factor whose result is then read as
/// milliseconds, so a 100 km route animates in 100 ms. Kept as-is so the
/// marker moves at the same pace as the map application it replaces.
pub const DURATION_SCALE: f64 = 0.001;

/// Valid latitude range (degrees)
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Valid longitude range (degrees)
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Default delay between two animation frames (milliseconds)
pub const DEFAULT_FRAME_INTERVAL_MS: u32 = 16;
