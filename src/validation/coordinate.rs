//! Range checks applied before a coordinate is constructed

use crate::core::constants::{LATITUDE_RANGE, LONGITUDE_RANGE};
use crate::validation::error::{AnimationError, Result};

/// Checks latitude/longitude pairs against the geodetic ranges
pub struct CoordinateValidator;

impl CoordinateValidator {
    /// Whether a latitude is finite and inside [-90, 90]
    pub fn is_valid_latitude(latitude: f64) -> bool {
        latitude.is_finite() && latitude >= LATITUDE_RANGE.0 && latitude <= LATITUDE_RANGE.1
    }

    /// Whether a longitude is finite and inside [-180, 180]
    pub fn is_valid_longitude(longitude: f64) -> bool {
        longitude.is_finite() && longitude >= LONGITUDE_RANGE.0 && longitude <= LONGITUDE_RANGE.1
    }

    /// Validate a pair, reporting both values on failure
    pub fn validate(latitude: f64, longitude: f64) -> Result<()> {
        if Self::is_valid_latitude(latitude) && Self::is_valid_longitude(longitude) {
            Ok(())
        } else {
            Err(AnimationError::InvalidCoordinate { latitude, longitude })
        }
    }
}
