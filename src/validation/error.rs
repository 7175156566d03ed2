//! Error taxonomy for route construction, planning and configuration

use crate::api::types::CallbackHandle;
use crate::geocoding::GeocodeError;
use crate::utils::config::ConfigError;
use std::fmt;
use thiserror::Error;

/// Which of the two location fields an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    From,
    To,
}

impl fmt::Display for LocationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationField::From => write!(f, "from"),
            LocationField::To => write!(f, "to"),
        }
    }
}

/// Errors raised by the route animation crate
#[derive(Error, Debug)]
pub enum AnimationError {
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("Route origin and destination are the same point")]
    DegenerateRoute,
    #[error("No text entered for the {field} location")]
    EmptyLocation { field: LocationField },
    #[error("Could not find the {field} location '{query}'")]
    LocationNotFound { field: LocationField, query: String },
    #[error("Geocoder unavailable while resolving the {field} location: {source}")]
    GeocoderUnavailable {
        field: LocationField,
        #[source]
        source: GeocodeError,
    },
    #[error("Unknown callback handle {0:?}")]
    UnknownCallback(CallbackHandle),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, AnimationError>;
