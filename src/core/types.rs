//! Core data types for route animation

use crate::validation::coordinate::CoordinateValidator;
use crate::validation::error::Result;
use serde::Serialize;
use std::fmt;

/// Geographic coordinate in decimal degrees
///
/// Equality is exact on both fields. Only [`Coordinate::new`] validates the
/// ranges; values produced by extrapolating interpolation are not re-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range or non-finite values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        CoordinateValidator::validate(latitude, longitude)?;
        Ok(Self { latitude, longitude })
    }

    pub(crate) fn from_raw(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Ordered origin/destination pair defining one traversal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Route {
    pub origin: Coordinate,
    pub destination: Coordinate,
}

impl Route {
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self { origin, destination }
    }

    /// Origin and destination are the same point
    pub fn is_degenerate(&self) -> bool {
        self.origin == self.destination
    }
}

/// South-west / north-east box enclosing a set of coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoBounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl GeoBounds {
    pub fn contains(&self, point: &Coordinate) -> bool {
        point.latitude >= self.south_west.latitude
            && point.latitude <= self.north_east.latitude
            && point.longitude >= self.south_west.longitude
            && point.longitude <= self.north_east.longitude
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::from_raw(
            (self.south_west.latitude + self.north_east.latitude) / 2.0,
            (self.south_west.longitude + self.north_east.longitude) / 2.0,
        )
    }
}

/// One frame of marker state handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSample {
    /// Marker position
    pub position: Coordinate,
    /// Marker rotation, degrees clockwise from north
    pub bearing_deg: f64,
    /// Whether the marker is shown
    pub marker_visible: bool,
    /// Traversal progress, 0 at origin and 1 at destination
    pub fraction: f64,
    /// Epoch that produced this sample
    pub epoch: u64,
    /// Clock time of the sample (milliseconds)
    pub timestamp_ms: u64,
}
