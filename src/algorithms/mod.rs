//! Geometric algorithms

pub mod geomath;

pub use geomath::{bounds, distance_meters, initial_bearing_degrees, interpolate, traversal_duration_millis};
