//! Route Animator
//!
//! Animates a map marker along the straight line between two geographic
//! points, repeating the one-way traversal until the route is replaced or
//! cancelled. Great-circle distance and bearing come from the haversine
//! formulas; the marker position itself is a planar interpolation of
//! latitude and longitude.

pub mod core;
pub mod algorithms;
pub mod validation;
pub mod utils;
pub mod platform;
pub mod geocoding;
pub mod api;

// Re-export commonly used types
pub use crate::core::{Coordinate, GeoBounds, ProgressSample, Route, EARTH_RADIUS_M};
pub use algorithms::geomath::{
    bounds, distance_meters, initial_bearing_degrees, interpolate, traversal_duration_millis,
};
pub use validation::{AnimationError, LocationField, Result};
pub use platform::{Clock, ManualClock, SystemClock};
pub use geocoding::{GeocodeError, Gazetteer, Geocoder};
pub use utils::{AnimationConfig, ConfigError, ConfigurationManager, DegenerateRoutePolicy};
pub use api::{
    AnimationState, AnimatorEvent, FrameDriver, OutputFormat, RouteAnimator, RoutePlanner,
    SampleFormatter, SharedAnimator,
};
