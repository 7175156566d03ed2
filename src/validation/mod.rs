//! Input validation and error types

pub mod coordinate;
pub mod error;

pub use coordinate::CoordinateValidator;
pub use error::{AnimationError, LocationField, Result};
