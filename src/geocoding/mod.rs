//! Place-name resolution at the boundary of the animator
//!
//! The animator only ever sees coordinates. Turning the text a user typed
//! into a coordinate happens here, and "not found" is kept apart from
//! "the lookup itself failed".

pub mod lookup;
pub mod gazetteer;

pub use lookup::{GeocodeError, GeocodeResult, Geocoder};
pub use gazetteer::Gazetteer;
