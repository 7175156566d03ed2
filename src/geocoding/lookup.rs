//! Place-name lookup interface

use crate::core::Coordinate;
use thiserror::Error;

/// Transient lookup failures, distinct from "no such place"
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("geocoding service unavailable: {reason}")]
    Unavailable { reason: String },
}

pub type GeocodeResult<T> = std::result::Result<T, GeocodeError>;

/// Resolves free text to at most one best-match coordinate
pub trait Geocoder {
    /// Returns `Ok(None)` when nothing matches the query
    fn lookup(&self, query: &str) -> GeocodeResult<Option<Coordinate>>;
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn lookup(&self, query: &str) -> GeocodeResult<Option<Coordinate>> {
        (**self).lookup(query)
    }
}
