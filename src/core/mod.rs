//! Core types and constants for route animation

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
