//! Utility modules for configuration

pub mod config;

pub use config::{
    AnimationConfig, ConfigError, ConfigurationManager, DegenerateRoutePolicy, ParameterUpdates,
    PlaceEntry,
};
