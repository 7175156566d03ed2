use crate::api::types::{LogLevel, OutputFormat};
use crate::core::constants::DEFAULT_FRAME_INTERVAL_MS;
use crate::geocoding::gazetteer::normalize_place_name;
use crate::validation::coordinate::CoordinateValidator;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Longest accepted frame interval (milliseconds)
pub const MAX_FRAME_INTERVAL_MS: u32 = 1000;

/// Most decimal places accepted for formatted output
pub const MAX_PRECISION: u8 = 12;

/// What to do with a route whose endpoints coincide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegenerateRoutePolicy {
    /// Accept it; the animation re-arms on every tick
    Allow,
    /// Refuse it with a degenerate-route error
    Reject,
}

/// Named place known to the gazetteer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceEntry {
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Animation configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Delay between frames delivered by the frame driver (milliseconds)
    pub frame_interval_ms: u32,
    /// Handling of routes with identical endpoints
    pub degenerate_route_policy: DegenerateRoutePolicy,
    /// Format used when printing samples
    pub output_format: OutputFormat,
    /// Decimal places kept when formatting samples
    pub precision: u8,
    /// Log level for the command-line tool
    pub log_level: LogLevel,
    /// Places resolvable by name
    pub places: Vec<PlaceEntry>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            degenerate_route_policy: DegenerateRoutePolicy::Allow,
            output_format: OutputFormat::Text,
            precision: 6,
            log_level: LogLevel::Info,
            places: Vec::new(),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    #[error("Place '{name}' is defined more than once")]
    DuplicatePlace { name: String },
    #[error("I/O error: {message}")]
    Io { message: String },
    #[error("Serialization error: {message}")]
    Serialization { message: String },
    #[error("No file path set for saving configuration")]
    NoFilePath,
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn into_result(self) -> Result<(), ConfigError> {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Batch parameter updates
#[derive(Debug, Default)]
pub struct ParameterUpdates {
    pub frame_interval_ms: Option<u32>,
    pub degenerate_route_policy: Option<DegenerateRoutePolicy>,
    pub output_format: Option<OutputFormat>,
    pub precision: Option<u8>,
    pub log_level: Option<LogLevel>,
    /// Places to add or replace
    pub places: Vec<PlaceEntry>,
    /// Whether to roll back every change if any update fails
    pub rollback_on_failure: bool,
}

impl ParameterUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_interval(mut self, frame_interval_ms: u32) -> Self {
        self.frame_interval_ms = Some(frame_interval_ms);
        self
    }

    pub fn with_degenerate_route_policy(mut self, policy: DegenerateRoutePolicy) -> Self {
        self.degenerate_route_policy = Some(policy);
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn with_place(mut self, place: PlaceEntry) -> Self {
        self.places.push(place);
        self
    }

    pub fn with_rollback_on_failure(mut self) -> Self {
        self.rollback_on_failure = true;
        self
    }

    pub fn count_updates(&self) -> usize {
        let mut count = 0;
        if self.frame_interval_ms.is_some() { count += 1; }
        if self.degenerate_route_policy.is_some() { count += 1; }
        if self.output_format.is_some() { count += 1; }
        if self.precision.is_some() { count += 1; }
        if self.log_level.is_some() { count += 1; }
        count + self.places.len()
    }
}

/// Result of a batch parameter update
#[derive(Debug)]
pub struct ParameterUpdateResult {
    pub applied_updates: Vec<String>,
    pub failed_updates: Vec<String>,
    pub total_updates: usize,
}

/// Loads, validates and persists [`AnimationConfig`]
pub struct ConfigurationManager {
    config: AnimationConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: AnimationConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn get_config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Replace the whole configuration after validating it
    pub fn update_config(&mut self, config: AnimationConfig) -> Result<(), ConfigError> {
        self.validate_config(&config).into_result()?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: AnimationConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Serialization {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        self.validate_config(&config).into_result()?;

        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::Serialization {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::Io {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::NoFilePath),
        }
    }

    /// Check if configuration has been modified since last load or save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Set the frame interval, returning the previous value
    pub fn set_frame_interval(&mut self, frame_interval_ms: u32) -> Result<u32, ConfigError> {
        check_frame_interval(frame_interval_ms)?;
        let old = self.config.frame_interval_ms;
        self.config.frame_interval_ms = frame_interval_ms;
        self.is_modified = true;
        Ok(old)
    }

    /// Set the output precision, returning the previous value
    pub fn set_precision(&mut self, precision: u8) -> Result<u8, ConfigError> {
        check_precision(precision)?;
        let old = self.config.precision;
        self.config.precision = precision;
        self.is_modified = true;
        Ok(old)
    }

    pub fn set_degenerate_route_policy(&mut self, policy: DegenerateRoutePolicy) -> DegenerateRoutePolicy {
        self.is_modified = true;
        std::mem::replace(&mut self.config.degenerate_route_policy, policy)
    }

    pub fn set_output_format(&mut self, format: OutputFormat) -> OutputFormat {
        self.is_modified = true;
        std::mem::replace(&mut self.config.output_format, format)
    }

    pub fn set_log_level(&mut self, level: LogLevel) -> LogLevel {
        self.is_modified = true;
        std::mem::replace(&mut self.config.log_level, level)
    }

    /// Add a place, replacing any entry with the same name
    pub fn set_place(&mut self, place: PlaceEntry) -> Result<Option<PlaceEntry>, ConfigError> {
        check_place(&place)?;
        self.is_modified = true;
        let key = normalize_place_name(&place.name);
        match self
            .config
            .places
            .iter()
            .position(|p| normalize_place_name(&p.name) == key)
        {
            Some(index) => Ok(Some(std::mem::replace(&mut self.config.places[index], place))),
            None => {
                self.config.places.push(place);
                Ok(None)
            }
        }
    }

    /// Remove a place by name
    pub fn remove_place(&mut self, name: &str) -> Option<PlaceEntry> {
        let key = normalize_place_name(name);
        let index = self
            .config
            .places
            .iter()
            .position(|p| normalize_place_name(&p.name) == key)?;
        self.is_modified = true;
        Some(self.config.places.remove(index))
    }

    /// Apply several updates at once
    pub fn update_parameters(
        &mut self,
        updates: ParameterUpdates,
    ) -> Result<ParameterUpdateResult, ConfigError> {
        let original_config = self.config.clone();
        let original_modified = self.is_modified;
        let total_updates = updates.count_updates();

        let mut applied_updates = Vec::new();
        let mut failed_updates = Vec::new();

        if let Some(interval) = updates.frame_interval_ms {
            match self.set_frame_interval(interval) {
                Ok(old) => applied_updates.push(format!("frame_interval_ms: {} -> {}", old, interval)),
                Err(e) => failed_updates.push(format!("frame_interval_ms: {}", e)),
            }
        }

        if let Some(precision) = updates.precision {
            match self.set_precision(precision) {
                Ok(old) => applied_updates.push(format!("precision: {} -> {}", old, precision)),
                Err(e) => failed_updates.push(format!("precision: {}", e)),
            }
        }

        if let Some(policy) = updates.degenerate_route_policy {
            let old = self.set_degenerate_route_policy(policy);
            applied_updates.push(format!("degenerate_route_policy: {:?} -> {:?}", old, policy));
        }

        if let Some(format) = updates.output_format {
            let old = self.set_output_format(format);
            applied_updates.push(format!("output_format: {:?} -> {:?}", old, format));
        }

        if let Some(level) = updates.log_level {
            let old = self.set_log_level(level);
            applied_updates.push(format!("log_level: {:?} -> {:?}", old, level));
        }

        for place in updates.places {
            let name = place.name.clone();
            match self.set_place(place) {
                Ok(Some(_)) => applied_updates.push(format!("place '{}' replaced", name)),
                Ok(None) => applied_updates.push(format!("place '{}' added", name)),
                Err(e) => failed_updates.push(format!("place '{}': {}", name, e)),
            }
        }

        if !failed_updates.is_empty() && updates.rollback_on_failure {
            self.config = original_config;
            self.is_modified = original_modified;

            return Err(ConfigError::InvalidParameter {
                parameter: "batch_update".to_string(),
                value: "multiple".to_string(),
                reason: format!(
                    "Batch update failed with {} errors, rolled back all changes: {}",
                    failed_updates.len(),
                    failed_updates.join("; ")
                ),
            });
        }

        Ok(ParameterUpdateResult {
            applied_updates,
            failed_updates,
            total_updates,
        })
    }

    /// Validate a configuration without applying it
    pub fn validate_config(&self, config: &AnimationConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if let Err(e) = check_frame_interval(config.frame_interval_ms) {
            errors.push(e);
        } else if config.frame_interval_ms > 100 {
            warnings.push(format!(
                "Frame interval of {} ms will make the marker move in visible jumps",
                config.frame_interval_ms
            ));
        }

        if let Err(e) = check_precision(config.precision) {
            errors.push(e);
        }

        let mut seen = HashSet::new();
        for place in &config.places {
            if let Err(e) = check_place(place) {
                errors.push(e);
            }
            if !seen.insert(normalize_place_name(&place.name)) {
                errors.push(ConfigError::DuplicatePlace {
                    name: place.name.clone(),
                });
            }
        }

        if config.places.is_empty() {
            warnings.push("No places configured; only literal coordinates can be resolved".to_string());
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

fn check_frame_interval(frame_interval_ms: u32) -> Result<(), ConfigError> {
    if frame_interval_ms == 0 || frame_interval_ms > MAX_FRAME_INTERVAL_MS {
        return Err(ConfigError::InvalidParameter {
            parameter: "frame_interval_ms".to_string(),
            value: frame_interval_ms.to_string(),
            reason: format!("Frame interval must be between 1 and {} ms", MAX_FRAME_INTERVAL_MS),
        });
    }
    Ok(())
}

fn check_precision(precision: u8) -> Result<(), ConfigError> {
    if precision > MAX_PRECISION {
        return Err(ConfigError::InvalidParameter {
            parameter: "precision".to_string(),
            value: precision.to_string(),
            reason: format!("Precision must be at most {} decimal places", MAX_PRECISION),
        });
    }
    Ok(())
}

fn check_place(place: &PlaceEntry) -> Result<(), ConfigError> {
    if place.name.trim().is_empty() {
        return Err(ConfigError::InvalidParameter {
            parameter: "places.name".to_string(),
            value: place.name.clone(),
            reason: "Place name must not be empty".to_string(),
        });
    }
    if CoordinateValidator::validate(place.latitude, place.longitude).is_err() {
        return Err(ConfigError::InvalidParameter {
            parameter: format!("places.{}", place.name),
            value: format!("{}, {}", place.latitude, place.longitude),
            reason: "Latitude must be within [-90, 90] and longitude within [-180, 180]".to_string(),
        });
    }
    Ok(())
}
