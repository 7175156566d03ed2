//! Common API types and data structures

use crate::core::{Coordinate, GeoBounds, Route};
use serde::{Deserialize, Serialize};

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub(crate) fn new(id: u32) -> Self {
        CallbackHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Animator lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationState {
    /// No route has been started yet
    Idle,
    /// A traversal of `route` is in progress
    Running {
        route: Route,
        epoch: u64,
        start_time_ms: u64,
        duration_ms: u64,
    },
    /// The last route was cancelled
    Cancelled,
}

impl AnimationState {
    pub fn is_running(&self) -> bool {
        matches!(self, AnimationState::Running { .. })
    }
}

/// Static geometry drawn once per started route
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteOverlay {
    pub origin: Coordinate,
    pub destination: Coordinate,
    /// Box the map camera should fit
    pub bounds: GeoBounds,
    /// Marker rotation for the whole route
    pub bearing_deg: f64,
    pub distance_m: f64,
    pub duration_ms: u64,
}

/// Why an epoch stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetireReason {
    /// A new route was started on top of it
    Replaced,
    /// `cancel()` was called
    Cancelled,
}

/// Lifecycle notifications for the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatorEvent {
    /// A route was started; draw its line and endpoint markers
    RouteArmed { epoch: u64, overlay: RouteOverlay },
    /// The traversal completed and restarted from the origin
    Rearmed { epoch: u64 },
    /// The running epoch was torn down; clear the route overlay
    RouteRetired { epoch: u64, reason: RetireReason },
}

/// Counters kept by the animator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimatorStats {
    /// Epochs armed, including re-arms
    pub epochs_armed: u64,
    /// Calls to `start`
    pub routes_started: u64,
    /// Samples delivered to callbacks
    pub samples_emitted: u64,
    /// Ticks dropped because they carried a retired epoch
    pub stale_ticks_discarded: u64,
}

/// Sample output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// One JSON object per sample
    Json,
    /// Comma-separated rows
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// Logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging
    Off,
    /// Error messages only
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and info messages
    Info,
    /// Everything including per-epoch debug output
    Debug,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
        }
    }
}
