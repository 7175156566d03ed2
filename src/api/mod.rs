//! Animator API and its collaborators
//!
//! [`RouteAnimator`] is the state machine, [`FrameDriver`] feeds it ticks
//! from a background thread, [`RoutePlanner`] turns typed place names into
//! routes, and the formatters render samples for output.

pub mod animator;
pub mod driver;
pub mod formatting;
pub mod planner;
pub mod types;

pub use animator::{EventCallback, RouteAnimator, SampleCallback};
pub use driver::{lock_animator, FrameDriver, SharedAnimator};
pub use formatting::{CsvFormatter, FormattedSample, JsonFormatter, SampleFormatter, TextFormatter};
pub use planner::RoutePlanner;
pub use types::{
    AnimationState, AnimatorEvent, AnimatorStats, CallbackHandle, LogLevel, OutputFormat,
    RetireReason, RouteOverlay,
};
