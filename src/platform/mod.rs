//! Platform abstraction for time keeping
//!
//! The animator never reads the system time directly. It is handed a
//! [`Clock`], which is a [`SystemClock`] in production and a [`ManualClock`]
//! in tests and offline playback.

pub mod clock;
pub mod mock;

pub use clock::{Clock, SystemClock};
pub use mock::ManualClock;
