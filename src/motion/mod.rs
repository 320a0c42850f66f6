//! Motion module for dividing-head.
//!
//! Provides trapezoidal motion profile planning and time-based execution.

mod executor;
mod profile;

pub use executor::MotionExecutor;
pub use profile::{MotionPhase, MotionProfile, ProfileSample};
