//! Configuration module for dividing-head.
//!
//! Provides types for loading and validating the drivetrain and motor
//! configuration from TOML files (with `std` feature) or pre-parsed data.

mod drivetrain;
mod mechanical;
mod motor;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use drivetrain::MechanicalConfig;
pub use mechanical::MechanicalConstraints;
pub use motor::MotorConfig;
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, DegreesPerSec, DegreesPerSecSquared, Microsteps, Milliamps};
