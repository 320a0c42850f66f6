//! # dividing-head
//!
//! Motion control for a stepper-driven rotary dividing head.
//!
//! ## Features
//!
//! - **Three targeting modes**: absolute angle, relative angle, N-way division
//! - **Unbounded register space**: the step counter never wraps, angles are
//!   resolved against a position anchor
//! - **Trapezoidal kinematics**: accel/cruise/decel profiles that degrade to
//!   triangles on short moves, with a decelerating re-plan on stop
//! - **Derived state machine**: the motion state is always recomputed from
//!   what the motor reports
//! - **Pluggable motors**: a simulated reference motor and an SPI
//!   register-based driver behind one [`Motor`](motor::Motor) trait
//! - **no_std compatible**: only configuration file loading needs `std`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dividing_head::clock::SystemClock;
//! use dividing_head::config::units::Degrees;
//! use dividing_head::controller::{MotionController, TargetMode};
//! use dividing_head::motor::SimulatedMotor;
//!
//! let config = dividing_head::load_config("rotary.toml")?;
//! let mut controller = MotionController::new(SimulatedMotor::new(SystemClock::new()), &config)?;
//!
//! controller.power()?;
//! controller.set_division(24, Degrees(0.0), Degrees(360.0))?;
//! controller.set_target_mode(TargetMode::Division)?;
//! controller.set_target(5.0)?;
//! controller.start_stop()?;
//!
//! loop {
//!     controller.periodic()?;
//!     std::thread::sleep(controller.poll_interval());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and the wall clock
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod motion;
pub mod motor;

// Re-exports for ergonomic API
pub use config::{validate_config, MechanicalConfig, MechanicalConstraints, MotorConfig, SystemConfig};
pub use controller::{Direction, MotionController, MotionState, TargetMode};
pub use error::{Error, Result};
pub use motion::{MotionPhase, MotionProfile};
pub use motor::{Motor, RegisterMotor, SimulatedMotor};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, DegreesPerSec, DegreesPerSecSquared, Microsteps, Milliamps};
