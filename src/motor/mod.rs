//! Motor module for dividing-head.
//!
//! Defines the [`Motor`] capability trait consumed by the motion controller,
//! together with the backends that implement it:
//!
//! - [`SimulatedMotor`]: profile-engine driven reference implementation
//! - [`RegisterMotor`]: SPI register-based driver with an internal ramp generator

mod current;
mod register;
pub mod registers;
mod simulated;

pub use current::{quantize_current, CurrentRange, CurrentSetting};
pub use register::{RegisterMotor, DEFAULT_FCLK_HZ};
pub use simulated::SimulatedMotor;

use crate::config::units::{Microsteps, Milliamps};
use crate::error::Result;

/// Capability set of a single-axis stepper actuator.
///
/// Positions are raw step register values: unbounded, signed, never wrapped
/// to a revolution. Speeds are in steps/s and accelerations in steps/s².
///
/// Implementations must be polled through [`update_state`](Motor::update_state)
/// by their owner; none of the methods block for the duration of a move.
pub trait Motor {
    /// One-time driver setup for microstep resolution and run current.
    ///
    /// Returns the current setting actually applied. Backends without a
    /// current limit accept any value unchanged.
    fn setup_driver(&mut self, microsteps: Microsteps, max_current: Milliamps) -> Result<CurrentSetting> {
        let _ = microsteps;
        Ok(CurrentSetting::exact(max_current))
    }

    /// Energize the motor coils.
    fn set_power_on(&mut self) -> Result<()>;

    /// De-energize the motor coils.
    ///
    /// A move in progress ends immediately at the current position.
    fn set_power_off(&mut self) -> Result<()>;

    /// Whether the coils are energized.
    fn is_energized(&self) -> bool;

    /// Whether a move is in progress.
    fn is_moving(&self) -> bool;

    /// Whether the move in progress is decelerating to a requested stop.
    fn is_stopping(&self) -> bool;

    /// Current step register value.
    fn position(&self) -> i64;

    /// Step register value of the last commanded move target.
    fn target_position(&self) -> i64;

    /// Set the acceleration used for subsequent moves, steps/s².
    fn set_acceleration(&mut self, acceleration: f64) -> Result<()>;

    /// Set the speed moves start and end at, steps/s.
    fn set_start_speed(&mut self, start_speed: f64) -> Result<()>;

    /// Start a move to `target` with the given top speed.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`MotorError::NotEnergized`](crate::error::MotorError::NotEnergized)
    /// - [`MotorError::MoveInProgress`](crate::error::MotorError::MoveInProgress)
    /// - [`MotorError::NoOpMove`](crate::error::MotorError::NoOpMove)
    /// - [`MotorError::SpeedTooLow`](crate::error::MotorError::SpeedTooLow)
    fn start_move_to_position(&mut self, target: i64, top_speed: f64) -> Result<()>;

    /// Request a controlled deceleration from the current speed.
    ///
    /// Safe to call when not moving.
    fn stop(&mut self) -> Result<()>;

    /// Advance the simulation or poll the hardware.
    fn update_state(&mut self) -> Result<()>;
}
