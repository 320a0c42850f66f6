//! Mechanical constraints derived from the system configuration.

use super::system::SystemConfig;
use super::units::{DegreesPerSec, Microsteps, Milliamps};

/// Derived mechanical parameters computed from configuration.
///
/// These are computed once at initialization and used for all target
/// resolution and motion planning.
#[derive(Debug, Clone)]
pub struct MechanicalConstraints {
    /// Total steps per spindle revolution (gearing × full steps × microsteps).
    pub steps_per_revolution: i64,

    /// Steps per degree of spindle rotation.
    pub steps_per_degree: f64,

    /// Start speed in steps per second.
    pub start_speed_steps_per_sec: f64,

    /// Acceleration in steps per second squared.
    pub acceleration_steps_per_sec2: f64,

    /// Microstep setting handed to the driver.
    pub microsteps: Microsteps,

    /// Requested run current handed to the driver.
    pub max_current: Milliamps,

    /// Lowest selectable speed.
    pub min_speed: DegreesPerSec,

    /// Highest selectable speed.
    pub max_speed: DegreesPerSec,

    /// Speed selected at startup.
    pub default_speed: DegreesPerSec,
}

impl MechanicalConstraints {
    /// Compute mechanical constraints from a system configuration.
    pub fn from_config(config: &SystemConfig) -> Self {
        let steps_per_revolution = config.steps_per_revolution();
        let steps_per_degree = steps_per_revolution as f64 / 360.0;
        let motor = &config.motor;

        Self {
            steps_per_revolution,
            steps_per_degree,
            start_speed_steps_per_sec: motor.start_speed.0 * steps_per_degree,
            acceleration_steps_per_sec2: motor.acceleration.0 * steps_per_degree,
            microsteps: config.mechanical.microsteps,
            max_current: motor.max_current,
            min_speed: motor.min_speed,
            max_speed: motor.max_speed,
            default_speed: motor.default_speed,
        }
    }

    /// Convert deg/sec to steps/sec.
    #[inline]
    pub fn velocity_to_steps(&self, velocity: DegreesPerSec) -> f64 {
        velocity.0 * self.steps_per_degree
    }

    /// Clamp a requested speed into the selectable range.
    #[inline]
    pub fn clamp_speed(&self, speed: DegreesPerSec) -> DegreesPerSec {
        DegreesPerSec(speed.0.max(self.min_speed.0).min(self.max_speed.0))
    }
}
