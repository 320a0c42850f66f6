//! Drivetrain configuration (`[Mechanical]` section).

use serde::Deserialize;

use super::units::Microsteps;

/// Gearing and step resolution between the motor and the spindle.
#[derive(Debug, Clone, Deserialize)]
pub struct MechanicalConfig {
    /// Motor revolutions per spindle revolution (worm ratio, e.g. 90.0).
    #[serde(rename = "motor_revs_per_spindle_rev")]
    pub gearing: f64,

    /// Full steps per motor revolution (typically 200 for 1.8° motors).
    #[serde(rename = "motor_fullsteps_per_rev")]
    pub fullsteps_per_rev: u16,

    /// Microstep setting (1, 2, 4, 8, 16, 32, etc.).
    #[serde(rename = "motor_microsteps_per_fullstep")]
    pub microsteps: Microsteps,
}

impl MechanicalConfig {
    /// Steps per spindle revolution: gearing × full steps × microsteps,
    /// truncated to an integer.
    pub fn steps_per_revolution(&self) -> i64 {
        (self.gearing * self.fullsteps_per_rev as f64 * self.microsteps.value() as f64) as i64
    }
}
