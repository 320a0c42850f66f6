//! System configuration - root configuration structure.

use serde::Deserialize;

use super::drivetrain::MechanicalConfig;
use super::motor::MotorConfig;

/// Root configuration structure from TOML.
///
/// Loaded once at startup and read-only thereafter.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Gearing and step resolution.
    #[serde(rename = "Mechanical")]
    pub mechanical: MechanicalConfig,

    /// Current and speed settings.
    #[serde(rename = "Motor")]
    pub motor: MotorConfig,
}

impl SystemConfig {
    /// Create a configuration from its two sections.
    pub fn new(mechanical: MechanicalConfig, motor: MotorConfig) -> Self {
        Self { mechanical, motor }
    }

    /// Steps per spindle revolution.
    pub fn steps_per_revolution(&self) -> i64 {
        self.mechanical.steps_per_revolution()
    }
}
