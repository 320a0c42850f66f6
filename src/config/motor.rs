//! Motor configuration (`[Motor]` section).

use serde::Deserialize;

use super::units::{DegreesPerSec, DegreesPerSecSquared, Milliamps};

/// Drive current and speed settings, expressed at the spindle.
#[derive(Debug, Clone, Deserialize)]
pub struct MotorConfig {
    /// Requested run current. Hardware backends may quantize this.
    pub max_current: Milliamps,

    /// Speed the motor can start from (and stop at) without ramping.
    pub start_speed: DegreesPerSec,

    /// Lowest speed the operator may select.
    pub min_speed: DegreesPerSec,

    /// Highest speed the operator may select.
    pub max_speed: DegreesPerSec,

    /// Speed selected at startup.
    pub default_speed: DegreesPerSec,

    /// Acceleration and deceleration rate.
    pub acceleration: DegreesPerSecSquared,
}
