//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{MechanicalConfig, MotorConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Gearing and full steps are positive and yield at least one step per revolution
/// - Speeds are finite, non-negative and ordered `start <= min <= default <= max`
/// - Maximum speed and acceleration are positive
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    validate_mechanical(&config.mechanical)?;
    validate_motor(&config.motor)?;
    Ok(())
}

fn validate_mechanical(config: &MechanicalConfig) -> Result<()> {
    if !(config.gearing.is_finite() && config.gearing > 0.0) {
        return Err(Error::Config(ConfigError::InvalidGearing(config.gearing)));
    }

    if config.fullsteps_per_rev == 0 {
        return Err(Error::Config(ConfigError::InvalidFullsteps(
            config.fullsteps_per_rev,
        )));
    }

    let steps = config.steps_per_revolution();
    if steps < 1 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(steps)));
    }

    Ok(())
}

fn validate_motor(config: &MotorConfig) -> Result<()> {
    let speeds = [
        ("start_speed", config.start_speed.0),
        ("min_speed", config.min_speed.0),
        ("max_speed", config.max_speed.0),
        ("default_speed", config.default_speed.0),
    ];
    for (name, value) in speeds {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::Config(ConfigError::InvalidSpeed { name, value }));
        }
    }

    if config.max_speed.0 <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidSpeed {
            name: "max_speed",
            value: config.max_speed.0,
        }));
    }

    let (start, min, default, max) = (
        config.start_speed.0,
        config.min_speed.0,
        config.default_speed.0,
        config.max_speed.0,
    );
    if !(start <= min && min <= default && default <= max) {
        return Err(Error::Config(ConfigError::InvalidSpeedOrdering {
            start,
            min,
            default,
            max,
        }));
    }

    if !(config.acceleration.0.is_finite() && config.acceleration.0 > 0.0) {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration.0,
        )));
    }

    Ok(())
}
