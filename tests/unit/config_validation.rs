//! Unit tests for configuration validation.

use dividing_head::config::units::{DegreesPerSec, DegreesPerSecSquared};
use dividing_head::config::{validate_config, SystemConfig};
use dividing_head::error::{ConfigError, Error};

fn config(mechanical: &str, motor: &str) -> SystemConfig {
    let toml_str = format!("[Mechanical]\n{}\n\n[Motor]\n{}\n", mechanical, motor);
    toml::from_str(&toml_str).expect("Failed to parse TOML")
}

const MECHANICAL: &str = r#"
motor_revs_per_spindle_rev = 90.0
motor_fullsteps_per_rev = 200
motor_microsteps_per_fullstep = 16
"#;

const MOTOR: &str = r#"
max_current = 1500
start_speed = 0.1
min_speed = 0.5
max_speed = 20.0
default_speed = 5.0
acceleration = 4.0
"#;

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    assert!(validate_config(&config(MECHANICAL, MOTOR)).is_ok());
}

/// Zero gearing cannot produce a usable axis.
#[test]
fn test_zero_gearing() {
    let mechanical = MECHANICAL.replace("= 90.0", "= 0.0");
    let result = validate_config(&config(&mechanical, MOTOR));
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidGearing(_)))
    ));
}

/// Zero full steps per motor revolution.
#[test]
fn test_zero_fullsteps() {
    let mechanical = MECHANICAL.replace("= 200", "= 0");
    let result = validate_config(&config(&mechanical, MOTOR));
    assert_eq!(result, Err(Error::Config(ConfigError::InvalidFullsteps(0))));
}

/// Start speed above the minimum speed.
#[test]
fn test_speed_ordering() {
    let mut config = config(MECHANICAL, MOTOR);
    config.motor.start_speed = DegreesPerSec(1.0);

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSpeedOrdering { .. }))
    ));
}

/// Equal speeds are a valid (if fixed-speed) setup.
#[test]
fn test_equal_speeds_allowed() {
    let mut config = config(MECHANICAL, MOTOR);
    config.motor.start_speed = DegreesPerSec(5.0);
    config.motor.min_speed = DegreesPerSec(5.0);
    config.motor.max_speed = DegreesPerSec(5.0);

    assert!(validate_config(&config).is_ok());
}

/// Zero maximum speed.
#[test]
fn test_zero_max_speed() {
    let mut config = config(MECHANICAL, MOTOR);
    config.motor.start_speed = DegreesPerSec(0.0);
    config.motor.min_speed = DegreesPerSec(0.0);
    config.motor.default_speed = DegreesPerSec(0.0);
    config.motor.max_speed = DegreesPerSec(0.0);

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSpeed { name: "max_speed", .. }))
    ));
}

/// Non-finite speeds are rejected by name.
#[test]
fn test_nan_speed() {
    let mut config = config(MECHANICAL, MOTOR);
    config.motor.default_speed = DegreesPerSec(f64::NAN);

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSpeed { name: "default_speed", .. }))
    ));
}

/// Negative acceleration.
#[test]
fn test_negative_acceleration() {
    let mut config = config(MECHANICAL, MOTOR);
    config.motor.acceleration = DegreesPerSecSquared(-4.0);

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidAcceleration(_)))
    ));
}

/// Error messages are human readable.
#[test]
fn test_error_display() {
    let err = Error::Config(ConfigError::InvalidFullsteps(0));
    assert_eq!(
        err.to_string(),
        "Configuration error: Invalid full steps per revolution: 0. Must be > 0"
    );
}
