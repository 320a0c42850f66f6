//! Unit tests for TOML configuration parsing.

use dividing_head::config::units::{DegreesPerSec, DegreesPerSecSquared, Milliamps};
use dividing_head::config::{MechanicalConstraints, SystemConfig};
use dividing_head::error::{ConfigError, Error};
use dividing_head::parse_config;

const DIVIDING_HEAD_TOML: &str = r#"
[Mechanical]
motor_revs_per_spindle_rev = 90.0
motor_fullsteps_per_rev = 200
motor_microsteps_per_fullstep = 16

[Motor]
max_current = 1500
start_speed = 0.1
min_speed = 0.5
max_speed = 20.0
default_speed = 5.0
acceleration = 4.0
"#;

/// Test parsing both sections of a valid configuration.
#[test]
fn test_parse_sections() {
    let config: SystemConfig = toml::from_str(DIVIDING_HEAD_TOML).expect("Failed to parse TOML");

    assert_eq!(config.mechanical.gearing, 90.0);
    assert_eq!(config.mechanical.fullsteps_per_rev, 200);
    assert_eq!(config.mechanical.microsteps.value(), 16);

    assert_eq!(config.motor.max_current, Milliamps(1500));
    assert_eq!(config.motor.start_speed, DegreesPerSec(0.1));
    assert_eq!(config.motor.min_speed, DegreesPerSec(0.5));
    assert_eq!(config.motor.max_speed, DegreesPerSec(20.0));
    assert_eq!(config.motor.default_speed, DegreesPerSec(5.0));
    assert_eq!(config.motor.acceleration, DegreesPerSecSquared(4.0));
}

/// Test that derived constraints are computed in step units.
#[test]
fn test_derived_constraints() {
    let config = parse_config(DIVIDING_HEAD_TOML).expect("Failed to parse config");
    let constraints = MechanicalConstraints::from_config(&config);

    assert_eq!(constraints.steps_per_revolution, 288_000);
    assert_eq!(constraints.steps_per_degree, 800.0);
    assert_eq!(constraints.start_speed_steps_per_sec, 80.0);
    assert_eq!(constraints.acceleration_steps_per_sec2, 3200.0);
    assert_eq!(constraints.velocity_to_steps(DegreesPerSec(5.0)), 4000.0);
}

/// Integer values are accepted for speed fields.
#[test]
fn test_integer_speeds() {
    let toml_str = r#"
[Mechanical]
motor_revs_per_spindle_rev = 40
motor_fullsteps_per_rev = 200
motor_microsteps_per_fullstep = 8

[Motor]
max_current = 800
start_speed = 1
min_speed = 2
max_speed = 60
default_speed = 30
acceleration = 90
"#;

    let config = parse_config(toml_str).expect("Failed to parse config");
    assert_eq!(config.steps_per_revolution(), 64_000);
    assert_eq!(config.motor.default_speed, DegreesPerSec(30.0));
}

/// A missing section is a parse error.
#[test]
fn test_missing_motor_section() {
    let toml_str = r#"
[Mechanical]
motor_revs_per_spindle_rev = 90.0
motor_fullsteps_per_rev = 200
motor_microsteps_per_fullstep = 16
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::ParseError(_)))
    ));
}

/// A microstep setting the driver cannot select is rejected while parsing.
#[test]
fn test_invalid_microsteps_rejected() {
    let toml_str = DIVIDING_HEAD_TOML.replace(
        "motor_microsteps_per_fullstep = 16",
        "motor_microsteps_per_fullstep = 12",
    );

    assert!(matches!(
        parse_config(&toml_str),
        Err(Error::Config(ConfigError::ParseError(_)))
    ));
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("dividing_head_{}.toml", std::process::id()));
    std::fs::write(&path, DIVIDING_HEAD_TOML).expect("Failed to write config file");

    let config = dividing_head::load_config(&path).expect("Failed to load config");
    assert_eq!(config.steps_per_revolution(), 288_000);

    let _ = std::fs::remove_file(&path);
}

/// Test that a missing file reports an I/O error.
#[test]
fn test_load_missing_file() {
    let result = dividing_head::load_config("/nonexistent/dividing_head.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
}
