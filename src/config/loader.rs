//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{truncated_message, ConfigError, Error, Result};

use super::SystemConfig;

#[cfg(feature = "defmt")]
use defmt::info;

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {{}};
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use dividing_head::load_config;
///
/// let config = load_config("rotary.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        Error::Config(ConfigError::IoError(truncated_message(&e.to_string())))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content).map_err(|e| {
        Error::Config(ConfigError::ParseError(truncated_message(e.message())))
    })?;

    // Validate the configuration
    super::validation::validate_config(&config)?;

    info!(
        "configuration loaded: {} steps/rev",
        config.steps_per_revolution()
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROTARY_TOML: &str = r#"
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

    #[test]
    fn test_parse_rotary_config() {
        let config = parse_config(ROTARY_TOML).unwrap();
        assert_eq!(config.steps_per_revolution(), 288_000);
        assert_eq!(config.motor.max_current.value(), 1500);
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let toml = r#"
[Mechanical]
motor_revs_per_spindle_rev = 90.0
motor_fullsteps_per_rev = 200
motor_microsteps_per_fullstep = 16
"#;

        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_parse_error_carries_message() {
        let toml = ROTARY_TOML.replace("[Motor]", "[Drive]");

        match parse_config(&toml) {
            Err(Error::Config(ConfigError::ParseError(msg))) => assert!(msg.contains("Motor")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_speeds_accepted() {
        let toml = ROTARY_TOML.replace("max_speed = 20.0", "max_speed = 20");
        let config = parse_config(&toml).unwrap();
        assert_eq!(config.motor.max_speed.value(), 20.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_config("/nonexistent/rotary.toml"),
            Err(Error::Config(ConfigError::IoError(_)))
        ));
    }
}
