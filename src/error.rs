//! Error types for the dividing-head library.
//!
//! Provides unified error handling across configuration, motor backends,
//! kinematic planning and the motion controller.

use core::fmt;

use crate::controller::MotionState;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all dividing-head operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor backend error
    Motor(MotorError),
    /// Motion profile planning error
    Motion(MotionError),
    /// Controller event error
    Controller(ControllerError),
}

/// Configuration-related errors. Fatal at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Invalid gearing (motor revolutions per spindle revolution must be > 0)
    InvalidGearing(f64),
    /// Invalid full steps per motor revolution (must be > 0)
    InvalidFullsteps(u16),
    /// Derived steps per spindle revolution is zero
    InvalidStepsPerRevolution(i64),
    /// A speed value is negative or not finite
    InvalidSpeed {
        /// Configuration key
        name: &'static str,
        /// Offending value in degrees per second
        value: f64,
    },
    /// Speeds are not ordered `start <= min <= default <= max`
    InvalidSpeedOrdering {
        /// Start speed
        start: f64,
        /// Minimum speed
        min: f64,
        /// Default speed
        default: f64,
        /// Maximum speed
        max: f64,
    },
    /// Invalid acceleration (must be > 0)
    InvalidAcceleration(f64),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor contract errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Move requested while the motor is de-energized
    NotEnergized,
    /// Move requested while another move is still running
    MoveInProgress,
    /// Move requested to the position the motor is already at
    NoOpMove {
        /// Current (and requested) register value
        position: i64,
    },
    /// Requested top speed is below the configured start speed
    SpeedTooLow {
        /// Requested top speed in steps/s
        requested: f64,
        /// Configured start speed in steps/s
        start_speed: f64,
    },
    /// Transport failure in a hardware backend
    HardwareFault,
}

/// Kinematic planning errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Degenerate profile inputs (zero distance, non-positive acceleration,
    /// or a top speed below the start speed)
    InvalidProfileRequest {
        /// Requested distance in steps
        distance: f64,
        /// Start speed in steps/s
        start_speed: f64,
        /// Top speed in steps/s
        top_speed: f64,
        /// Acceleration in steps/s²
        acceleration: f64,
    },
}

/// Motion controller event errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// Event issued outside its allowed state set
    InvalidStateTransition {
        /// Event name
        event: &'static str,
        /// State the controller was in
        state: MotionState,
    },
    /// Angle that is not finite or whose step register does not fit in an `i64`
    AngleOutOfRange(f64),
    /// Division count below 2 or above the table capacity
    InvalidDivisionCount(usize),
    /// Selected division index outside the table
    InvalidDivisionIndex {
        /// Requested index
        index: f64,
        /// Number of divisions in the table
        num_divs: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
            Error::Controller(e) => write!(f, "Controller error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::InvalidGearing(v) => write!(f, "Invalid gearing: {}. Must be > 0", v),
            ConfigError::InvalidFullsteps(v) => write!(f, "Invalid full steps per revolution: {}. Must be > 0", v),
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per spindle revolution: {}. Must be >= 1", v)
            }
            ConfigError::InvalidSpeed { name, value } => {
                write!(f, "Invalid {}: {}. Must be a finite value >= 0", name, value)
            }
            ConfigError::InvalidSpeedOrdering { start, min, default, max } => write!(
                f,
                "Speeds must satisfy start ({}) <= min ({}) <= default ({}) <= max ({})",
                start, min, default, max
            ),
            ConfigError::InvalidAcceleration(v) => write!(f, "Invalid acceleration: {}. Must be > 0", v),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::NotEnergized => write!(f, "Cannot move when not energized"),
            MotorError::MoveInProgress => write!(f, "Attempted to interrupt a move in progress"),
            MotorError::NoOpMove { position } => {
                write!(f, "Attempted move to current position {}", position)
            }
            MotorError::SpeedTooLow { requested, start_speed } => {
                write!(f, "Top speed {} is below start speed {}", requested, start_speed)
            }
            MotorError::HardwareFault => write!(f, "Motor hardware fault"),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidProfileRequest { distance, start_speed, top_speed, acceleration } => write!(
                f,
                "Invalid profile request: distance {}, start speed {}, top speed {}, acceleration {}",
                distance, start_speed, top_speed, acceleration
            ),
        }
    }
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::InvalidStateTransition { event, state } => {
                write!(f, "Event '{}' is not allowed in state {:?}", event, state)
            }
            ControllerError::AngleOutOfRange(angle) => {
                write!(f, "Angle {} has no step register", angle)
            }
            ControllerError::InvalidDivisionCount(n) => {
                write!(f, "Invalid number of divisions: {}", n)
            }
            ControllerError::InvalidDivisionIndex { index, num_divs } => {
                write!(f, "Division index {} out of range for {} divisions", index, num_divs)
            }
        }
    }
}

/// Copy `text` into an error message buffer, cutting it at capacity on a
/// character boundary.
pub(crate) fn truncated_message(text: &str) -> heapless::String<128> {
    let mut message = heapless::String::new();
    for c in text.chars() {
        if message.push(c).is_err() {
            break;
        }
    }
    message
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

impl From<ControllerError> for Error {
    fn from(e: ControllerError) -> Self {
        Error::Controller(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}

#[cfg(feature = "std")]
impl std::error::Error for ControllerError {}
