//! Motion controller for dividing-head.
//!
//! Turns angle-space commands (absolute, relative, division) into step
//! register targets and runs the derived motion state machine.

mod anchor;
mod division;
mod motion_controller;
mod state;
mod target;

pub use anchor::{PositionAnchor, TargetCandidates};
pub use division::{DivisionTable, MAX_DIVISIONS};
pub use motion_controller::MotionController;
pub use state::{MotionState, MotorObservation, IDLE_POLL_INTERVAL, MOVING_POLL_INTERVAL};
pub use target::{Direction, TargetMode};
