//! Motion state derivation.
//!
//! The controller never stores a state that can drift from what the motor
//! reports. Every evaluation re-derives it from a [`MotorObservation`] and
//! the previously derived state.

use core::time::Duration;

use crate::motor::Motor;

/// Tick interval while the axis is moving.
pub const MOVING_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Tick interval while the axis is at rest.
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Top-level state of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// Motor coils are de-energized.
    Unpowered,
    /// Energized and at the target register.
    Idle,
    /// Energized, stationary, away from the target register.
    ReadyToMove,
    /// A move is in progress.
    Moving,
    /// A move is decelerating to a requested stop.
    Stopping,
}

/// Motor facts a state is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorObservation {
    /// Coils are energized.
    pub energized: bool,
    /// No move is in progress.
    pub stationary: bool,
    /// The move in progress is stopping.
    pub stopping: bool,
    /// Motor position equals the target register.
    pub destination_reached: bool,
}

impl MotorObservation {
    /// Observe `motor` against `target_register`.
    pub fn of<M: Motor>(motor: &M, target_register: i64) -> Self {
        Self {
            energized: motor.is_energized(),
            stationary: !motor.is_moving(),
            stopping: motor.is_stopping(),
            destination_reached: motor.position() == target_register,
        }
    }
}

impl MotionState {
    /// Derive the state for `observation`, given the previous state.
    ///
    /// Rules in priority order:
    /// 1. not energized: `Unpowered`
    /// 2. stationary: `Idle` at the target, `ReadyToMove` otherwise
    /// 3. stopping: `Stopping`
    /// 4. moving after `ReadyToMove`: `Moving`
    /// 5. otherwise unchanged
    pub fn derive(observation: MotorObservation, previous: MotionState) -> MotionState {
        if !observation.energized {
            MotionState::Unpowered
        } else if observation.stationary {
            if observation.destination_reached {
                MotionState::Idle
            } else {
                MotionState::ReadyToMove
            }
        } else if observation.stopping {
            MotionState::Stopping
        } else if previous == MotionState::ReadyToMove {
            MotionState::Moving
        } else {
            previous
        }
    }

    /// Axis is at rest (configuration events are accepted).
    #[inline]
    pub fn is_stationary(self) -> bool {
        matches!(
            self,
            MotionState::Unpowered | MotionState::Idle | MotionState::ReadyToMove
        )
    }

    /// Axis is moving or stopping.
    #[inline]
    pub fn is_in_motion(self) -> bool {
        matches!(self, MotionState::Moving | MotionState::Stopping)
    }

    /// Recommended interval between periodic ticks in this state.
    #[inline]
    pub fn poll_interval(self) -> Duration {
        if self.is_in_motion() {
            MOVING_POLL_INTERVAL
        } else {
            IDLE_POLL_INTERVAL
        }
    }

    /// State name for display.
    pub fn name(self) -> &'static str {
        match self {
            MotionState::Unpowered => "Unpowered",
            MotionState::Idle => "Idle",
            MotionState::ReadyToMove => "ReadyToMove",
            MotionState::Moving => "Moving",
            MotionState::Stopping => "Stopping",
        }
    }
}
