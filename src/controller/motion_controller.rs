//! Event-driven motion controller.

use core::time::Duration;

use crate::config::units::{Degrees, DegreesPerSec};
use crate::config::{validate_config, MechanicalConstraints, SystemConfig};
use crate::error::{ControllerError, Result};
use crate::motor::{CurrentSetting, Motor};

use super::anchor::PositionAnchor;
use super::division::DivisionTable;
use super::state::{MotionState, MotorObservation};
use super::target::{Direction, TargetMode};

#[cfg(feature = "defmt")]
use defmt::{debug, info};

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {{}};
}

/// States in which targeting parameters may be changed.
const SETUP_STATES: [MotionState; 3] = [
    MotionState::Unpowered,
    MotionState::Idle,
    MotionState::ReadyToMove,
];

/// States in which a move may be started or stopped.
const START_STOP_STATES: [MotionState; 2] = [MotionState::ReadyToMove, MotionState::Moving];

/// Resolves angle-space commands into register targets and drives a [`Motor`].
///
/// Every event is checked against the states it is allowed in before any
/// field is touched. The motion state is re-derived from the motor after
/// every event and every [`periodic`](Self::periodic) tick.
///
/// # Example
///
/// ```
/// use dividing_head::clock::MockClock;
/// use dividing_head::controller::{MotionController, MotionState};
/// use dividing_head::motor::SimulatedMotor;
/// use dividing_head::parse_config;
///
/// let config = parse_config(r#"
///     [Mechanical]
///     motor_revs_per_spindle_rev = 90.0
///     motor_fullsteps_per_rev = 200
///     motor_microsteps_per_fullstep = 16
///
///     [Motor]
///     max_current = 1000
///     start_speed = 0.5
///     min_speed = 1.0
///     max_speed = 30.0
///     default_speed = 10.0
///     acceleration = 20.0
/// "#)?;
///
/// let clock = MockClock::new();
/// let mut controller = MotionController::new(SimulatedMotor::new(&clock), &config)?;
/// controller.power()?;
/// assert_eq!(controller.motion_state(), MotionState::Idle);
/// # Ok::<(), dividing_head::Error>(())
/// ```
pub struct MotionController<M: Motor> {
    motor: M,
    constraints: MechanicalConstraints,
    current: CurrentSetting,
    motion_state: MotionState,
    target_mode: TargetMode,
    target_register: i64,
    start_register: i64,
    abs_target: Degrees,
    rel_target: Degrees,
    divisions: DivisionTable,
    anchor: PositionAnchor,
    direction: Direction,
    speed: DegreesPerSec,
}

impl<M: Motor> MotionController<M> {
    /// Set up `motor` from `config` and take ownership of it.
    ///
    /// Programs the driver, acceleration and start speed, then anchors
    /// angle 0 at the motor's current register.
    pub fn new(mut motor: M, config: &SystemConfig) -> Result<Self> {
        validate_config(config)?;
        let constraints = MechanicalConstraints::from_config(config);

        let current = motor.setup_driver(constraints.microsteps, constraints.max_current)?;
        motor.set_acceleration(constraints.acceleration_steps_per_sec2)?;
        motor.set_start_speed(constraints.start_speed_steps_per_sec)?;

        let position = motor.position();
        let anchor = PositionAnchor::new(Degrees(0.0), position, constraints.steps_per_revolution);
        let speed = constraints.default_speed;

        let mut controller = Self {
            motor,
            constraints,
            current,
            motion_state: MotionState::Unpowered,
            target_mode: TargetMode::Absolute,
            target_register: position,
            start_register: position,
            abs_target: Degrees(0.0),
            rel_target: Degrees(0.0),
            divisions: DivisionTable::default(),
            anchor,
            direction: Direction::Clockwise,
            speed,
        };
        controller.target_register = controller.resolve_target(
            controller.target_mode,
            controller.mode_angle(controller.target_mode),
            controller.direction,
            &controller.anchor,
        )?;
        controller.evaluate_state();

        info!(
            "Controller ready: {} steps/rev, state {}",
            controller.constraints.steps_per_revolution,
            controller.motion_state
        );

        Ok(controller)
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    /// Advance the motor and re-derive the state.
    ///
    /// A failed motor poll is returned after the state has been re-derived
    /// from the motor's last known flags.
    pub fn periodic(&mut self) -> Result<()> {
        let polled = self.motor.update_state();
        self.evaluate_state();
        polled
    }

    /// Energize when unpowered, de-energize otherwise. Allowed in any state.
    pub fn power(&mut self) -> Result<()> {
        if self.motion_state == MotionState::Unpowered {
            self.motor.set_power_on()?;
            info!("Power on");
        } else {
            self.motor.set_power_off()?;
            info!("Power off");
        }
        self.evaluate_state();
        Ok(())
    }

    /// Start a move when ready, request a stop while moving.
    pub fn start_stop(&mut self) -> Result<()> {
        self.ensure_state("start_stop", &START_STOP_STATES)?;

        if self.motion_state == MotionState::ReadyToMove {
            let start = self.motor.position();
            let speed = self.constraints.velocity_to_steps(self.speed);
            self.motor.start_move_to_position(self.target_register, speed)?;
            self.start_register = start;
            info!("Move {} -> {}", start, self.target_register);
        } else {
            self.motor.stop()?;
            info!("Stop requested");
        }

        self.evaluate_state();
        Ok(())
    }

    /// Assert that the axis is at `angle` now.
    pub fn set_position(&mut self, angle: Degrees) -> Result<()> {
        self.ensure_state("position_set", &SETUP_STATES)?;
        if !angle.0.is_finite() {
            return Err(ControllerError::AngleOutOfRange(angle.0).into());
        }

        let register = self.motor.position();
        let anchor = PositionAnchor::new(angle, register, self.constraints.steps_per_revolution);
        let target = self.resolve_target(
            self.target_mode,
            self.mode_angle(self.target_mode),
            self.direction,
            &anchor,
        )?;

        self.anchor = anchor;
        self.target_register = target;
        debug!("Anchored {} deg at {}", angle.0, register);

        self.evaluate_state();
        Ok(())
    }

    /// Select the authoritative targeting rule.
    pub fn set_target_mode(&mut self, mode: TargetMode) -> Result<()> {
        self.ensure_state("target_mode_set", &SETUP_STATES)?;

        let target = self.resolve_target(mode, self.mode_angle(mode), self.direction, &self.anchor)?;
        self.target_mode = mode;
        self.target_register = target;
        self.evaluate_state();
        Ok(())
    }

    /// Set the parameter of the active targeting rule.
    ///
    /// Degrees in Absolute and Relative mode; a whole division index in
    /// Division mode. Nothing changes if the value does not resolve to a
    /// register.
    pub fn set_target(&mut self, value: f64) -> Result<()> {
        self.ensure_state("target_set", &SETUP_STATES)?;

        let mode = self.target_mode;
        let angle = match mode {
            TargetMode::Absolute | TargetMode::Relative => Degrees(value),
            TargetMode::Division => self.divisions.entries()[self.divisions.checked_index(value)?],
        };
        let target = self.resolve_target(mode, angle, self.direction, &self.anchor)?;

        match mode {
            TargetMode::Absolute => self.abs_target = angle,
            TargetMode::Relative => self.rel_target = angle,
            TargetMode::Division => self.divisions.select(value)?,
        }
        self.target_register = target;

        self.evaluate_state();
        Ok(())
    }

    /// Replace the division table and select its first entry.
    pub fn set_division(&mut self, num_divs: usize, start: Degrees, extent: Degrees) -> Result<()> {
        self.ensure_state("division_set", &SETUP_STATES)?;

        let divisions = DivisionTable::new(num_divs, start, extent)?;
        let angle = match self.target_mode {
            TargetMode::Division => divisions.selected_angle(),
            mode => self.mode_angle(mode),
        };
        let target = self.resolve_target(self.target_mode, angle, self.direction, &self.anchor)?;

        self.divisions = divisions;
        self.target_register = target;
        self.evaluate_state();
        Ok(())
    }

    /// Select the turning direction for Absolute and Relative targets.
    pub fn set_direction(&mut self, direction: Direction) -> Result<()> {
        self.ensure_state("direction_set", &SETUP_STATES)?;

        let target = self.resolve_target(
            self.target_mode,
            self.mode_angle(self.target_mode),
            direction,
            &self.anchor,
        )?;
        self.direction = direction;
        self.target_register = target;
        self.evaluate_state();
        Ok(())
    }

    /// Set the cruise speed, clamped to the configured range.
    pub fn set_speed(&mut self, speed: DegreesPerSec) -> Result<()> {
        self.ensure_state("speed_set", &SETUP_STATES)?;

        self.speed = self.constraints.clamp_speed(speed);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Status
    // ---------------------------------------------------------------------

    /// Active targeting rule.
    #[inline]
    pub fn target_mode(&self) -> TargetMode {
        self.target_mode
    }

    /// Absolute target angle.
    #[inline]
    pub fn abs_target(&self) -> Degrees {
        self.abs_target
    }

    /// Angle of the target register and the relative target.
    pub fn rel_target(&self) -> (Degrees, Degrees) {
        (self.register_angle(self.target_register), self.rel_target)
    }

    /// Angle of the target register and the selected division index.
    pub fn div_target(&self) -> (Degrees, usize) {
        (self.register_angle(self.target_register), self.divisions.selected())
    }

    /// Division table parameters `(num_divs, start, extent)`.
    #[inline]
    pub fn div_parameters(&self) -> (usize, Degrees, Degrees) {
        self.divisions.parameters()
    }

    /// Division angles in Division mode, empty otherwise.
    pub fn divs(&self) -> &[Degrees] {
        if self.target_mode == TargetMode::Division {
            self.divisions.entries()
        } else {
            &[]
        }
    }

    /// Current spindle angle in `[0, 360)`.
    pub fn position_angle(&self) -> Degrees {
        self.register_angle(self.motor.position())
    }

    /// Selected turning direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Selected cruise speed.
    #[inline]
    pub fn speed(&self) -> DegreesPerSec {
        self.speed
    }

    /// Current motion state.
    #[inline]
    pub fn motion_state(&self) -> MotionState {
        self.motion_state
    }

    /// Whether a move is under way and how far it has got, in percent.
    ///
    /// Reports `(false, 0)` outside Moving and Stopping.
    pub fn progress(&self) -> (bool, u8) {
        if !self.motion_state.is_in_motion() {
            return (false, 0);
        }

        let total = self.target_register.abs_diff(self.start_register) as u128;
        if total == 0 {
            return (true, 100);
        }
        let moved = self.motor.position().abs_diff(self.start_register) as u128;
        (true, (100 * moved / total).min(100) as u8)
    }

    /// Recommended interval until the next [`periodic`](Self::periodic) call.
    #[inline]
    pub fn poll_interval(&self) -> Duration {
        self.motion_state.poll_interval()
    }

    /// Register the axis is commanded to.
    #[inline]
    pub fn target_register(&self) -> i64 {
        self.target_register
    }

    /// Register the current move started from.
    #[inline]
    pub fn start_register(&self) -> i64 {
        self.start_register
    }

    /// Current position anchor.
    #[inline]
    pub fn anchor(&self) -> &PositionAnchor {
        &self.anchor
    }

    /// Derived mechanical constraints.
    #[inline]
    pub fn constraints(&self) -> &MechanicalConstraints {
        &self.constraints
    }

    /// Run current applied by the driver.
    #[inline]
    pub fn current_setting(&self) -> &CurrentSetting {
        &self.current
    }

    /// Get the motor.
    #[inline]
    pub fn motor(&self) -> &M {
        &self.motor
    }

    /// Get the motor mutably.
    ///
    /// Commands issued directly bypass the event checks; the state catches
    /// up on the next [`periodic`](Self::periodic) call.
    #[inline]
    pub fn motor_mut(&mut self) -> &mut M {
        &mut self.motor
    }

    /// Release the motor.
    pub fn into_motor(self) -> M {
        self.motor
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn ensure_state(&self, event: &'static str, allowed: &[MotionState]) -> Result<()> {
        if allowed.contains(&self.motion_state) {
            Ok(())
        } else {
            Err(ControllerError::InvalidStateTransition {
                event,
                state: self.motion_state,
            }
            .into())
        }
    }

    fn register_angle(&self, register: i64) -> Degrees {
        self.anchor.reg_to_angle(register).normalized()
    }

    /// Parameter angle of the targeting rule `mode`.
    fn mode_angle(&self, mode: TargetMode) -> Degrees {
        match mode {
            TargetMode::Absolute => self.abs_target,
            TargetMode::Relative => self.rel_target,
            TargetMode::Division => self.divisions.selected_angle(),
        }
    }

    /// Register the rule `mode` resolves `angle` to from the current position.
    fn resolve_target(
        &self,
        mode: TargetMode,
        angle: Degrees,
        direction: Direction,
        anchor: &PositionAnchor,
    ) -> Result<i64> {
        let position = self.motor.position();

        match mode {
            TargetMode::Absolute => Ok(anchor.candidates(angle, position)?.toward(direction)),
            TargetMode::Relative => anchor
                .relative_steps(angle)?
                .checked_mul(direction.sign())
                .and_then(|steps| position.checked_add(steps))
                .ok_or_else(|| ControllerError::AngleOutOfRange(angle.0).into()),
            TargetMode::Division => Ok(anchor.candidates(angle, position)?.nearest(position)),
        }
    }

    fn evaluate_state(&mut self) {
        let previous = self.motion_state;
        let mut next = MotionState::derive(
            MotorObservation::of(&self.motor, self.target_register),
            previous,
        );

        if previous.is_in_motion() && next.is_stationary() && self.target_mode == TargetMode::Relative {
            self.rel_target = Degrees(0.0);
            // A zero relative target resolves to the current register
            self.target_register = self.motor.position();
            next = MotionState::derive(MotorObservation::of(&self.motor, self.target_register), next);
            debug!("Relative target consumed");
        }

        if next != previous {
            info!("State {} -> {}", previous.name(), next.name());
        }
        self.motion_state = next;
    }
}
