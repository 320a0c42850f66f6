//! Simulated motor driven by the kinematic profile engine.
//!
//! Position advances only when [`update_state`](Motor::update_state) samples
//! the active profile against the injected [`Clock`].

use crate::clock::Clock;
use crate::error::{MotorError, Result};
use crate::motion::{MotionExecutor, MotionProfile};

use super::Motor;

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

/// Reference [`Motor`] implementation.
///
/// Start speed and acceleration default to zero, so both must be set before
/// the first move can be planned.
#[derive(Debug)]
pub struct SimulatedMotor<C: Clock> {
    clock: C,
    energized: bool,
    position: i64,
    target_position: i64,
    start_speed: f64,
    acceleration: f64,
    executor: Option<MotionExecutor>,
}

impl<C: Clock> SimulatedMotor<C> {
    /// Create a de-energized motor at register 0.
    pub fn new(clock: C) -> Self {
        Self::with_position(clock, 0)
    }

    /// Create a de-energized motor at the given register value.
    pub fn with_position(clock: C, position: i64) -> Self {
        Self {
            clock,
            energized: false,
            position,
            target_position: position,
            start_speed: 0.0,
            acceleration: 0.0,
            executor: None,
        }
    }

    /// Get the clock driving the simulation.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Runtime state of the move in progress, if any.
    #[inline]
    pub fn executor(&self) -> Option<&MotionExecutor> {
        self.executor.as_ref()
    }

    /// Speed at the last update, steps/s.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.executor.as_ref().map(|e| e.speed()).unwrap_or(0.0)
    }

    /// Configured start speed, steps/s.
    #[inline]
    pub fn start_speed(&self) -> f64 {
        self.start_speed
    }

    /// Configured acceleration, steps/s².
    #[inline]
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }
}

impl<C: Clock> Motor for SimulatedMotor<C> {
    fn set_power_on(&mut self) -> Result<()> {
        self.energized = true;
        Ok(())
    }

    fn set_power_off(&mut self) -> Result<()> {
        self.energized = false;

        if let Some(mut executor) = self.executor.take() {
            let t = self.clock.elapsed_secs(executor.start_us());
            self.position = executor.halt(t);
            info!("Power cut during move, halted at {}", self.position);
        }

        Ok(())
    }

    fn is_energized(&self) -> bool {
        self.energized
    }

    fn is_moving(&self) -> bool {
        self.executor.is_some()
    }

    fn is_stopping(&self) -> bool {
        self.executor.as_ref().map(|e| e.is_stopping()).unwrap_or(false)
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn target_position(&self) -> i64 {
        self.target_position
    }

    fn set_acceleration(&mut self, acceleration: f64) -> Result<()> {
        self.acceleration = acceleration;
        Ok(())
    }

    fn set_start_speed(&mut self, start_speed: f64) -> Result<()> {
        self.start_speed = start_speed;
        Ok(())
    }

    fn start_move_to_position(&mut self, target: i64, top_speed: f64) -> Result<()> {
        if !self.energized {
            return Err(MotorError::NotEnergized.into());
        }
        if self.executor.is_some() {
            return Err(MotorError::MoveInProgress.into());
        }
        if target == self.position {
            return Err(MotorError::NoOpMove { position: target }.into());
        }
        if top_speed < self.start_speed {
            return Err(MotorError::SpeedTooLow {
                requested: top_speed,
                start_speed: self.start_speed,
            }
            .into());
        }

        let distance = target.abs_diff(self.position) as f64;
        let profile = MotionProfile::plan(distance, self.start_speed, self.acceleration, top_speed)?;

        debug!(
            "Planned {} steps: t1={} t2={} t3={}",
            distance, profile.t1, profile.t2, profile.t3
        );

        self.executor = Some(MotionExecutor::new(
            profile,
            self.clock.now_us(),
            self.position,
            target,
        ));
        self.target_position = target;

        info!("Move started: {} -> {} at {} steps/s", self.position, target, top_speed);

        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(executor) = self.executor.as_mut() {
            executor.request_stop();
            info!("Stop requested at {}", self.position);
        }
        self.update_state()
    }

    fn update_state(&mut self) -> Result<()> {
        if let Some(executor) = self.executor.as_mut() {
            let replan = executor.is_stop_pending();
            let t = self.clock.elapsed_secs(executor.start_us());
            self.position = executor.advance(t);

            if replan {
                debug!("Stop re-planned: {} steps remaining", executor.remaining_distance());
            }

            if executor.is_complete() {
                debug!("Move complete at {}", self.position);
                self.executor = None;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::error::{Error, MotionError};

    fn powered(clock: &MockClock) -> SimulatedMotor<&MockClock> {
        let mut motor = SimulatedMotor::new(clock);
        motor.set_start_speed(100.0).unwrap();
        motor.set_acceleration(500.0).unwrap();
        motor.set_power_on().unwrap();
        motor
    }

    #[test]
    fn test_move_runs_to_completion() {
        let clock = MockClock::new();
        let mut motor = powered(&clock);

        motor.start_move_to_position(3000, 1000.0).unwrap();
        assert!(motor.is_moving());
        assert_eq!(motor.target_position(), 3000);

        clock.advance_secs(2.0);
        motor.update_state().unwrap();
        assert_eq!(motor.position(), 1190);
        assert!((motor.speed() - 1000.0).abs() < 1e-9);

        clock.advance_secs(3.0);
        motor.update_state().unwrap();
        assert_eq!(motor.position(), 3000);
        assert!(!motor.is_moving());
        assert!(motor.executor().is_none());
    }

    #[test]
    fn test_move_backwards() {
        let clock = MockClock::new();
        let mut motor = SimulatedMotor::with_position(&clock, 500);
        motor.set_start_speed(100.0).unwrap();
        motor.set_acceleration(500.0).unwrap();
        motor.set_power_on().unwrap();

        motor.start_move_to_position(-500, 1000.0).unwrap();
        clock.advance_secs(10.0);
        motor.update_state().unwrap();
        assert_eq!(motor.position(), -500);
    }

    #[test]
    fn test_move_preconditions_in_order() {
        let clock = MockClock::new();
        let mut motor = SimulatedMotor::new(&clock);
        motor.set_start_speed(100.0).unwrap();
        motor.set_acceleration(500.0).unwrap();

        // Not energized wins over everything else
        assert_eq!(
            motor.start_move_to_position(0, 1.0),
            Err(Error::Motor(MotorError::NotEnergized))
        );

        motor.set_power_on().unwrap();
        assert_eq!(
            motor.start_move_to_position(0, 1.0),
            Err(Error::Motor(MotorError::NoOpMove { position: 0 }))
        );
        assert!(matches!(
            motor.start_move_to_position(10, 50.0),
            Err(Error::Motor(MotorError::SpeedTooLow { .. }))
        ));

        motor.start_move_to_position(1000, 200.0).unwrap();
        assert_eq!(
            motor.start_move_to_position(0, 1.0),
            Err(Error::Motor(MotorError::MoveInProgress))
        );
    }

    #[test]
    fn test_unplannable_move_is_rejected() {
        let clock = MockClock::new();
        let mut motor = SimulatedMotor::new(&clock);
        motor.set_power_on().unwrap();

        assert!(matches!(
            motor.start_move_to_position(10, 50.0),
            Err(Error::Motion(MotionError::InvalidProfileRequest { .. }))
        ));
        assert!(!motor.is_moving());
        assert_eq!(motor.target_position(), 0);
    }

    #[test]
    fn test_stop_decelerates_from_current_speed() {
        let clock = MockClock::new();
        let mut motor = powered(&clock);
        motor.start_move_to_position(3000, 1000.0).unwrap();

        clock.advance_secs(2.0);
        motor.stop().unwrap();
        assert!(motor.is_moving());
        assert!(motor.is_stopping());
        assert_eq!(motor.position(), 1190);

        // Still decelerating a second later
        clock.advance_secs(1.0);
        motor.update_state().unwrap();
        assert!(motor.is_stopping());
        assert!(motor.speed() < 1000.0);

        clock.advance_secs(1.0);
        motor.update_state().unwrap();
        assert!(!motor.is_moving());
        assert!(!motor.is_stopping());
        assert_eq!(motor.position(), 2180);
        // Target is left as commanded
        assert_eq!(motor.target_position(), 3000);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let clock = MockClock::new();
        let mut motor = powered(&clock);

        motor.stop().unwrap();
        assert!(!motor.is_moving());
        assert!(!motor.is_stopping());
        assert_eq!(motor.position(), 0);
    }

    #[test]
    fn test_power_off_halts_immediately() {
        let clock = MockClock::new();
        let mut motor = powered(&clock);
        motor.start_move_to_position(3000, 1000.0).unwrap();

        clock.advance_secs(2.0);
        motor.set_power_off().unwrap();
        assert!(!motor.is_energized());
        assert!(!motor.is_moving());
        assert_eq!(motor.position(), 1190);
        assert_eq!(motor.speed(), 0.0);

        clock.advance_secs(5.0);
        motor.update_state().unwrap();
        assert_eq!(motor.position(), 1190);
    }

    #[test]
    fn test_default_setup_driver_accepts_request() {
        use crate::config::units::{Microsteps, Milliamps};

        let clock = MockClock::new();
        let mut motor = SimulatedMotor::new(&clock);
        let setting = motor
            .setup_driver(Microsteps::SIXTEENTH, Milliamps(1700))
            .unwrap();
        assert_eq!(setting.effective, Milliamps(1700));
        assert!(!setting.is_reduced());
    }
}
