//! Mapping between angle space and register space.

use crate::config::units::Degrees;
use crate::error::{ControllerError, Result};

use super::target::Direction;

/// Pair of registers congruent to a target angle that bracket a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCandidates {
    /// Smallest congruent register at or above the position.
    pub cw: i64,
    /// Largest congruent register at or below the position.
    pub ccw: i64,
}

impl TargetCandidates {
    /// Candidate reached by turning in `direction`.
    #[inline]
    pub fn toward(self, direction: Direction) -> i64 {
        match direction {
            Direction::Clockwise => self.cw,
            Direction::CounterClockwise => self.ccw,
        }
    }

    /// Candidate closest to `position`; equidistant resolves clockwise.
    #[inline]
    pub fn nearest(self, position: i64) -> i64 {
        if self.cw.abs_diff(position) <= self.ccw.abs_diff(position) {
            self.cw
        } else {
            self.ccw
        }
    }
}

/// Angle asserted at a known register value.
///
/// Registers never wrap; angles are interpreted modulo 360 only when
/// candidates are resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionAnchor {
    angle: Degrees,
    register: i64,
    steps_per_revolution: i64,
}

impl PositionAnchor {
    /// Anchor `angle` at `register`.
    pub fn new(angle: Degrees, register: i64, steps_per_revolution: i64) -> Self {
        Self {
            angle,
            register,
            steps_per_revolution,
        }
    }

    /// Anchored angle.
    #[inline]
    pub fn angle(&self) -> Degrees {
        self.angle
    }

    /// Anchored register value.
    #[inline]
    pub fn register(&self) -> i64 {
        self.register
    }

    /// Register value of `angle`, rounded to the nearest step.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::AngleOutOfRange`] if the register does not
    /// fit in an `i64`.
    pub fn angle_to_reg(&self, angle: Degrees) -> Result<i64> {
        self.relative_steps(angle - self.angle)?
            .checked_add(self.register)
            .ok_or_else(|| ControllerError::AngleOutOfRange(angle.0).into())
    }

    /// Angle of `register`, not wrapped.
    pub fn reg_to_angle(&self, register: i64) -> Degrees {
        let steps = (register - self.register) as f64;
        Degrees(steps * 360.0 / self.steps_per_revolution as f64) + self.angle
    }

    /// Steps in an angular distance, rounded to the nearest step.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::AngleOutOfRange`] for a non-finite angle or
    /// a step count outside the `i64` range.
    pub fn relative_steps(&self, angle: Degrees) -> Result<i64> {
        let steps = libm::round(angle.0 * self.steps_per_revolution as f64 / 360.0);
        // NaN fails the range check too
        if (i64::MIN as f64..i64::MAX as f64).contains(&steps) {
            Ok(steps as i64)
        } else {
            Err(ControllerError::AngleOutOfRange(angle.0).into())
        }
    }

    /// Registers congruent to `angle` on either side of `position`.
    pub fn candidates(&self, angle: Degrees, position: i64) -> Result<TargetCandidates> {
        let nominal = self.angle_to_reg(angle)?;
        let spr = self.steps_per_revolution;
        let out_of_range = || ControllerError::AngleOutOfRange(angle.0);

        let ahead = nominal.checked_sub(position).ok_or_else(out_of_range)?.rem_euclid(spr);
        let behind = position.checked_sub(nominal).ok_or_else(out_of_range)?.rem_euclid(spr);

        Ok(TargetCandidates {
            cw: position.checked_add(ahead).ok_or_else(out_of_range)?,
            ccw: position.checked_sub(behind).ok_or_else(out_of_range)?,
        })
    }
}
