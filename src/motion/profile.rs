//! Motion profile calculation.
//!
//! Symmetric trapezoidal profiles in closed form: a move is described by
//! three time breakpoints `t1 <= t2 <= t3` (seconds since move start) and the
//! cumulative distances `d1 <= d2 <= d3` (steps) reached at each of them.
//! Short moves degrade to a triangular profile with no cruise phase.

use libm::sqrt;

use crate::error::{MotionError, Result};

/// Current phase of motion execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Accelerating from the start speed toward the top speed.
    Accelerating,
    /// Moving at constant top speed.
    Cruising,
    /// Decelerating back to the start speed.
    Decelerating,
    /// Motion complete.
    Complete,
}

/// Speed and travelled distance at an instant of a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileSample {
    /// Phase the instant falls into.
    pub phase: MotionPhase,
    /// Instantaneous speed in steps/s (0 once complete).
    pub speed: f64,
    /// Distance travelled since move start in steps, never above `d3`.
    pub distance: f64,
}

/// Computed motion profile for a single move.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionProfile {
    /// Speed at which the move starts and ends, steps/s.
    pub start_speed: f64,

    /// Peak speed actually reached, steps/s.
    pub top_speed: f64,

    /// Acceleration and deceleration rate, steps/s².
    pub acceleration: f64,

    /// End of the acceleration phase, seconds.
    pub t1: f64,

    /// End of the cruise phase, seconds.
    pub t2: f64,

    /// End of the move, seconds.
    pub t3: f64,

    /// Distance covered at `t1`, steps.
    pub d1: f64,

    /// Distance covered at `t2`, steps.
    pub d2: f64,

    /// Total distance of the move, steps.
    pub d3: f64,
}

impl MotionProfile {
    /// Plan a move of `distance` steps.
    ///
    /// # Arguments
    ///
    /// * `distance` - Unsigned move length in steps
    /// * `start_speed` - Speed at start and end of the move in steps/sec
    /// * `acceleration` - Acceleration and deceleration rate in steps/sec²
    /// * `top_speed` - Requested cruise speed in steps/sec
    ///
    /// # Errors
    ///
    /// Returns `MotionError::InvalidProfileRequest` if the distance is zero,
    /// the acceleration is not positive, or the top speed is below the start
    /// speed (or zero).
    pub fn plan(distance: f64, start_speed: f64, acceleration: f64, top_speed: f64) -> Result<Self> {
        let valid = distance.is_finite()
            && distance > 0.0
            && start_speed.is_finite()
            && start_speed >= 0.0
            && acceleration.is_finite()
            && acceleration > 0.0
            && top_speed.is_finite()
            && top_speed >= start_speed
            && top_speed > 0.0;
        if !valid {
            return Err(MotionError::InvalidProfileRequest {
                distance,
                start_speed,
                top_speed,
                acceleration,
            }
            .into());
        }

        // Accel and decel ramps are mirror images
        let t_acc = (top_speed - start_speed) / acceleration;
        let d_acc = (top_speed + start_speed) * t_acc / 2.0;

        if 2.0 * d_acc < distance {
            let t_cruise = (distance - 2.0 * d_acc) / top_speed;
            let t1 = t_acc;
            let t2 = t1 + t_cruise;
            Ok(Self {
                start_speed,
                top_speed,
                acceleration,
                t1,
                t2,
                t3: t2 + t_acc,
                d1: d_acc,
                d2: distance - d_acc,
                d3: distance,
            })
        } else {
            // Positive root of a·t² + 2·v0·t - distance = 0
            let b_over_2a = start_speed / acceleration;
            let t_acc = -b_over_2a + sqrt(b_over_2a * b_over_2a + distance / acceleration);
            Ok(Self {
                start_speed,
                top_speed: start_speed + t_acc * acceleration,
                acceleration,
                t1: t_acc,
                t2: t_acc,
                t3: 2.0 * t_acc,
                d1: distance / 2.0,
                d2: distance / 2.0,
                d3: distance,
            })
        }
    }

    /// True when the move never reaches a cruise phase.
    #[inline]
    pub fn is_triangular(&self) -> bool {
        self.t1 == self.t2
    }

    /// Get the phase at `t` seconds since move start.
    pub fn phase_at(&self, t: f64) -> MotionPhase {
        if t < self.t1 {
            MotionPhase::Accelerating
        } else if t < self.t2 {
            MotionPhase::Cruising
        } else if t < self.t3 {
            MotionPhase::Decelerating
        } else {
            MotionPhase::Complete
        }
    }

    /// Sample speed and travelled distance at `t` seconds since move start.
    pub fn sample(&self, t: f64) -> ProfileSample {
        let t = t.max(0.0);
        let a = self.acceleration;
        let phase = self.phase_at(t);

        let (speed, distance) = match phase {
            MotionPhase::Accelerating => (
                self.start_speed + a * t,
                self.start_speed * t + a * t * t / 2.0,
            ),
            MotionPhase::Cruising => (self.top_speed, self.d1 + self.top_speed * (t - self.t1)),
            MotionPhase::Decelerating => {
                let t_off = t - self.t2;
                (
                    self.top_speed - a * t_off,
                    self.d2 + self.top_speed * t_off - a * t_off * t_off / 2.0,
                )
            }
            MotionPhase::Complete => (0.0, self.d3),
        };

        ProfileSample {
            phase,
            speed,
            distance: distance.min(self.d3),
        }
    }

    /// Re-plan the remainder of the move as a deceleration starting at `t`.
    ///
    /// The speed sampled at `t` becomes the new top speed and the move now
    /// ends once that speed has ramped back down to the start speed.
    /// Applying it again at the same `t` leaves the profile unchanged.
    /// Returns the sample the new segment was anchored on.
    pub fn decelerate_from(&mut self, t: f64) -> ProfileSample {
        let sample = self.sample(t);
        if sample.phase == MotionPhase::Complete {
            return sample;
        }

        let t = t.max(0.0);
        let t_dec = ((sample.speed - self.start_speed) / self.acceleration).max(0.0);
        let d_dec = (sample.speed + self.start_speed) * t_dec / 2.0;

        self.t1 = self.t1.min(t);
        self.t2 = t;
        self.t3 = t + t_dec;
        self.d1 = self.d1.min(sample.distance);
        self.d2 = sample.distance;
        self.d3 = sample.distance + d_dec;
        self.top_speed = sample.speed;

        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_trapezoid_profile() {
        let profile = MotionProfile::plan(3000.0, 100.0, 500.0, 1000.0).unwrap();

        assert!(close(profile.t1, 1.8, 1e-9));
        assert!(close(profile.t2, 2.82, 1e-9));
        assert!(close(profile.t3, 4.62, 1e-9));
        assert!(close(profile.d1, 990.0, 1e-9));
        assert!(close(profile.d2, 2010.0, 1e-9));
        assert_eq!(profile.d3, 3000.0);
        assert_eq!(profile.top_speed, 1000.0);
        assert!(!profile.is_triangular());
    }

    #[test]
    fn test_triangle_profile() {
        let profile = MotionProfile::plan(1000.0, 100.0, 500.0, 1000.0).unwrap();

        assert!(close(profile.t1, 1.2283, 1e-4));
        assert_eq!(profile.t1, profile.t2);
        assert!(close(profile.t3, 2.4566, 1e-4));
        assert_eq!(profile.d1, 500.0);
        assert_eq!(profile.d2, 500.0);
        assert_eq!(profile.d3, 1000.0);
        assert!(close(profile.top_speed, 714.15, 0.01));
        assert!(profile.top_speed < 1000.0);
        assert!(profile.is_triangular());
    }

    #[test]
    fn test_start_speed_equals_top_speed() {
        let profile = MotionProfile::plan(500.0, 100.0, 500.0, 100.0).unwrap();

        assert_eq!(profile.t1, 0.0);
        assert!(close(profile.t3, 5.0, 1e-9));
        assert_eq!(profile.phase_at(0.0), MotionPhase::Cruising);
    }

    #[test]
    fn test_invalid_requests() {
        let invalid = [
            (0.0, 100.0, 500.0, 1000.0),
            (1000.0, 100.0, 0.0, 1000.0),
            (1000.0, 100.0, -5.0, 1000.0),
            (1000.0, 100.0, 500.0, 50.0),
            (1000.0, 0.0, 500.0, 0.0),
        ];

        for (distance, start, accel, top) in invalid {
            assert!(matches!(
                MotionProfile::plan(distance, start, accel, top),
                Err(Error::Motion(MotionError::InvalidProfileRequest { .. }))
            ));
        }
    }

    #[test]
    fn test_sampling_phases() {
        let profile = MotionProfile::plan(3000.0, 100.0, 500.0, 1000.0).unwrap();

        let s = profile.sample(0.9);
        assert_eq!(s.phase, MotionPhase::Accelerating);
        assert!(close(s.speed, 550.0, 1e-9));
        assert!(close(s.distance, 292.5, 1e-9));

        let s = profile.sample(2.0);
        assert_eq!(s.phase, MotionPhase::Cruising);
        assert_eq!(s.speed, 1000.0);
        assert!(close(s.distance, 1190.0, 1e-9));

        let s = profile.sample(3.72);
        assert_eq!(s.phase, MotionPhase::Decelerating);
        assert!(close(s.speed, 550.0, 1e-6));
        assert!(close(s.distance, 2707.5, 1e-6));

        let s = profile.sample(10.0);
        assert_eq!(s.phase, MotionPhase::Complete);
        assert_eq!(s.speed, 0.0);
        assert_eq!(s.distance, 3000.0);
    }

    #[test]
    fn test_sampling_is_continuous_at_breakpoints() {
        let profile = MotionProfile::plan(3000.0, 100.0, 500.0, 1000.0).unwrap();
        let eps = 1e-9;

        for t in [profile.t1, profile.t2] {
            let before = profile.sample(t - eps);
            let after = profile.sample(t);
            assert!(close(before.distance, after.distance, 1e-5));
            assert!(close(before.speed, after.speed, 1e-5));
        }

        let end = profile.sample(profile.t3 - eps);
        assert!(close(end.distance, 3000.0, 1e-5));
        assert!(close(end.speed, 100.0, 1e-5));
    }

    #[test]
    fn test_distance_is_monotonic() {
        let profile = MotionProfile::plan(1000.0, 100.0, 500.0, 1000.0).unwrap();
        let mut last = 0.0;
        let mut t = 0.0;
        while t < profile.t3 + 0.1 {
            let d = profile.sample(t).distance;
            assert!(d >= last);
            assert!(d <= profile.d3);
            last = d;
            t += 0.01;
        }
    }

    #[test]
    fn test_stop_during_cruise() {
        let mut profile = MotionProfile::plan(3000.0, 100.0, 500.0, 1000.0).unwrap();
        let anchor = profile.decelerate_from(2.0);

        assert!(close(anchor.distance, 1190.0, 1e-9));
        assert!(close(profile.t1, 1.8, 1e-9));
        assert_eq!(profile.t2, 2.0);
        assert!(close(profile.t3, 3.8, 1e-9));
        assert!(close(profile.d2, 1190.0, 1e-9));
        assert!(close(profile.d3, 2180.0, 1e-9));
        assert_eq!(profile.top_speed, 1000.0);
    }

    #[test]
    fn test_stop_during_acceleration() {
        let mut profile = MotionProfile::plan(3000.0, 100.0, 500.0, 1000.0).unwrap();
        profile.decelerate_from(0.9);

        assert_eq!(profile.t1, 0.9);
        assert_eq!(profile.t2, 0.9);
        assert!(close(profile.t3, 1.8, 1e-9));
        assert!(close(profile.d3, 585.0, 1e-9));
        assert!(profile.d1 <= profile.d2 && profile.d2 <= profile.d3);
        assert!(close(profile.top_speed, 550.0, 1e-9));

        // Decelerates back to the start speed
        let s = profile.sample(1.8 - 1e-9);
        assert!(close(s.speed, 100.0, 1e-5));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut profile = MotionProfile::plan(3000.0, 100.0, 500.0, 1000.0).unwrap();
        profile.decelerate_from(3.0);
        let once = profile.clone();
        profile.decelerate_from(3.0);

        assert!(close(once.t3, profile.t3, 1e-12));
        assert!(close(once.d3, profile.d3, 1e-9));
        assert!(close(once.top_speed, profile.top_speed, 1e-9));
    }

    #[test]
    fn test_stop_after_completion_is_noop() {
        let mut profile = MotionProfile::plan(3000.0, 100.0, 500.0, 1000.0).unwrap();
        let original = profile.clone();
        let sample = profile.decelerate_from(5.0);

        assert_eq!(sample.phase, MotionPhase::Complete);
        assert_eq!(profile, original);
    }
}
