//! Motion execution - tracking a planned move against elapsed time.

use super::profile::{MotionPhase, MotionProfile};

/// Runtime state of a move in progress.
///
/// Owns the profile for the lifetime of the move and converts sampled
/// distances into register positions.
#[derive(Debug, Clone)]
pub struct MotionExecutor {
    /// The profile being executed (re-planned in place on stop).
    profile: MotionProfile,

    /// Clock reading at move start, microseconds.
    start_us: u64,

    /// Register value at move start.
    start_position: i64,

    /// Register value the move heads for.
    target_position: i64,

    /// Stop requested but not yet folded into the profile.
    stop_pending: bool,

    /// A stop has been requested for this move.
    stopping: bool,

    /// Phase at the last sample.
    phase: MotionPhase,

    /// Speed at the last sample, steps/s.
    speed: f64,

    /// Distance travelled at the last sample, steps.
    moved: f64,
}

impl MotionExecutor {
    /// Create a new executor for a motion profile.
    pub fn new(profile: MotionProfile, start_us: u64, start_position: i64, target_position: i64) -> Self {
        let speed = profile.start_speed;
        Self {
            profile,
            start_us,
            start_position,
            target_position,
            stop_pending: false,
            stopping: false,
            phase: MotionPhase::Accelerating,
            speed,
            moved: 0.0,
        }
    }

    /// Check if motion is complete.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.phase == MotionPhase::Complete
    }

    /// Check if a stop has been requested for this move.
    #[inline]
    pub fn is_stopping(&self) -> bool {
        self.stopping
    }

    /// Check if a stop request is waiting to be applied.
    #[inline]
    pub fn is_stop_pending(&self) -> bool {
        self.stop_pending
    }

    /// Clock reading at move start.
    #[inline]
    pub fn start_us(&self) -> u64 {
        self.start_us
    }

    /// Get the current phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Speed at the last sample, steps/s.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Distance travelled at the last sample, steps.
    #[inline]
    pub fn moved_distance(&self) -> f64 {
        self.moved
    }

    /// Distance left until the (possibly re-planned) end of the move.
    #[inline]
    pub fn remaining_distance(&self) -> f64 {
        (self.profile.d3 - self.moved).max(0.0)
    }

    /// Get the motion profile.
    #[inline]
    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Register position corresponding to the last sample.
    ///
    /// Truncates toward zero, like the step counter of a real driver that
    /// has not yet issued the next step.
    pub fn position(&self) -> i64 {
        if self.target_position > self.start_position {
            (self.start_position as f64 + self.moved) as i64
        } else {
            (self.start_position as f64 - self.moved) as i64
        }
    }

    /// Request a controlled stop. Applied on the next [`advance`](Self::advance).
    pub fn request_stop(&mut self) {
        if self.is_complete() {
            return;
        }
        self.stop_pending = true;
        self.stopping = true;
    }

    /// Sample the profile at `t` seconds since move start.
    ///
    /// A pending stop re-plans the profile into a deceleration from the
    /// sampled speed. Returns the new register position.
    pub fn advance(&mut self, t: f64) -> i64 {
        let sample = self.profile.sample(t);
        self.phase = sample.phase;
        self.speed = sample.speed;
        self.moved = sample.distance;

        if !self.is_complete() && self.stop_pending {
            self.profile.decelerate_from(t);
            self.stop_pending = false;
            // Already at start speed: the re-planned move ends right here
            self.phase = self.profile.phase_at(t.max(0.0));
        }

        self.position()
    }

    /// End the move immediately at the position sampled at `t`.
    ///
    /// No deceleration ramp is applied.
    pub fn halt(&mut self, t: f64) -> i64 {
        if !self.is_complete() {
            self.moved = self.profile.sample(t).distance;
        }
        self.speed = 0.0;
        self.phase = MotionPhase::Complete;
        self.stop_pending = false;
        self.position()
    }
}
