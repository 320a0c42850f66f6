//! Target selection inputs.

/// Which targeting rule is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TargetMode {
    /// Go to an absolute angle, turning in the selected direction.
    #[default]
    Absolute,
    /// Turn by an angle from the current position.
    Relative,
    /// Go to one entry of the division table by the shortest path.
    Division,
}

/// Direction of rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise (increasing register)
    #[default]
    Clockwise,
    /// Counter-clockwise (decreasing register)
    CounterClockwise,
}

impl Direction {
    /// Get the sign multiplier for this direction.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    /// Get the opposite direction.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}
