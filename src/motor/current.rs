//! Run-current quantization for register-based drivers.
//!
//! The driver expresses run current as a 5-bit code scaled by one of three
//! global ranges. Representable currents, in units of 40 mA:
//!
//! | Range | Units            | Code        |
//! |-------|------------------|-------------|
//! | x1    | 0, 1, ..., 31    | units       |
//! | x2    | 32, 34, ..., 62  | units / 2   |
//! | x4    | 64, 68, ..., 124 | units / 4   |

use crate::config::units::Milliamps;

/// Current resolution of the run-current code, mA.
pub const CURRENT_STEP_MA: u32 = 40;

/// Largest representable run current, mA.
pub const MAX_CURRENT_MA: u32 = 124 * CURRENT_STEP_MA;

/// Global current range applied on top of the run-current code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurrentRange {
    /// Code counts 40 mA units
    X1,
    /// Code counts 80 mA units
    X2,
    /// Code counts 160 mA units
    X4,
}

impl CurrentRange {
    /// Multiplier applied to the run-current code.
    pub const fn multiplier(self) -> u32 {
        match self {
            CurrentRange::X1 => 1,
            CurrentRange::X2 => 2,
            CurrentRange::X4 => 4,
        }
    }

    /// GLOBALSCALER register value (0 selects full scale).
    pub const fn global_scaler(self) -> u8 {
        match self {
            CurrentRange::X1 => 64,
            CurrentRange::X2 => 128,
            CurrentRange::X4 => 0,
        }
    }
}

/// Outcome of a current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentSetting {
    /// Current asked for.
    pub requested: Milliamps,
    /// Current actually programmed.
    pub effective: Milliamps,
    /// 5-bit run-current code (0..=31).
    pub run_current: u8,
    /// Global range the code is scaled by.
    pub range: CurrentRange,
}

impl CurrentSetting {
    /// Setting for a backend without a current limit.
    pub fn exact(current: Milliamps) -> Self {
        Self {
            requested: current,
            effective: current,
            run_current: 0,
            range: CurrentRange::X1,
        }
    }

    /// Whether the request could not be honoured exactly.
    pub fn is_reduced(&self) -> bool {
        self.effective != self.requested
    }
}

/// Select the largest representable current not exceeding `requested`.
///
/// Requests above [`MAX_CURRENT_MA`] are clamped to it.
pub fn quantize_current(requested: Milliamps) -> CurrentSetting {
    let units = requested.0 / CURRENT_STEP_MA;

    let (units, range) = if units >= 64 {
        (units.min(124) & !3, CurrentRange::X4)
    } else if units >= 32 {
        (units & !1, CurrentRange::X2)
    } else {
        (units, CurrentRange::X1)
    };

    CurrentSetting {
        requested,
        effective: Milliamps(units * CURRENT_STEP_MA),
        run_current: (units / range.multiplier()) as u8,
        range,
    }
}
