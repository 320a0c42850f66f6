//! Register definitions for the SPI stepper driver.
//!
//! Register addresses and bit fields of a TMC5160-class driver with an
//! integrated ramp generator. Every access is a 40-bit datagram: one address
//! byte followed by a 32-bit big-endian payload.

// =============================================================================
// Datagram
// =============================================================================

/// Datagram length in bytes.
pub const DATAGRAM_LEN: usize = 5;

/// Set in the address byte for a write access.
pub const WRITE_FLAG: u8 = 0x80;

// =============================================================================
// General Configuration
// =============================================================================

/// Global configuration flags
pub const GCONF: u8 = 0x00;

/// Global status flags (write 1 to clear)
pub const GSTAT: u8 = 0x01;

/// Clears reset, drv_err and uv_cp in GSTAT
pub const GSTAT_CLEAR_ALL: u32 = 0x07;

/// Global motor current scaler (0 selects full scale)
pub const GLOBALSCALER: u8 = 0x0B;

// =============================================================================
// Velocity Dependent Driver Control
// =============================================================================

/// Hold current, run current and hold delay
pub const IHOLD_IRUN: u8 = 0x10;

/// IHOLD field offset
pub const IHOLD_SHIFT: u32 = 0;

/// IRUN field offset
pub const IRUN_SHIFT: u32 = 8;

/// IHOLDDELAY field offset
pub const IHOLDDELAY_SHIFT: u32 = 16;

/// Power-down delay steps between run and hold current
pub const IHOLDDELAY: u32 = 6;

// =============================================================================
// Ramp Generator
// =============================================================================

/// Ramp mode (0 = positioning)
pub const RAMPMODE: u8 = 0x20;

/// Positioning mode using all ramp parameters
pub const RAMPMODE_POSITION: u32 = 0;

/// Actual motor position (signed 32-bit)
pub const XACTUAL: u8 = 0x21;

/// Start velocity
pub const VSTART: u8 = 0x23;

/// First acceleration between VSTART and V1
pub const A1: u8 = 0x24;

/// First acceleration / deceleration phase threshold (0 disables A1/D1)
pub const V1: u8 = 0x25;

/// Second acceleration between V1 and VMAX
pub const AMAX: u8 = 0x26;

/// Motion ramp target velocity
pub const VMAX: u8 = 0x27;

/// Deceleration between VMAX and V1
pub const DMAX: u8 = 0x28;

/// Deceleration between V1 and VSTOP
pub const D1: u8 = 0x2A;

/// Motor stop velocity
pub const VSTOP: u8 = 0x2B;

/// Target position for ramp mode (signed 32-bit)
pub const XTARGET: u8 = 0x2D;

/// Ramp and reference switch status
pub const RAMP_STAT: u8 = 0x35;

/// RAMP_STAT: velocity is zero
pub const RAMP_STAT_VZERO: u32 = 1 << 10;

/// RAMP_STAT: XACTUAL equals XTARGET
pub const RAMP_STAT_POSITION_REACHED: u32 = 1 << 9;

/// Largest VMAX value
pub const VMAX_LIMIT: u32 = (1 << 23) - 512;

/// Largest VSTART value
pub const VSTART_LIMIT: u32 = (1 << 18) - 1;

/// Largest acceleration value
pub const ACCEL_LIMIT: u32 = (1 << 16) - 1;

// =============================================================================
// Chopper Control
// =============================================================================

/// Chopper and driver configuration
pub const CHOPCONF: u8 = 0x6C;

/// CHOPCONF without TOFF and MRES: HSTRT=4, HEND=1, TBL=2
pub const CHOPCONF_BASE: u32 = 0x0001_00C0;

/// TOFF field mask (0 disables the driver stage)
pub const CHOPCONF_TOFF_MASK: u32 = 0x0F;

/// TOFF value used while energized
pub const CHOPCONF_TOFF_ON: u32 = 3;

/// MRES field offset
pub const CHOPCONF_MRES_SHIFT: u32 = 24;

/// MRES field mask
pub const CHOPCONF_MRES_MASK: u32 = 0x0F << CHOPCONF_MRES_SHIFT;
