//! SPI register-based motor backend.
//!
//! The driver chip runs its own trapezoidal ramp generator, so this backend
//! only programs ramp parameters, writes the target and polls progress.

use embedded_hal::spi::SpiDevice;

use crate::config::units::{Microsteps, Milliamps};
use crate::error::{Error, MotorError, Result};

use super::current::{quantize_current, CurrentSetting};
use super::registers::*;
use super::Motor;

#[cfg(feature = "defmt")]
use defmt::{debug, info, warn};

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}

/// Default driver clock when running from the internal oscillator, Hz.
pub const DEFAULT_FCLK_HZ: f64 = 12_000_000.0;

/// Convert steps/s to the chip's velocity units.
fn velocity_units(steps_per_sec: f64, fclk_hz: f64, limit: u32) -> u32 {
    let raw = libm::round(steps_per_sec * (1u64 << 24) as f64 / fclk_hz);
    raw.max(0.0).min(limit as f64) as u32
}

/// Convert steps/s² to the chip's acceleration units.
fn acceleration_units(steps_per_sec2: f64, fclk_hz: f64) -> u32 {
    let raw = libm::round(steps_per_sec2 * (1u64 << 41) as f64 / (fclk_hz * fclk_hz));
    raw.max(1.0).min(ACCEL_LIMIT as f64) as u32
}

/// [`Motor`] backed by an SPI stepper driver with an internal ramp generator.
///
/// The chip's 32-bit position counter is unwrapped into an unbounded `i64`
/// register. Flags reflect the last successful poll; a failed transfer
/// surfaces as [`MotorError::HardwareFault`] and leaves them untouched.
pub struct RegisterMotor<SPI> {
    spi: SPI,
    fclk_hz: f64,
    chopconf: u32,
    energized: bool,
    moving: bool,
    stopping: bool,
    position: i64,
    last_xactual: i32,
    target_position: i64,
    start_speed: f64,
}

impl<SPI: SpiDevice> RegisterMotor<SPI> {
    /// Create a backend for a chip clocked at [`DEFAULT_FCLK_HZ`].
    pub fn new(spi: SPI) -> Self {
        Self::with_clock(spi, DEFAULT_FCLK_HZ)
    }

    /// Create a backend for a chip clocked at `fclk_hz`.
    pub fn with_clock(spi: SPI, fclk_hz: f64) -> Self {
        Self {
            spi,
            fclk_hz,
            chopconf: CHOPCONF_BASE,
            energized: false,
            moving: false,
            stopping: false,
            position: 0,
            last_xactual: 0,
            target_position: 0,
            start_speed: 0.0,
        }
    }

    /// Release the SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }

    fn transfer(&mut self, datagram: &mut [u8; DATAGRAM_LEN]) -> Result<()> {
        self.spi.transfer_in_place(datagram).map_err(|_| {
            warn!("SPI transfer failed");
            Error::Motor(MotorError::HardwareFault)
        })
    }

    fn write_register(&mut self, reg: u8, value: u32) -> Result<()> {
        let mut datagram = datagram(reg | WRITE_FLAG, value);
        self.transfer(&mut datagram)
    }

    /// Read a register. The reply arrives with the following datagram.
    fn read_register(&mut self, reg: u8) -> Result<u32> {
        let mut request = datagram(reg, 0);
        self.transfer(&mut request)?;

        let mut reply = datagram(reg, 0);
        self.transfer(&mut reply)?;

        Ok(u32::from_be_bytes([reply[1], reply[2], reply[3], reply[4]]))
    }

    fn chopconf_value(&self, energized: bool) -> u32 {
        if energized {
            self.chopconf | CHOPCONF_TOFF_ON
        } else {
            self.chopconf & !CHOPCONF_TOFF_MASK
        }
    }

    /// Read XACTUAL and fold it into the unwrapped position.
    fn poll_position(&mut self) -> Result<i64> {
        let raw = self.read_register(XACTUAL)? as i32;
        let delta = raw.wrapping_sub(self.last_xactual) as i64;
        self.last_xactual = raw;
        self.position += delta;
        Ok(self.position)
    }

    /// Chip counter value that corresponds to register `position`.
    fn chip_target(&self, position: i64) -> u32 {
        let delta = (position - self.position) as i32;
        self.last_xactual.wrapping_add(delta) as u32
    }
}

impl<SPI: SpiDevice> Motor for RegisterMotor<SPI> {
    fn setup_driver(&mut self, microsteps: Microsteps, max_current: Milliamps) -> Result<CurrentSetting> {
        let setting = quantize_current(max_current);
        if setting.is_reduced() {
            warn!(
                "Current {} mA not representable, using {} mA",
                setting.requested.0, setting.effective.0
            );
        }

        let mres = 8 - microsteps.log2();
        let chopconf = (CHOPCONF_BASE & !CHOPCONF_MRES_MASK) | (mres << CHOPCONF_MRES_SHIFT);

        let irun = setting.run_current as u32;
        let ihold_irun = (IHOLDDELAY << IHOLDDELAY_SHIFT) | (irun << IRUN_SHIFT) | ((irun / 2) << IHOLD_SHIFT);

        self.write_register(GSTAT, GSTAT_CLEAR_ALL)?;
        self.write_register(GCONF, 0)?;
        self.chopconf = chopconf;
        self.write_register(CHOPCONF, self.chopconf_value(self.energized))?;
        self.write_register(GLOBALSCALER, setting.range.global_scaler() as u32)?;
        self.write_register(IHOLD_IRUN, ihold_irun)?;
        self.write_register(RAMPMODE, RAMPMODE_POSITION)?;
        self.write_register(V1, 0)?;

        let raw = self.read_register(XACTUAL)? as i32;
        self.last_xactual = raw;
        self.position = raw as i64;
        self.target_position = self.position;

        info!(
            "Driver set up: {} microsteps, {} mA",
            microsteps.value(),
            setting.effective.0
        );

        Ok(setting)
    }

    fn set_power_on(&mut self) -> Result<()> {
        self.write_register(CHOPCONF, self.chopconf_value(true))?;
        self.energized = true;
        Ok(())
    }

    fn set_power_off(&mut self) -> Result<()> {
        self.write_register(CHOPCONF, self.chopconf_value(false))?;
        self.energized = false;

        if self.moving {
            // The ramp generator keeps counting with the stage disabled
            let position = self.poll_position()?;
            self.write_register(XTARGET, self.chip_target(position))?;
            self.moving = false;
            self.stopping = false;
            info!("Power cut during move, halted at {}", position);
        }

        Ok(())
    }

    fn is_energized(&self) -> bool {
        self.energized
    }

    fn is_moving(&self) -> bool {
        self.moving
    }

    fn is_stopping(&self) -> bool {
        self.stopping
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn target_position(&self) -> i64 {
        self.target_position
    }

    fn set_acceleration(&mut self, acceleration: f64) -> Result<()> {
        let units = acceleration_units(acceleration, self.fclk_hz);
        self.write_register(A1, units)?;
        self.write_register(AMAX, units)?;
        self.write_register(DMAX, units)?;
        self.write_register(D1, units)?;
        Ok(())
    }

    fn set_start_speed(&mut self, start_speed: f64) -> Result<()> {
        let units = velocity_units(start_speed, self.fclk_hz, VSTART_LIMIT);
        self.write_register(VSTART, units)?;
        // VSTOP must not be below VSTART and never zero
        self.write_register(VSTOP, units.max(1))?;
        self.start_speed = start_speed;
        Ok(())
    }

    fn start_move_to_position(&mut self, target: i64, top_speed: f64) -> Result<()> {
        if !self.energized {
            return Err(MotorError::NotEnergized.into());
        }
        if self.moving {
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

        self.write_register(VMAX, velocity_units(top_speed, self.fclk_hz, VMAX_LIMIT))?;
        self.write_register(XTARGET, self.chip_target(target))?;

        self.target_position = target;
        self.moving = true;
        self.stopping = false;

        info!("Move started: {} -> {} at {} steps/s", self.position, target, top_speed);

        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.moving && !self.stopping {
            // Positioning mode with VMAX = 0 decelerates to standstill
            self.write_register(VMAX, 0)?;
            self.stopping = true;
            info!("Stop requested at {}", self.position);
        }
        self.update_state()
    }

    fn update_state(&mut self) -> Result<()> {
        if !self.moving {
            return Ok(());
        }

        self.poll_position()?;
        let status = self.read_register(RAMP_STAT)?;

        let reached = status & RAMP_STAT_POSITION_REACHED != 0;
        let halted = self.stopping && status & RAMP_STAT_VZERO != 0;
        if reached || halted {
            debug!("Move complete at {}", self.position);
            self.moving = false;
            self.stopping = false;
        }

        Ok(())
    }
}

fn datagram(address: u8, value: u32) -> [u8; DATAGRAM_LEN] {
    let [b3, b2, b1, b0] = value.to_be_bytes();
    [address, b3, b2, b1, b0]
}
