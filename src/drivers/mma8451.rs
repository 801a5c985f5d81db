// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! NXP MMA8451Q 3-axis accelerometer.
//!
//! This module handles register access, sample decoding and start-up calibration. The bus is passed
//! in as `&mut` to each method so the sensor can share it with other slaves.

use core::fmt;

use crate::hw::i2c::{self, BusController, DeviceAddress, I2cBus};
use crate::hw::tick::Clock;

/// Write address of the sensor with SA0 pulled high.
pub const ADDRESS: DeviceAddress = DeviceAddress::new(0x3A);

/// Expected WHO_AM_I contents.
pub const WHO_AM_I_VALUE: u8 = 0x1A;

/// Default number of samples averaged by [`Mma8451::calibrate`].
pub const CALIBRATION_SAMPLES: u32 = 100;

// Register addresses
pub mod reg {
    pub const OUT_X_MSB: u8 = 0x01;
    pub const OUT_X_LSB: u8 = 0x02;
    pub const OUT_Y_MSB: u8 = 0x03;
    pub const OUT_Y_LSB: u8 = 0x04;
    pub const OUT_Z_MSB: u8 = 0x05;
    pub const OUT_Z_LSB: u8 = 0x06;
    pub const WHO_AM_I: u8 = 0x0D;
    pub const CTRL_REG1: u8 = 0x2A;
}

/// CTRL_REG1 ACTIVE bit. Everything else left at reset (800 Hz ODR, normal read mode).
const CTRL_REG1_ACTIVE: u8 = 0x01;

/// One acceleration reading in 14-bit counts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Sample {
    /// Decode the six output registers (MSB first per axis, left-justified 14-bit).
    pub fn from_registers(raw: &[u8; 6]) -> Self {
        let axis = |msb: u8, lsb: u8| i16::from_be_bytes([msb, lsb]) >> 2;
        Self {
            x: axis(raw[0], raw[1]),
            y: axis(raw[2], raw[3]),
            z: axis(raw[4], raw[5]),
        }
    }
}

/// Per-axis rest offsets subtracted before step detection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Baseline {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Running per-axis sum for calibration.
#[derive(Copy, Clone, Debug, Default)]
pub struct CalibrationAccumulator {
    sum: [i64; 3],
    count: u32,
}

impl CalibrationAccumulator {
    pub fn push(&mut self, s: Sample) {
        self.sum[0] += i64::from(s.x);
        self.sum[1] += i64::from(s.y);
        self.sum[2] += i64::from(s.z);
        self.count += 1;
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Per-axis mean, truncated toward zero. No samples gives a zero baseline.
    pub fn finish(&self) -> Baseline {
        if self.count == 0 {
            return Baseline::default();
        }
        let n = i64::from(self.count);
        Baseline {
            x: (self.sum[0] / n) as i32,
            y: (self.sum[1] / n) as i32,
            z: (self.sum[2] / n) as i32,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    Bus(i2c::Error),
    /// WHO_AM_I returned something other than [`WHO_AM_I_VALUE`].
    UnexpectedId(u8),
}

impl From<i2c::Error> for Error {
    fn from(e: i2c::Error) -> Self {
        Error::Bus(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "mma8451: {}", e),
            Error::UnexpectedId(id) => write!(f, "mma8451: unexpected WHO_AM_I {:#04x}", id),
        }
    }
}

/// MMA8451Q driver bound to a bus address.
pub struct Mma8451 {
    address: DeviceAddress,
}

impl Default for Mma8451 {
    fn default() -> Self {
        Self::new(ADDRESS)
    }
}

impl Mma8451 {
    pub fn new(address: DeviceAddress) -> Self {
        Self { address }
    }

    #[inline]
    pub fn address(&self) -> DeviceAddress {
        self.address
    }

    /// Check WHO_AM_I so a missing or wrong part fails fast.
    pub fn verify<B: BusController, C: Clock>(
        &mut self,
        bus: &mut I2cBus<B, C>,
    ) -> Result<(), Error> {
        let id = bus.read_byte(self.address, reg::WHO_AM_I)?;
        if id == WHO_AM_I_VALUE {
            Ok(())
        } else {
            warn!("mma8451: WHO_AM_I = {=u8:#x}", id);
            Err(Error::UnexpectedId(id))
        }
    }

    /// Put the part in ACTIVE mode.
    pub fn configure<B: BusController, C: Clock>(
        &mut self,
        bus: &mut I2cBus<B, C>,
    ) -> Result<(), Error> {
        bus.write_byte(self.address, reg::CTRL_REG1, CTRL_REG1_ACTIVE)?;
        Ok(())
    }

    /// Burst-read all three axes at full resolution.
    pub fn read_sample<B: BusController, C: Clock>(
        &mut self,
        bus: &mut I2cBus<B, C>,
    ) -> Result<Sample, Error> {
        let mut raw = [0u8; 6];
        bus.read_burst(self.address, reg::OUT_X_MSB, &mut raw)?;
        Ok(Sample::from_registers(&raw))
    }

    /// MSB-only reading of each axis, one transaction per axis.
    pub fn read_sample_coarse<B: BusController, C: Clock>(
        &mut self,
        bus: &mut I2cBus<B, C>,
    ) -> Result<Sample, Error> {
        let mut axis = |r| -> Result<i16, Error> {
            Ok(i16::from(bus.read_byte(self.address, r)? as i8))
        };
        Ok(Sample {
            x: axis(reg::OUT_X_MSB)?,
            y: axis(reg::OUT_Y_MSB)?,
            z: axis(reg::OUT_Z_MSB)?,
        })
    }

    /// Average `count` samples taken at rest.
    pub fn calibrate<B: BusController, C: Clock>(
        &mut self,
        bus: &mut I2cBus<B, C>,
        count: u32,
    ) -> Result<Baseline, Error> {
        let mut acc = CalibrationAccumulator::default();
        for _ in 0..count {
            acc.push(self.read_sample(bus)?);
        }
        let baseline = acc.finish();
        info!(
            "mma8451: baseline x={} y={} z={}",
            baseline.x,
            baseline.y,
            baseline.z
        );
        Ok(baseline)
    }
}
