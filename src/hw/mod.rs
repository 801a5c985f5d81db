// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # MCU-Level Hardware Layer
//!
//! - [`i2c`] – bus transaction engine, generic over a [`BusController`]
//! - [`i2c0`] – KL25 I2C0 register backend
//! - [`gpio`] – port C outputs for the LCD
//! - [`tick`] – SysTick millisecond clock
//! - [`pins`] – board pin map

pub mod gpio;
pub mod i2c;
pub mod i2c0;
pub mod pins;
pub mod reg;
pub mod tick;

#[cfg(test)]
pub mod sim;

pub use gpio::PortCPin;
pub use i2c::{BusConfig, BusController, DeviceAddress, I2cBus};
pub use i2c0::I2c0;
pub use pins::LcdPins;
pub use tick::{Clock, SysTickClock};
