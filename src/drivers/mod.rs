// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! application logic.
//!
//! ## Existing drivers
//!
//! - [`mma8451`] – NXP MMA8451Q 3-axis accelerometer on the I2C bus
//! - [`hd44780`] – HD44780-compatible 16x2 character LCD on a 4-bit GPIO bus

pub mod hd44780;
pub mod mma8451;

pub use hd44780::Hd44780;
pub use mma8451::Mma8451;
