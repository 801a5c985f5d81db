// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # FitTrack Firmware
//!
//! This crate contains the firmware for a wrist-worn step counter built on the FRDM-KL25Z board,
//! written in Rust, targeting the MKL25Z128 (Cortex-M0+) MCU. An MMA8451Q accelerometer sits on
//! I2C0 and a 16x2 character LCD is wired to port C.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level I2C transaction engine, I2C0 registers, GPIO, SysTick |
//! | [`drivers`] | Device-level drivers (MMA8451Q, HD44780) |
//! | [`control`]   | Step detection and the tracker loop |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --target thumbv6m-none-eabi --features firmware
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod control;
pub mod drivers;
pub mod hw;
