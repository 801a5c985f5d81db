// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! I2C0 register backend.
//!
//! Maps the [`BusController`] primitives onto the KL25 I2C0 module. SCL/SDA are routed to
//! PTE24/PTE25.

use core::cell::Cell;
use core::convert::Infallible;

use critical_section::Mutex;

use crate::hw::i2c::{BusController, Divider};
use crate::hw::pins;
use crate::hw::reg;

const I2C0_BASE: usize = 0x4006_6000;

const F: usize = I2C0_BASE + 0x01;
const C1: usize = I2C0_BASE + 0x02;
const S: usize = I2C0_BASE + 0x03;
const D: usize = I2C0_BASE + 0x04;
const C2: usize = I2C0_BASE + 0x05;

mod c1 {
    pub const IICEN: u8 = 1 << 7;
    pub const MST: u8 = 1 << 5;
    pub const TX: u8 = 1 << 4;
    pub const TXAK: u8 = 1 << 3;
    pub const RSTA: u8 = 1 << 2;
}

mod s {
    pub const ARBL: u8 = 1 << 4;
    pub const IICIF: u8 = 1 << 1;
}

const C2_HDRS: u8 = 1 << 5;

static TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

/// Exclusive handle to I2C0.
pub struct I2c0 {
    _private: (),
}

impl I2c0 {
    /// Claim the module. Returns `None` if it has already been taken.
    pub fn take() -> Option<Self> {
        critical_section::with(|cs| {
            let taken = TAKEN.borrow(cs);
            if taken.get() {
                None
            } else {
                taken.set(true);
                Some(Self { _private: () })
            }
        })
    }

    #[inline]
    fn c1(&mut self, bits: u8, on: bool) {
        if on {
            reg::set_bits8(C1, bits);
        } else {
            reg::clear_bits8(C1, bits);
        }
    }
}

impl BusController for I2c0 {
    fn power_up(&mut self, divider: Divider) {
        reg::set_bits32(reg::SIM_SCGC4, reg::SIM_SCGC4_I2C0);
        reg::set_bits32(reg::SIM_SCGC5, reg::SIM_SCGC5_PORTE);

        reg::set_pin_mux(reg::PORTE_BASE, pins::I2C0_SCL, pins::I2C0_MUX);
        reg::set_pin_mux(reg::PORTE_BASE, pins::I2C0_SDA, pins::I2C0_MUX);

        reg::write8(C1, 0);
        reg::write8(F, ((divider.mult & 0x03) << 6) | (divider.icr & 0x3F));
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.c1(c1::IICEN, enabled);
    }

    fn set_high_drive(&mut self, high: bool) {
        if high {
            reg::set_bits8(C2, C2_HDRS);
        } else {
            reg::clear_bits8(C2, C2_HDRS);
        }
    }

    fn set_master(&mut self, master: bool) {
        self.c1(c1::MST, master);
    }

    fn set_transmit(&mut self, transmit: bool) {
        self.c1(c1::TX, transmit);
    }

    fn set_nack(&mut self, nack: bool) {
        self.c1(c1::TXAK, nack);
    }

    fn repeat_start(&mut self) {
        self.c1(c1::RSTA, true);
    }

    fn write_data(&mut self, byte: u8) {
        reg::write8(D, byte);
    }

    fn read_data(&mut self) -> u8 {
        reg::read8(D)
    }

    fn poll_transfer(&mut self) -> nb::Result<(), Infallible> {
        if reg::read8(S) & s::IICIF != 0 {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    // Both flags are write-one-to-clear. Writing only the target bit leaves the other alone.
    fn clear_transfer_flag(&mut self) {
        reg::write8(S, s::IICIF);
    }

    fn arbitration_lost(&self) -> bool {
        reg::read8(S) & s::ARBL != 0
    }

    fn clear_arbitration_lost(&mut self) {
        reg::write8(S, s::ARBL);
    }
}
