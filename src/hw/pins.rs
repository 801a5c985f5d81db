// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin assignments for the FRDM-KL25Z tracker board.
//!
//! | Signal   | Pin   | Mux  |
//! | -------- | ----- | ---- |
//! | I2C0 SCL | PTE24 | ALT5 |
//! | I2C0 SDA | PTE25 | ALT5 |
//! | LCD DB7  | PTC7  | GPIO |
//! | LCD DB6  | PTC0  | GPIO |
//! | LCD DB5  | PTC3  | GPIO |
//! | LCD DB4  | PTC4  | GPIO |
//! | LCD E    | PTC5  | GPIO |
//! | LCD RW   | PTC6  | GPIO |
//! | LCD RS   | PTC10 | GPIO |

use crate::hw::gpio::PortCPin;

pub const I2C0_SCL: u8 = 24;
pub const I2C0_SDA: u8 = 25;
pub const I2C0_MUX: u8 = 5;

pub const LCD_DB7: u8 = 7;
pub const LCD_DB6: u8 = 0;
pub const LCD_DB5: u8 = 3;
pub const LCD_DB4: u8 = 4;
pub const LCD_E: u8 = 5;
pub const LCD_RW: u8 = 6;
pub const LCD_RS: u8 = 10;

/// Character LCD control and data lines, already configured as outputs.
pub struct LcdPins {
    pub rs: PortCPin,
    pub rw: PortCPin,
    pub en: PortCPin,
    pub d4: PortCPin,
    pub d5: PortCPin,
    pub d6: PortCPin,
    pub d7: PortCPin,
}

impl LcdPins {
    /// Gate port C and configure every LCD line as a GPIO output. Call once at startup.
    pub fn configure() -> Self {
        crate::hw::gpio::enable_port_c();
        Self {
            rs: PortCPin::output(LCD_RS),
            rw: PortCPin::output(LCD_RW),
            en: PortCPin::output(LCD_E),
            d4: PortCPin::output(LCD_DB4),
            d5: PortCPin::output(LCD_DB5),
            d6: PortCPin::output(LCD_DB6),
            d7: PortCPin::output(LCD_DB7),
        }
    }
}
