// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Port C GPIO outputs for the character LCD.
//!
//! `PortCPin` implements `embedded_hal::digital::OutputPin`, so the LCD driver stays generic over
//! the pin type in the same way `Led` does.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::hw::reg;

const GPIO_MUX: u8 = 1;

/// Enable the port C clock gate.
pub fn enable_port_c() {
    reg::set_bits32(reg::SIM_SCGC5, reg::SIM_SCGC5_PORTC);
}

/// A single push-pull output on port C.
pub struct PortCPin {
    mask: u32,
}

impl PortCPin {
    /// Mux pin `n` to GPIO, make it an output and drive it low.
    pub fn output(n: u8) -> Self {
        reg::set_pin_mux(reg::PORTC_BASE, n, GPIO_MUX);
        let mask = 1u32 << n;
        reg::set_bits32(reg::GPIOC_BASE + reg::GPIO_PDDR, mask);
        reg::write32(reg::GPIOC_BASE + reg::GPIO_PCOR, mask);
        Self { mask }
    }
}

impl ErrorType for PortCPin {
    type Error = Infallible;
}

impl OutputPin for PortCPin {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        reg::write32(reg::GPIOC_BASE + reg::GPIO_PCOR, self.mask);
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        reg::write32(reg::GPIOC_BASE + reg::GPIO_PSOR, self.mask);
        Ok(())
    }
}
