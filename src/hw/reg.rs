// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Raw memory-mapped register access for the Kinetis peripherals that have no HAL in this crate.
//!
//! Addresses are plain `usize` constants taken from the KL25 reference manual (KL25P80M48SF0RM).

use core::ptr::{read_volatile, write_volatile};

// System integration module clock gates
pub const SIM_SCGC4: usize = 0x4004_8034;
pub const SIM_SCGC5: usize = 0x4004_8038;

pub const SIM_CLKDIV1: usize = 0x4004_8044;
pub const SIM_COPC: usize = 0x4004_8100;

pub const SIM_SCGC4_I2C0: u32 = 1 << 6;
pub const SIM_SCGC5_PORTC: u32 = 1 << 11;
pub const SIM_SCGC5_PORTE: u32 = 1 << 13;

// Multipurpose clock generator
pub const MCG_C4: usize = 0x4006_4003;

pub const MCG_C4_DMX32: u8 = 1 << 7;
pub const MCG_C4_DRST_DRS_MASK: u8 = 0x3 << 5;
pub const MCG_C4_DRST_DRS_MID: u8 = 0x1 << 5;

// Port control (pin mux) blocks
pub const PORTC_BASE: usize = 0x4004_B000;
pub const PORTE_BASE: usize = 0x4004_D000;

const PCR_MUX_SHIFT: u32 = 8;
const PCR_MUX_MASK: u32 = 0x7 << PCR_MUX_SHIFT;

// Fast GPIO view of port C
pub const GPIOC_BASE: usize = 0x400F_F080;
pub const GPIO_PSOR: usize = 0x04;
pub const GPIO_PCOR: usize = 0x08;
pub const GPIO_PDDR: usize = 0x14;

#[inline(always)]
pub fn read8(addr: usize) -> u8 {
    unsafe { read_volatile(addr as *const u8) }
}

#[inline(always)]
pub fn write8(addr: usize, val: u8) {
    unsafe { write_volatile(addr as *mut u8, val) }
}

#[inline(always)]
pub fn set_bits8(addr: usize, bits: u8) {
    write8(addr, read8(addr) | bits);
}

#[inline(always)]
pub fn clear_bits8(addr: usize, bits: u8) {
    write8(addr, read8(addr) & !bits);
}

#[inline(always)]
pub fn read32(addr: usize) -> u32 {
    unsafe { read_volatile(addr as *const u32) }
}

#[inline(always)]
pub fn write32(addr: usize, val: u32) {
    unsafe { write_volatile(addr as *mut u32, val) }
}

#[inline(always)]
pub fn set_bits32(addr: usize, bits: u32) {
    write32(addr, read32(addr) | bits);
}

/// Route pin `pin` of the port at `port_base` to alternate function `mux`.
pub fn set_pin_mux(port_base: usize, pin: u8, mux: u8) {
    let pcr = port_base + (pin as usize) * 4;
    let mut val = read32(pcr);
    val &= !PCR_MUX_MASK;
    val |= ((mux as u32) << PCR_MUX_SHIFT) & PCR_MUX_MASK;
    write32(pcr, val);
}
