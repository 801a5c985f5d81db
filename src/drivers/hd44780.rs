// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! HD44780-compatible 16x2 character LCD on a 4-bit parallel bus.
//!
//! Write-only: RW is held low and the busy flag is never read, so every transfer is followed by a
//! fixed delay instead.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

/// Visible cells per line.
pub const WIDTH: usize = 16;

pub mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    pub const DISPLAY_ON: u8 = 0x0C;
    pub const FUNCTION_4BIT_2LINE: u8 = 0x28;
    pub const LINE1: u8 = 0x80;
    pub const LINE2: u8 = 0xC0;
}

const INIT_SEQUENCE: [u8; 4] = [
    cmd::HOME,
    cmd::FUNCTION_4BIT_2LINE,
    cmd::DISPLAY_ON,
    cmd::CLEAR,
];

/// E pulse half-period.
const PULSE_MS: u32 = 1;
/// Settle time after init and clear commands.
const COMMAND_SETTLE_MS: u32 = 10;

/// Where the next write starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    First,
    Second,
    /// Wherever the cursor is now.
    Current,
}

pub struct Hd44780<P, D> {
    rs: P,
    rw: P,
    en: P,
    /// D4..D7
    data: [P; 4],
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    pub fn new(rs: P, rw: P, en: P, data: [P; 4], delay: D) -> Self {
        Self {
            rs,
            rw,
            en,
            data,
            delay,
        }
    }

    /// Put the controller in 4-bit, two-line mode with the cursor hidden, and clear it.
    pub fn init(&mut self) {
        for c in INIT_SEQUENCE {
            self.command(c);
            self.delay.delay_ms(COMMAND_SETTLE_MS);
        }
    }

    pub fn clear(&mut self) {
        self.command(cmd::CLEAR);
        self.delay.delay_ms(COMMAND_SETTLE_MS);
    }

    pub fn command(&mut self, c: u8) {
        self.send(c, PinState::Low);
    }

    /// Write `text` as one full line: truncated to [`WIDTH`] cells and padded with spaces.
    pub fn write_str(&mut self, text: &str, line: Line) {
        self.select(line);
        let n = self.put_cells(text.chars().map(cell));
        self.pad(n);
    }

    /// Write `n` in decimal with no padding.
    pub fn write_u32(&mut self, n: u32, line: Line) {
        self.select(line);
        let mut buf = itoa::Buffer::new();
        let digits = buf.format(n);
        self.put_cells(digits.bytes());
    }

    /// Write `label` immediately followed by `n` as one padded line.
    pub fn write_labeled(&mut self, label: &str, n: u32, line: Line) {
        self.select(line);
        let mut buf = itoa::Buffer::new();
        let digits = buf.format(n);
        let n = self.put_cells(label.chars().map(cell).chain(digits.bytes()));
        self.pad(n);
    }

    pub fn free(self) -> (P, P, P, [P; 4], D) {
        (self.rs, self.rw, self.en, self.data, self.delay)
    }

    fn select(&mut self, line: Line) {
        match line {
            Line::First => self.command(cmd::LINE1),
            Line::Second => self.command(cmd::LINE2),
            Line::Current => {}
        }
    }

    fn put_cells<I: Iterator<Item = u8>>(&mut self, cells: I) -> usize {
        let mut n = 0;
        for b in cells.take(WIDTH) {
            self.send(b, PinState::High);
            n += 1;
        }
        n
    }

    fn pad(&mut self, written: usize) {
        for _ in written..WIDTH {
            self.send(b' ', PinState::High);
        }
    }

    fn send(&mut self, byte: u8, rs: PinState) {
        self.rs.set_state(rs).ok();
        self.rw.set_low().ok();
        self.write_nibble(byte >> 4);
        self.write_nibble(byte & 0x0F);
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_state(PinState::from(nibble & (1 << bit) != 0)).ok();
        }
        self.en.set_high().ok();
        self.delay.delay_ms(PULSE_MS);
        self.en.set_low().ok();
        self.delay.delay_ms(PULSE_MS);
    }
}

/// Map a character onto a display cell. The character ROM only matches ASCII.
fn cell(c: char) -> u8 {
    if c.is_ascii() {
        c as u8
    } else {
        b'?'
    }
}
