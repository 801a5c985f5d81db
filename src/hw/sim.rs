// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side bus controller and clock for unit tests.
//!
//! `SimController` models the controller bits and a set of register-file slaves with an
//! auto-incrementing register pointer, which is how the accelerometer behaves. It records bus
//! events in order so tests can assert on framing.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;

use crate::hw::i2c::{BusController, DeviceAddress, Divider};
use crate::hw::tick::Clock;

/// Something observable on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Start,
    RepeatedStart,
    Stop,
    /// Byte clocked out by the master.
    Tx(u8),
    /// Byte clocked in, and whether the master answered with NACK.
    Rx { byte: u8, nack: bool },
    /// Acknowledge policy selected for the next received byte.
    AckPolicy { nack: bool },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Address,
    Write {
        device: Option<usize>,
        pointer_set: bool,
    },
    Read {
        device: Option<usize>,
    },
}

/// Controller state that survives between transactions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub enabled: bool,
    pub high_drive: bool,
    pub master: bool,
    pub transmit: bool,
    pub nack: bool,
    pub data: u8,
    pub transfer_flag: bool,
    pub arbitration_lost: bool,
    pub phase: Phase,
}

struct SimDevice {
    address: DeviceAddress,
    regs: [u8; 256],
    pointer: u8,
}

pub struct SimController {
    enabled: bool,
    high_drive: bool,
    master: bool,
    transmit: bool,
    nack: bool,
    data: u8,
    iicif: bool,
    arbl: bool,
    divider: Option<Divider>,
    phase: Phase,
    devices: Vec<SimDevice>,
    scripted: VecDeque<u8>,
    stalls: u32,
    wedged: bool,
    events: Vec<Event>,
}

impl SimController {
    pub fn new() -> Self {
        Self {
            enabled: false,
            high_drive: false,
            master: false,
            transmit: false,
            nack: false,
            data: 0,
            iicif: false,
            arbl: false,
            divider: None,
            phase: Phase::Idle,
            devices: Vec::new(),
            scripted: VecDeque::new(),
            stalls: 0,
            wedged: false,
            events: Vec::new(),
        }
    }

    /// Attach a slave that answers at `address`.
    pub fn with_device(mut self, address: DeviceAddress) -> Self {
        self.devices.push(SimDevice {
            address,
            regs: [0; 256],
            pointer: 0,
        });
        self
    }

    pub fn set_register(&mut self, address: DeviceAddress, reg: u8, value: u8) {
        if let Some(dev) = self.devices.iter_mut().find(|d| d.address == address) {
            dev.regs[reg as usize] = value;
        }
    }

    pub fn register(&self, address: DeviceAddress, reg: u8) -> u8 {
        self.devices
            .iter()
            .find(|d| d.address == address)
            .map_or(0xFF, |d| d.regs[reg as usize])
    }

    /// Queue bytes that slaves return ahead of their register contents.
    pub fn script(&mut self, bytes: &[u8]) {
        self.scripted.extend(bytes.iter().copied());
    }

    /// Drop the completion flag for the next `n` in-transaction transfers.
    pub fn stall(&mut self, n: u32) {
        self.stalls += n;
    }

    /// A slave holds the bus: nothing completes and arbitration loss cannot be cleared.
    pub fn wedge(&mut self) {
        self.wedged = true;
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn high_drive(&self) -> bool {
        self.high_drive
    }

    pub fn divider(&self) -> Option<Divider> {
        self.divider
    }

    pub fn transfer_flag(&self) -> bool {
        self.iicif
    }

    /// Enabled, not holding the bus and with no transfer pending.
    pub fn is_idle(&self) -> bool {
        self.enabled && !self.master && self.phase == Phase::Idle && !self.iicif
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            enabled: self.enabled,
            high_drive: self.high_drive,
            master: self.master,
            transmit: self.transmit,
            nack: self.nack,
            data: self.data,
            transfer_flag: self.iicif,
            arbitration_lost: self.arbl,
            phase: self.phase,
        }
    }

    fn find(&self, addr_byte: u8) -> Option<usize> {
        self.devices
            .iter()
            .position(|d| d.address == DeviceAddress::new(addr_byte))
    }

    /// Whether this transfer should stall. Out-of-transaction transfers never do.
    fn take_stall(&mut self) -> bool {
        if self.wedged {
            self.arbl = true;
            return true;
        }
        if self.phase != Phase::Idle && self.stalls > 0 {
            self.stalls -= 1;
            return true;
        }
        false
    }

    fn transmit_byte(&mut self, byte: u8) {
        self.events.push(Event::Tx(byte));
        if self.take_stall() {
            return;
        }

        self.phase = match self.phase {
            Phase::Idle => Phase::Idle,
            Phase::Address => {
                let device = self.find(byte);
                if byte & 0x01 != 0 {
                    Phase::Read { device }
                } else {
                    Phase::Write {
                        device,
                        pointer_set: false,
                    }
                }
            }
            Phase::Write {
                device,
                pointer_set,
            } => {
                if let Some(dev) = device.map(|i| &mut self.devices[i]) {
                    if pointer_set {
                        dev.regs[dev.pointer as usize] = byte;
                        dev.pointer = dev.pointer.wrapping_add(1);
                    } else {
                        dev.pointer = byte;
                    }
                }
                Phase::Write {
                    device,
                    pointer_set: true,
                }
            }
            read @ Phase::Read { .. } => read,
        };
        self.iicif = true;
    }

    fn receive_byte(&mut self, device: Option<usize>) {
        if self.take_stall() {
            return;
        }

        let byte = match self.scripted.pop_front() {
            Some(b) => b,
            None => match device.map(|i| &mut self.devices[i]) {
                Some(dev) => {
                    let b = dev.regs[dev.pointer as usize];
                    dev.pointer = dev.pointer.wrapping_add(1);
                    b
                }
                None => 0xFF,
            },
        };

        self.data = byte;
        self.events.push(Event::Rx {
            byte,
            nack: self.nack,
        });
        self.iicif = true;
    }
}

impl BusController for SimController {
    fn power_up(&mut self, divider: Divider) {
        self.divider = Some(divider);
    }

    fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.phase = Phase::Idle;
        }
        self.enabled = enabled;
    }

    fn set_high_drive(&mut self, high: bool) {
        self.high_drive = high;
    }

    fn set_master(&mut self, master: bool) {
        if self.enabled && master != self.master {
            if master {
                self.events.push(Event::Start);
                self.phase = Phase::Address;
            } else {
                self.events.push(Event::Stop);
                self.phase = Phase::Idle;
            }
        }
        self.master = master;
    }

    fn set_transmit(&mut self, transmit: bool) {
        self.transmit = transmit;
    }

    fn set_nack(&mut self, nack: bool) {
        self.nack = nack;
        self.events.push(Event::AckPolicy { nack });
    }

    fn repeat_start(&mut self) {
        if self.enabled && self.master {
            self.events.push(Event::RepeatedStart);
            self.phase = Phase::Address;
        }
    }

    fn write_data(&mut self, byte: u8) {
        self.data = byte;
        if self.enabled && self.master && self.transmit {
            self.transmit_byte(byte);
        }
    }

    fn read_data(&mut self) -> u8 {
        let latched = self.data;
        if self.enabled && self.master && !self.transmit {
            if let Phase::Read { device } = self.phase {
                self.receive_byte(device);
            }
        }
        latched
    }

    fn poll_transfer(&mut self) -> nb::Result<(), Infallible> {
        if self.iicif {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    fn clear_transfer_flag(&mut self) {
        self.iicif = false;
    }

    fn arbitration_lost(&self) -> bool {
        self.arbl
    }

    fn clear_arbitration_lost(&mut self) {
        if !self.wedged {
            self.arbl = false;
        }
    }
}

/// Shared millisecond counter. `now` advances by `step` on every read so time-bounded loops
/// terminate without a real tick source.
#[derive(Clone)]
pub struct SimClock {
    now: Rc<Cell<u32>>,
    step: u32,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(0)),
            step: 0,
        }
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    /// Current time without advancing it.
    pub fn peek(&self) -> u32 {
        self.now.get()
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for SimClock {
    fn now(&self) -> u32 {
        let t = self.now.get();
        self.advance(self.step);
        t
    }

    fn delay(&mut self, ms: u32) {
        self.advance(ms);
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(ns.div_ceil(1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms);
    }
}
