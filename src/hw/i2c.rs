// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two-wire (I2C) bus transaction engine.
//!
//! [`I2cBus`] drives a [`BusController`] phase by phase:
//!
//! ```text
//! START -> ADDR|W -> [REG] -> [RESTART -> ADDR|R] -> DATA... -> STOP
//! ```
//!
//! Every phase ends in [`I2cBus::wait`], which polls the controller's transfer-complete flag. A
//! bounded recovery counter guards the poll. When the limit is hit the engine runs
//! [`I2cBus::recover_bus`] once and reports the stall instead of spinning forever on a wedged
//! slave.
//!
//! Receive has one byte of latency: reading the data register returns the byte that is already
//! latched and starts clocking in the next one. [`I2cBus::repeated_read`] returns the latched byte
//! and [`I2cBus::drain`] collects the final one after STOP.

use core::convert::Infallible;
use core::fmt;

use crate::hw::tick::{elapsed, Clock};

/// Poll iterations before a wait gives up and recovers the bus.
pub const RECOVERY_CEILING: u32 = 200;

/// Clocked out during recovery with SDA released so a stuck slave can finish its byte.
const RECOVERY_DUMMY_BYTE: u8 = 0xFF;

/// Baud divider fields of the controller's frequency register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Divider {
    /// Multiplier factor, 0..=2 (x1, x2, x4).
    pub mult: u8,
    /// Clock rate index into the SCL divider table.
    pub icr: u8,
}

impl Default for Divider {
    fn default() -> Self {
        Self { mult: 0, icr: 0x10 }
    }
}

/// Register-level view of a single bus controller.
///
/// The primitives mirror the controller's control bits one to one. Sequencing them into valid
/// transactions is the engine's job, not the backend's.
pub trait BusController {
    /// Gate the module clock, mux SCL/SDA and program the baud divider. Leaves the module disabled.
    fn power_up(&mut self, divider: Divider);

    fn set_enabled(&mut self, enabled: bool);

    fn set_high_drive(&mut self, high: bool);

    /// Rising edge generates START, falling edge generates STOP.
    fn set_master(&mut self, master: bool);

    fn set_transmit(&mut self, transmit: bool);

    /// Answer the next received byte with NACK instead of ACK.
    fn set_nack(&mut self, nack: bool);

    /// Generate a repeated START without releasing the bus.
    fn repeat_start(&mut self);

    /// Load the data register. In master transmit mode this starts a byte transfer.
    fn write_data(&mut self, byte: u8);

    /// Read the data register. In master receive mode this starts the next byte transfer.
    fn read_data(&mut self) -> u8;

    /// `Ok` once the pending-interrupt flag is set for the current transfer.
    fn poll_transfer(&mut self) -> nb::Result<(), Infallible>;

    fn clear_transfer_flag(&mut self);

    fn arbitration_lost(&self) -> bool;

    fn clear_arbitration_lost(&mut self);
}

/// 8-bit (pre-shifted) slave address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceAddress(u8);

impl DeviceAddress {
    /// From the 8-bit form used in datasheet write-address tables. Bit 0 is ignored.
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0xFE)
    }

    /// From a 7-bit address.
    pub const fn from_7bit(addr: u8) -> Self {
        Self(addr << 1)
    }

    /// Address-phase byte with write intent.
    #[inline]
    pub const fn write(self) -> u8 {
        self.0
    }

    /// Address-phase byte with read intent.
    #[inline]
    pub const fn read(self) -> u8 {
        self.0 | 0x01
    }
}

/// Acknowledge policy for the byte a [`I2cBus::repeated_read`] clocks in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    /// ACK, more bytes follow.
    Continue,
    /// NACK and STOP, this is the final byte.
    Last,
}

/// How a single wait finished.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Completion {
    /// The controller raised its completion flag.
    Acked,
    /// The limit was reached and the bus was recovered. The phase itself did not complete.
    Recovered,
}

/// Bus failures surfaced by the blocking primitives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A phase stalled and the bus had to be recovered; the transaction was abandoned.
    Timeout,
    /// Recovery itself stalled or arbitration could not be cleared.
    Fault,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Timeout => f.write_str("i2c phase timed out, bus recovered"),
            Error::Fault => f.write_str("i2c bus fault, recovery failed"),
        }
    }
}

/// What a transaction does after one of its phases needed a recovery.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StallPolicy {
    /// Abandon the transaction with [`Error::Timeout`].
    Abort,
    /// Carry on with the remaining phases as if the stalled one had completed.
    Continue,
}

/// Bound on a single wait.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitLimit {
    /// Number of flag polls. Real-time length depends on CPU speed.
    Polls(u32),
    /// Milliseconds on the tick source.
    Millis(u32),
}

/// Engine configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    pub divider: Divider,
    pub wait_limit: WaitLimit,
    pub stall_policy: StallPolicy,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            divider: Divider::default(),
            wait_limit: WaitLimit::Polls(RECOVERY_CEILING),
            stall_policy: StallPolicy::Abort,
        }
    }
}

impl BusConfig {
    pub fn with_divider(mut self, divider: Divider) -> Self {
        self.divider = divider;
        self
    }

    pub fn with_wait_limit(mut self, limit: WaitLimit) -> Self {
        self.wait_limit = limit;
        self
    }

    pub fn with_stall_policy(mut self, policy: StallPolicy) -> Self {
        self.stall_policy = policy;
        self
    }
}

/// Running counters, mainly for diagnostics on the debug probe.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusStats {
    /// STARTs issued.
    pub transactions: u32,
    /// Recovery cycles run.
    pub recoveries: u32,
    /// Recoveries that did not clear the bus.
    pub faults: u32,
}

/// Bus master transaction engine. Owns the controller exclusively.
pub struct I2cBus<B, C> {
    ctrl: B,
    clock: C,
    config: BusConfig,
    lock_detect: u32,
    stats: BusStats,
}

impl<B, C> I2cBus<B, C>
where
    B: BusController,
    C: Clock,
{
    pub fn new(ctrl: B, clock: C, config: BusConfig) -> Self {
        Self {
            ctrl,
            clock,
            config,
            lock_detect: 0,
            stats: BusStats::default(),
        }
    }

    /// Release the controller and clock.
    pub fn free(self) -> (B, C) {
        (self.ctrl, self.clock)
    }

    /// Power up the controller and leave it idle, enabled and in high-drive mode.
    pub fn initialize(&mut self) {
        self.ctrl.power_up(self.config.divider);
        self.ctrl.set_enabled(true);
        self.ctrl.set_high_drive(true);
        info!(
            "i2c: up, mult={} icr={}",
            self.config.divider.mult,
            self.config.divider.icr
        );
    }

    #[inline]
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    #[inline]
    pub fn stats(&self) -> BusStats {
        self.stats
    }

    /// Recovery counter value left by the most recent wait.
    #[inline]
    pub fn lock_detect(&self) -> u32 {
        self.lock_detect
    }

    #[inline]
    pub fn controller(&self) -> &B {
        &self.ctrl
    }

    #[inline]
    pub fn controller_mut(&mut self) -> &mut B {
        &mut self.ctrl
    }

    /// Enter master transmit mode, generating START.
    pub fn start(&mut self) {
        self.stats.transactions = self.stats.transactions.wrapping_add(1);
        self.ctrl.set_transmit(true);
        self.ctrl.set_master(true);
    }

    /// Drop the master role, generating STOP.
    #[inline]
    pub fn stop(&mut self) {
        self.ctrl.set_master(false);
    }

    /// Repeated START, keeping the bus.
    #[inline]
    pub fn restart(&mut self) {
        self.ctrl.repeat_start();
    }

    /// Send the write address and the register offset.
    pub fn write_address_and_register(
        &mut self,
        device: DeviceAddress,
        register: u8,
    ) -> Result<(), Error> {
        self.send(device.write())?;
        self.send(register)
    }

    /// Point the slave at `register`, then restart in read mode and switch to receive.
    ///
    /// The bus must already be started.
    pub fn read_setup(&mut self, device: DeviceAddress, register: u8) -> Result<(), Error> {
        self.write_address_and_register(device, register)?;
        self.restart();
        self.send(device.read())?;
        self.ctrl.set_transmit(false);
        Ok(())
    }

    /// Clock in one byte with the given acknowledge policy.
    ///
    /// Returns the byte that was latched before this call: on the first call after
    /// [`read_setup`](Self::read_setup) that is stale, afterwards it is the byte clocked in by the
    /// previous call. With [`Ack::Last`] the engine sends STOP once the byte is in, and the byte
    /// must then be collected with [`drain`](Self::drain).
    pub fn repeated_read(&mut self, ack: Ack) -> Result<u8, Error> {
        let last = ack == Ack::Last;
        self.ctrl.set_nack(last);
        let latched = self.ctrl.read_data();
        self.phase()?;
        if last {
            self.stop();
        }
        Ok(latched)
    }

    /// Take the byte still latched after the final [`repeated_read`](Self::repeated_read).
    ///
    /// Only valid once STOP has been sent; no further byte is clocked.
    #[inline]
    pub fn drain(&mut self) -> u8 {
        self.ctrl.read_data()
    }

    /// Read `buf.len()` consecutive registers starting at `register`.
    pub fn read_burst(
        &mut self,
        device: DeviceAddress,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Error> {
        let Some(last) = buf.len().checked_sub(1) else {
            return Ok(());
        };

        self.start();
        self.read_setup(device, register)?;

        for i in 0..=last {
            let ack = if i == last { Ack::Last } else { Ack::Continue };
            let latched = self.repeated_read(ack)?;
            if i > 0 {
                buf[i - 1] = latched;
            }
        }
        buf[last] = self.drain();

        Ok(())
    }

    /// Single register read.
    pub fn read_byte(&mut self, device: DeviceAddress, register: u8) -> Result<u8, Error> {
        self.start();
        self.read_setup(device, register)?;
        let _ = self.repeated_read(Ack::Last)?;
        Ok(self.drain())
    }

    /// Single register write.
    pub fn write_byte(&mut self, device: DeviceAddress, register: u8, data: u8) -> Result<(), Error> {
        self.start();
        self.write_address_and_register(device, register)?;
        self.send(data)?;
        self.stop();
        Ok(())
    }

    /// Wait for the current phase to complete.
    ///
    /// The recovery counter restarts at zero and counts every poll that finds the flag clear. On
    /// reaching the configured limit the bus is recovered exactly once. The completion flag is
    /// cleared on every exit path.
    pub fn wait(&mut self) -> Result<Completion, Error> {
        self.lock_detect = 0;
        let started = self.clock.now();

        let outcome = loop {
            match self.ctrl.poll_transfer() {
                Ok(()) => break Ok(Completion::Acked),
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(never)) => match never {},
            }

            self.lock_detect = self.lock_detect.saturating_add(1);
            if self.limit_reached(started, self.lock_detect) {
                warn!("i2c: phase stalled after {} polls", self.lock_detect);
                break self.recover_bus().map(|()| Completion::Recovered);
            }
        };

        self.ctrl.clear_transfer_flag();
        outcome
    }

    /// Best-effort bus recovery.
    ///
    /// Clocks a dummy byte out as master so a slave holding SDA low mid-byte can release it, then
    /// cycles the master bit with the module disabled and parks the controller as an idle
    /// receiver. Returns [`Error::Fault`] if the dummy byte never completed or arbitration stayed
    /// lost.
    pub fn recover_bus(&mut self) -> Result<(), Error> {
        self.stats.recoveries = self.stats.recoveries.wrapping_add(1);

        self.ctrl.set_enabled(false);
        self.ctrl.set_transmit(true);
        self.ctrl.set_master(true);
        self.ctrl.set_enabled(true);

        self.ctrl.write_data(RECOVERY_DUMMY_BYTE);
        let flushed = self.spin_for_flag();
        self.ctrl.clear_transfer_flag();
        self.ctrl.clear_arbitration_lost();
        let stuck = self.ctrl.arbitration_lost();

        self.ctrl.set_enabled(false);
        self.ctrl.set_master(true);
        self.ctrl.set_master(false);
        self.ctrl.set_transmit(false);
        self.ctrl.set_enabled(true);

        self.ctrl.clear_transfer_flag();
        self.ctrl.clear_arbitration_lost();

        if flushed && !stuck {
            debug!("i2c: bus recovered");
            Ok(())
        } else {
            self.stats.faults = self.stats.faults.wrapping_add(1);
            error!("i2c: recovery failed, flushed={} stuck={}", flushed, stuck);
            Err(Error::Fault)
        }
    }

    fn send(&mut self, byte: u8) -> Result<(), Error> {
        self.ctrl.write_data(byte);
        self.phase()
    }

    /// Wait for a phase and apply the stall policy.
    fn phase(&mut self) -> Result<(), Error> {
        match self.wait()? {
            Completion::Acked => Ok(()),
            Completion::Recovered => match self.config.stall_policy {
                StallPolicy::Abort => Err(Error::Timeout),
                StallPolicy::Continue => Ok(()),
            },
        }
    }

    /// Flag poll used inside recovery. Bounded by the same limit as `wait`, never recurses.
    fn spin_for_flag(&mut self) -> bool {
        let started = self.clock.now();
        let mut polls: u32 = 0;
        loop {
            if self.ctrl.poll_transfer().is_ok() {
                return true;
            }
            polls = polls.saturating_add(1);
            if self.limit_reached(started, polls) {
                return false;
            }
        }
    }

    fn limit_reached(&self, started: u32, polls: u32) -> bool {
        match self.config.wait_limit {
            WaitLimit::Polls(max) => polls >= max,
            WaitLimit::Millis(ms) => elapsed(started, self.clock.now()) > ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::sim::{Event, SimClock, SimController};

    const DEV: DeviceAddress = DeviceAddress::new(0x3A);

    fn bus(ctrl: SimController) -> I2cBus<SimController, SimClock> {
        bus_with(ctrl, BusConfig::default())
    }

    fn bus_with(ctrl: SimController, config: BusConfig) -> I2cBus<SimController, SimClock> {
        let mut bus = I2cBus::new(ctrl, SimClock::new(), config);
        bus.initialize();
        bus
    }

    fn count(bus: &I2cBus<SimController, SimClock>, wanted: Event) -> usize {
        bus.controller()
            .events()
            .iter()
            .filter(|e| **e == wanted)
            .count()
    }

    #[test]
    fn address_framing() {
        let dev = DeviceAddress::from_7bit(0x1D);
        assert_eq!(dev, DEV);
        assert_eq!(dev.write(), 0x3A);
        assert_eq!(dev.read(), 0x3B);
        assert_eq!(DeviceAddress::new(0x3B).write(), 0x3A);
    }

    #[test]
    fn initialize_leaves_controller_idle() {
        let bus = bus(SimController::new());
        let sim = bus.controller();
        assert!(sim.is_idle());
        assert!(sim.high_drive());
        assert_eq!(sim.divider(), Some(Divider { mult: 0, icr: 0x10 }));
    }

    #[test]
    fn read_then_write_leaves_bus_idle() {
        let mut sim = SimController::new().with_device(DEV);
        sim.set_register(DEV, 0x2A, 0x5C);
        let mut bus = bus(sim);

        for reg in [0x01u8, 0x0D, 0x2A, 0x2D] {
            let value = bus.read_byte(DEV, reg).unwrap();
            bus.write_byte(DEV, reg, value.wrapping_add(1)).unwrap();
            assert!(bus.controller().is_idle(), "register {:#x}", reg);
        }

        assert_eq!(bus.controller().register(DEV, 0x2A), 0x5D);
        assert_eq!(count(&bus, Event::Start), 8);
        assert_eq!(count(&bus, Event::Stop), 8);
        assert_eq!(count(&bus, Event::RepeatedStart), 4);
    }

    #[test]
    fn read_byte_phase_order() {
        let mut sim = SimController::new().with_device(DEV);
        sim.set_register(DEV, 0x0D, 0x1A);
        let mut bus = bus(sim);

        assert_eq!(bus.read_byte(DEV, 0x0D), Ok(0x1A));
        assert_eq!(
            bus.controller().events(),
            &[
                Event::Start,
                Event::Tx(0x3A),
                Event::Tx(0x0D),
                Event::RepeatedStart,
                Event::Tx(0x3B),
                Event::AckPolicy { nack: true },
                Event::Rx {
                    byte: 0x1A,
                    nack: true
                },
                Event::Stop,
            ]
        );
    }

    #[test]
    fn write_byte_phase_order() {
        let mut bus = bus(SimController::new().with_device(DEV));

        bus.write_byte(DEV, 0x2A, 0x01).unwrap();

        assert_eq!(
            bus.controller().events(),
            &[
                Event::Start,
                Event::Tx(0x3A),
                Event::Tx(0x2A),
                Event::Tx(0x01),
                Event::Stop,
            ]
        );
        assert_eq!(bus.controller().register(DEV, 0x2A), 0x01);
    }

    fn burst_of(n: usize) -> (I2cBus<SimController, SimClock>, [u8; 6]) {
        let mut sim = SimController::new().with_device(DEV);
        for (i, v) in [0x11u8, 0x22, 0x33, 0x44, 0x55, 0x66].iter().enumerate() {
            sim.set_register(DEV, 0x01 + i as u8, *v);
        }
        let mut bus = bus(sim);
        let mut buf = [0u8; 6];
        bus.read_burst(DEV, 0x01, &mut buf[..n]).unwrap();
        (bus, buf)
    }

    #[test]
    fn burst_of_six_acks_all_but_last() {
        let (bus, buf) = burst_of(6);

        assert_eq!(buf, [0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        assert_eq!(count(&bus, Event::AckPolicy { nack: false }), 5);
        assert_eq!(count(&bus, Event::AckPolicy { nack: true }), 1);
        assert_eq!(count(&bus, Event::Rx { byte: 0x66, nack: true }), 1);
        assert_eq!(count(&bus, Event::Stop), 1);
        assert_eq!(bus.controller().events().last(), Some(&Event::Stop));
        assert!(bus.controller().is_idle());
    }

    #[test]
    fn burst_of_one_is_a_single_nack() {
        let (bus, buf) = burst_of(1);

        assert_eq!(buf[0], 0x11);
        assert_eq!(count(&bus, Event::AckPolicy { nack: false }), 0);
        assert_eq!(count(&bus, Event::AckPolicy { nack: true }), 1);
        assert_eq!(count(&bus, Event::Stop), 1);
        assert!(bus.controller().is_idle());
    }

    #[test]
    fn empty_burst_touches_nothing() {
        let mut bus = bus(SimController::new().with_device(DEV));
        bus.read_burst(DEV, 0x01, &mut []).unwrap();
        assert!(bus.controller().events().is_empty());
    }

    #[test]
    fn repeated_read_returns_previously_latched_byte() {
        let mut sim = SimController::new().with_device(DEV);
        sim.set_register(DEV, 0x01, 0xA1);
        sim.set_register(DEV, 0x02, 0xB2);
        let mut bus = bus(sim);

        bus.start();
        bus.read_setup(DEV, 0x01).unwrap();
        // Still holding the read address from the address phase.
        assert_eq!(bus.repeated_read(Ack::Continue), Ok(0x3B));
        assert_eq!(bus.repeated_read(Ack::Last), Ok(0xA1));
        assert_eq!(bus.drain(), 0xB2);
        assert!(bus.controller().is_idle());
    }

    #[test]
    fn wait_resets_counter_and_recovers_once_at_ceiling() {
        let mut bus = bus(SimController::new().with_device(DEV));

        bus.start();
        bus.controller_mut().stall(1);
        bus.controller_mut().write_data(DEV.write());
        assert_eq!(bus.wait(), Ok(Completion::Recovered));
        assert_eq!(bus.lock_detect(), RECOVERY_CEILING);
        assert_eq!(bus.stats().recoveries, 1);
        assert!(bus.controller().is_idle());

        // A clean phase: counter starts over and no further recovery.
        bus.start();
        bus.controller_mut().write_data(DEV.write());
        assert_eq!(bus.wait(), Ok(Completion::Acked));
        assert_eq!(bus.lock_detect(), 0);
        assert_eq!(bus.stats().recoveries, 1);
        assert!(!bus.controller().transfer_flag());
    }

    #[test]
    fn custom_poll_ceiling_is_honoured() {
        let config = BusConfig::default().with_wait_limit(WaitLimit::Polls(7));
        let mut bus = bus_with(SimController::new().with_device(DEV), config);

        bus.start();
        bus.controller_mut().stall(1);
        bus.controller_mut().write_data(DEV.write());
        assert_eq!(bus.wait(), Ok(Completion::Recovered));
        assert_eq!(bus.lock_detect(), 7);
        assert_eq!(bus.stats().recoveries, 1);
    }

    #[test]
    fn millisecond_limit_uses_tick_source() {
        let config = BusConfig::default().with_wait_limit(WaitLimit::Millis(3));
        let clock = SimClock::new().with_step(1);
        let mut bus = I2cBus::new(SimController::new().with_device(DEV), clock.clone(), config);
        bus.initialize();

        bus.start();
        bus.controller_mut().stall(1);
        bus.controller_mut().write_data(DEV.write());
        let before = clock.peek();
        assert_eq!(bus.wait(), Ok(Completion::Recovered));
        assert!(clock.peek() - before > 3);
        assert_eq!(bus.stats().recoveries, 1);
    }

    #[test]
    fn stalled_phase_aborts_transaction_by_default() {
        let mut sim = SimController::new().with_device(DEV);
        sim.stall(1);
        let mut bus = bus(sim);

        assert_eq!(bus.read_byte(DEV, 0x0D), Err(Error::Timeout));
        assert_eq!(bus.stats().recoveries, 1);
        assert!(bus.controller().is_idle());

        // The next transaction goes through normally.
        bus.controller_mut().set_register(DEV, 0x0D, 0x1A);
        assert_eq!(bus.read_byte(DEV, 0x0D), Ok(0x1A));
    }

    #[test]
    fn continue_policy_masks_the_stall() {
        let config = BusConfig::default().with_stall_policy(StallPolicy::Continue);
        let mut sim = SimController::new().with_device(DEV);
        sim.stall(1);
        let mut bus = bus_with(sim, config);

        // The transaction "succeeds" with whatever the recovery left behind.
        let value = bus.read_byte(DEV, 0x0D);
        assert!(value.is_ok());
        assert!(bus.stats().recoveries > 1);
        assert_eq!(bus.stats().faults, 0);
        assert!(bus.controller().is_idle());
    }

    #[test]
    fn wedged_bus_reports_fault() {
        let mut bus = bus(SimController::new().with_device(DEV));
        bus.controller_mut().wedge();

        assert_eq!(bus.write_byte(DEV, 0x2A, 0x01), Err(Error::Fault));
        assert_eq!(bus.stats().recoveries, 1);
        assert_eq!(bus.stats().faults, 1);
        assert!(!bus.controller().transfer_flag());
    }

    #[test]
    fn recovery_is_idempotent() {
        let mut bus = bus(SimController::new().with_device(DEV));

        bus.recover_bus().unwrap();
        let once = bus.controller().snapshot();
        bus.recover_bus().unwrap();
        let twice = bus.controller().snapshot();

        assert_eq!(once, twice);
        assert!(bus.controller().is_idle());
        assert_eq!(bus.stats().recoveries, 2);
    }

    #[test]
    fn recovery_clocks_dummy_byte_without_start_or_stop() {
        let mut bus = bus(SimController::new().with_device(DEV));
        bus.recover_bus().unwrap();
        assert_eq!(bus.controller().events(), &[Event::Tx(0xFF)]);
    }

    #[test]
    fn error_display() {
        assert_eq!(Error::Timeout.to_string(), "i2c phase timed out, bus recovered");
        assert_eq!(Error::Fault.to_string(), "i2c bus fault, recovery failed");
    }
}
