// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use cortex_m_rt::{entry, exception};
use defmt_rtt as _;
use panic_halt as _;

use fittrack::control::{Tracker, TrackerConfig};
use fittrack::drivers::{Hd44780, Mma8451};
use fittrack::hw::i2c::{BusConfig, WaitLimit};
use fittrack::hw::{tick, I2c0, I2cBus, LcdPins, SysTickClock};

/// Cycles between bus statistics dumps.
const STATS_EVERY: u32 = 100;

#[entry]
fn main() -> ! {
    tick::configure_core_clock();

    // Peripherals
    let cp = cortex_m::Peripherals::take().unwrap();
    let clock = SysTickClock::start(cp.SYST);

    // I2C0 (PTE24 SCL, PTE25 SDA)
    let i2c0 = I2c0::take().unwrap();
    let bus_cfg = BusConfig::default().with_wait_limit(WaitLimit::Millis(2));
    let bus = I2cBus::new(i2c0, clock, bus_cfg);

    // LCD (port C)
    let pins = LcdPins::configure();
    let lcd = Hd44780::new(
        pins.rs,
        pins.rw,
        pins.en,
        [pins.d4, pins.d5, pins.d6, pins.d7],
        clock,
    );

    let mut tracker = Tracker::new(
        bus,
        Mma8451::default(),
        lcd,
        clock,
        TrackerConfig::default(),
    );

    if let Err(e) = tracker.init() {
        defmt::error!("init failed: {}", e);
        loop {
            cortex_m::asm::nop();
        }
    }

    if let Err(e) = tracker.calibrate() {
        defmt::warn!("calibration failed, using zero baseline: {}", e);
    }
    tracker.splash();

    let mut cycles: u32 = 0;
    loop {
        // Failures are logged inside; the next cycle retries.
        let _ = tracker.run_cycle();

        cycles = cycles.wrapping_add(1);
        if cycles % STATS_EVERY == 0 {
            defmt::info!("{} {}", tracker.metrics(), tracker.bus().stats());
        }
    }
}

#[exception]
fn SysTick() {
    SysTickClock::on_tick();
}
