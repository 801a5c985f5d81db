// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Millisecond tick source.
//!
//! SysTick runs from the external reference (core clock / 16) and fires every millisecond. The
//! exception handler in `main.rs` calls [`SysTickClock::on_tick`], which is the only code that
//! touches the counter from interrupt context.

use core::cell::Cell;

use cortex_m::peripheral::{syst::SystClkSource, SYST};
use critical_section::Mutex;
use embedded_hal::delay::DelayNs;

use crate::hw::reg;

/// Core clock after the board clock setup.
pub const CORE_CLOCK_HZ: u32 = 48_000_000;

/// SysTick external reference on the KL25Z.
const SYSTICK_REF_HZ: u32 = CORE_CLOCK_HZ / 16;

/// Core /1, bus and flash /2.
const CLKDIV1_OUTDIV4_2: u32 = 1 << 16;

static TICKS: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

/// Monotonic millisecond time plus a blocking delay.
pub trait Clock {
    /// Milliseconds since start-up. Wraps after ~49 days.
    fn now(&self) -> u32;

    /// Block for at least `ms` milliseconds.
    fn delay(&mut self, ms: u32);
}

/// Disable the COP watchdog and bring the core up to [`CORE_CLOCK_HZ`].
///
/// Stays in FEI mode: the FLL is switched to DMX32 mid-range, 1464 x the 32.768 kHz slow IRC.
pub fn configure_core_clock() {
    reg::write32(reg::SIM_COPC, 0);
    reg::write32(reg::SIM_CLKDIV1, CLKDIV1_OUTDIV4_2);

    let c4 = reg::read8(reg::MCG_C4) & !(reg::MCG_C4_DMX32 | reg::MCG_C4_DRST_DRS_MASK);
    reg::write8(reg::MCG_C4, c4 | reg::MCG_C4_DMX32 | reg::MCG_C4_DRST_DRS_MID);
}

/// Milliseconds elapsed from `since` to `now`, tolerant of counter wrap.
#[inline]
pub fn elapsed(since: u32, now: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Handle to the SysTick-driven millisecond counter.
///
/// Obtaining one consumes `SYST`, so there is only ever one configured tick source. The handle
/// itself is `Copy` and can be shared between the bus engine, the LCD and the control loop.
#[derive(Copy, Clone)]
pub struct SysTickClock {
    _private: (),
}

impl SysTickClock {
    /// Configure SysTick for a 1 ms period and start counting.
    pub fn start(mut syst: SYST) -> Self {
        syst.set_clock_source(SystClkSource::External);
        syst.set_reload(SYSTICK_REF_HZ / 1_000 - 1);
        syst.clear_current();
        syst.enable_interrupt();
        syst.enable_counter();

        Self { _private: () }
    }

    /// Advance the counter by one tick. Call from the SysTick exception only.
    #[inline]
    pub fn on_tick() {
        critical_section::with(|cs| {
            let ticks = TICKS.borrow(cs);
            ticks.set(ticks.get().wrapping_add(1));
        });
    }

    #[inline]
    fn ticks() -> u32 {
        critical_section::with(|cs| TICKS.borrow(cs).get())
    }
}

impl Clock for SysTickClock {
    #[inline]
    fn now(&self) -> u32 {
        Self::ticks()
    }

    fn delay(&mut self, ms: u32) {
        let start = Self::ticks();
        // `<=` so a partial first tick never counts as a whole millisecond.
        while elapsed(start, Self::ticks()) <= ms {
            cortex_m::asm::nop();
        }
    }
}

impl DelayNs for SysTickClock {
    fn delay_ns(&mut self, ns: u32) {
        Clock::delay(self, ns.div_ceil(1_000_000));
    }

    fn delay_us(&mut self, us: u32) {
        Clock::delay(self, us.div_ceil(1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        Clock::delay(self, ms);
    }
}
