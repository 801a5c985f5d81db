// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Activity tracker loop: sample, detect, render.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::control::step::{StepConfig, StepDetector};
use crate::drivers::hd44780::{Hd44780, Line};
use crate::drivers::mma8451::{self, Baseline, Mma8451};
use crate::hw::i2c::{BusController, I2cBus};
use crate::hw::tick::Clock;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackerConfig {
    /// Delay at the end of every cycle.
    pub sample_period_ms: u32,
    pub calibration_samples: u32,
    pub stride_cm: u32,
    /// Pause after calibration before the splash screen.
    pub settle_ms: u32,
    /// How long each splash screen stays up.
    pub splash_ms: u32,
    pub step: StepConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sample_period_ms: 100,
            calibration_samples: mma8451::CALIBRATION_SAMPLES,
            stride_cm: 41,
            settle_ms: 1000,
            splash_ms: 2000,
            step: StepConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn with_sample_period(mut self, ms: u32) -> Self {
        self.sample_period_ms = ms;
        self
    }

    pub fn with_calibration_samples(mut self, n: u32) -> Self {
        self.calibration_samples = n;
        self
    }

    pub fn with_stride(mut self, cm: u32) -> Self {
        self.stride_cm = cm;
        self
    }

    pub fn with_splash(mut self, settle_ms: u32, splash_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self.splash_ms = splash_ms;
        self
    }

    pub fn with_step(mut self, step: StepConfig) -> Self {
        self.step = step;
        self
    }
}

/// What the display shows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Metrics {
    pub steps: u32,
    /// Whole metres walked.
    pub distance_m: u32,
    /// One per two metres.
    pub calories: u32,
}

impl Metrics {
    pub fn from_steps(steps: u32, stride_cm: u32) -> Self {
        let distance_m = (u64::from(steps) * u64::from(stride_cm) / 100) as u32;
        Self {
            steps,
            distance_m,
            calories: distance_m / 2,
        }
    }
}

pub struct Tracker<B, C, P> {
    bus: I2cBus<B, C>,
    sensor: Mma8451,
    detector: StepDetector,
    lcd: Hd44780<P, C>,
    clock: C,
    config: TrackerConfig,
    baseline: Baseline,
    metrics: Metrics,
}

impl<B, C, P> Tracker<B, C, P>
where
    B: BusController,
    C: Clock + DelayNs,
    P: OutputPin,
{
    pub fn new(
        bus: I2cBus<B, C>,
        sensor: Mma8451,
        lcd: Hd44780<P, C>,
        clock: C,
        config: TrackerConfig,
    ) -> Self {
        Self {
            bus,
            sensor,
            detector: StepDetector::new(config.step),
            lcd,
            clock,
            config,
            baseline: Baseline::default(),
            metrics: Metrics::default(),
        }
    }

    /// Bring up the bus, check and start the sensor, then initialize the display.
    pub fn init(&mut self) -> Result<(), mma8451::Error> {
        self.bus.initialize();
        self.sensor.verify(&mut self.bus)?;
        self.sensor.configure(&mut self.bus)?;
        self.lcd.init();
        info!("tracker: sensor up at {=u8:#x}", self.sensor.address().write());
        Ok(())
    }

    /// Measure the rest baseline. The device must be still.
    pub fn calibrate(&mut self) -> Result<Baseline, mma8451::Error> {
        self.baseline = self
            .sensor
            .calibrate(&mut self.bus, self.config.calibration_samples)?;
        self.clock.delay(self.config.settle_ms);
        Ok(self.baseline)
    }

    pub fn splash(&mut self) {
        self.lcd.write_str("Fitness Track", Line::First);
        self.lcd.write_str("Use mma8451", Line::Second);
        self.clock.delay(self.config.splash_ms);
        self.lcd.clear();

        self.lcd.write_str("Fitness Track", Line::First);
        self.clock.delay(self.config.splash_ms);
        self.lcd.clear();
    }

    /// One sample period. A failed read skips detection and rendering but still waits out the
    /// period.
    pub fn run_cycle(&mut self) -> Result<Metrics, mma8451::Error> {
        let result = self.step();
        if let Err(e) = result {
            warn!("tracker: cycle skipped: {}", e);
        }
        self.clock.delay(self.config.sample_period_ms);
        result
    }

    fn step(&mut self) -> Result<Metrics, mma8451::Error> {
        let sample = self.sensor.read_sample(&mut self.bus)?;
        if self.detector.update(sample, &self.baseline) {
            self.metrics = Metrics::from_steps(self.detector.count(), self.config.stride_cm);
        }

        self.lcd
            .write_labeled("distance:", self.metrics.distance_m, Line::First);
        self.lcd
            .write_labeled("calorie", self.metrics.calories, Line::Second);

        Ok(self.metrics)
    }

    #[inline]
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    #[inline]
    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    #[inline]
    pub fn bus(&self) -> &I2cBus<B, C> {
        &self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut I2cBus<B, C> {
        &mut self.bus
    }
}
