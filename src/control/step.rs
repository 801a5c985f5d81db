// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hysteresis step detector.
//!
//! Works on the magnitude of the baseline-corrected acceleration vector, smoothed with a two-tap
//! average. A step is counted when the average rises above `upper`; the detector re-arms once the
//! average moves by more than `delta` between consecutive samples.

use crate::drivers::mma8451::{Baseline, Sample};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepConfig {
    /// Smoothed magnitude above which a step is registered.
    pub upper: u32,
    /// Sample-to-sample change in the smoothed magnitude that re-arms the detector.
    pub delta: u32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            upper: 2000,
            delta: 700,
        }
    }
}

impl StepConfig {
    pub fn with_upper(mut self, upper: u32) -> Self {
        self.upper = upper;
        self
    }

    pub fn with_delta(mut self, delta: u32) -> Self {
        self.delta = delta;
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepState {
    Idle,
    StepRegistered,
}

pub struct StepDetector {
    config: StepConfig,
    state: StepState,
    prev_magnitude: u32,
    prev_average: u32,
    count: u32,
}

impl StepDetector {
    pub fn new(config: StepConfig) -> Self {
        Self {
            config,
            state: StepState::Idle,
            prev_magnitude: 0,
            prev_average: 0,
            count: 0,
        }
    }

    /// Clear the count and history.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn state(&self) -> StepState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    /// Feed one accelerometer sample. Returns `true` if it completed a step.
    pub fn update(&mut self, sample: Sample, baseline: &Baseline) -> bool {
        self.update_magnitude(magnitude(sample, baseline))
    }

    /// Feed a precomputed magnitude. Returns `true` if it completed a step.
    pub fn update_magnitude(&mut self, magnitude: u32) -> bool {
        let average = ((u64::from(magnitude) + u64::from(self.prev_magnitude)) / 2) as u32;
        let prev_average = self.prev_average;
        self.prev_magnitude = magnitude;
        self.prev_average = average;

        // One transition per sample, so the rising edge that counts a step can't also re-arm.
        match self.state {
            StepState::Idle if average > self.config.upper => {
                self.state = StepState::StepRegistered;
                self.count = self.count.wrapping_add(1);
                debug!("step: count={} avg={}", self.count, average);
                true
            }
            StepState::StepRegistered if average.abs_diff(prev_average) > self.config.delta => {
                self.state = StepState::Idle;
                false
            }
            _ => false,
        }
    }
}

/// Euclidean distance of `sample` from `baseline`, truncated.
pub fn magnitude(sample: Sample, baseline: &Baseline) -> u32 {
    let dx = i64::from(sample.x) - i64::from(baseline.x);
    let dy = i64::from(sample.y) - i64::from(baseline.y);
    let dz = i64::from(sample.z) - i64::from(baseline.z);
    isqrt((dx * dx + dy * dy + dz * dz) as u64) as u32
}

/// Floor of the square root.
fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let mut x = n / 2 + 1;
    let mut y = (x + n / x) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
