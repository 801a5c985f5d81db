// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! ## Modules
//!
//! - [`step`] - Hysteresis step detector over the acceleration magnitude.
//! - [`tracker`] - Sample, detect and render loop for the activity tracker.

pub mod step;
pub mod tracker;

pub use step::{StepConfig, StepDetector};
pub use tracker::{Metrics, Tracker, TrackerConfig};
