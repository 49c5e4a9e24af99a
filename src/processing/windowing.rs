// src/processing/windowing.rs
//! Movement-window selection and activation statistics

use crate::error::{EmgError, EmgResult};
use serde::{Deserialize, Serialize};

/// Inclusive time range of the movement, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementWindow {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl MovementWindow {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn contains(&self, time_ms: u64) -> bool {
        self.start_ms <= time_ms && time_ms <= self.end_ms
    }

    fn empty_error(&self) -> EmgError {
        EmgError::EmptyWindow {
            channel: None,
            start_ms: self.start_ms,
            end_ms: self.end_ms,
        }
    }
}

/// Envelope statistics inside the movement window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivationFeatures {
    /// Mean envelope value
    pub avg: f64,
    /// Maximum envelope value
    pub peak: f64,
    /// Number of valid samples aggregated
    pub samples: usize,
}

/// Aggregate the envelope samples whose timestamp lies in `window`.
///
/// Non-finite values are treated as undefined and skipped. Fails with
/// `EmptyWindow` (no channel attached) when nothing valid remains.
pub fn extract(envelope: &[f64], timestamps: &[u64], window: &MovementWindow) -> EmgResult<ActivationFeatures> {
    let mut sum = 0.0;
    let mut peak = f64::NEG_INFINITY;
    let mut count = 0usize;

    for (&time_ms, &value) in timestamps.iter().zip(envelope) {
        if !window.contains(time_ms) || !value.is_finite() {
            continue;
        }
        sum += value;
        peak = peak.max(value);
        count += 1;
    }

    if count == 0 {
        return Err(window.empty_error());
    }

    Ok(ActivationFeatures {
        avg: sum / count as f64,
        peak,
        samples: count,
    })
}
