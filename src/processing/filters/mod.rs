// src/processing/filters/mod.rs
//! Digital filters for EMG signal conditioning

pub mod iir;
pub mod zero_phase;

pub use iir::BandpassFilter;
pub use zero_phase::filtfilt;

use crate::config::constants::filters::{MAX_FILTER_ORDER, MIN_FILTER_ORDER};
use crate::error::{EmgError, EmgResult};
use serde::{Deserialize, Serialize};

/// Bandpass design parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandpassSpec {
    pub low_hz: f64,
    pub high_hz: f64,
    pub sampling_hz: f64,
    /// Prototype order; the bandpass has `2 * order` poles
    pub order: usize,
}

impl BandpassSpec {
    pub fn nyquist_hz(&self) -> f64 {
        self.sampling_hz / 2.0
    }

    /// Check `0 < low < high < fs/2` and the order range
    pub fn validate(&self) -> EmgResult<()> {
        let reject = |reason: String| EmgError::InvalidFilterSpec {
            low_hz: self.low_hz,
            high_hz: self.high_hz,
            sampling_hz: self.sampling_hz,
            order: self.order,
            reason,
        };

        if !(self.sampling_hz.is_finite() && self.sampling_hz > 0.0) {
            return Err(reject("sampling frequency must be positive".to_string()));
        }
        if !(self.low_hz.is_finite() && self.low_hz > 0.0) {
            return Err(reject("low cutoff must be positive".to_string()));
        }
        if !(self.high_hz.is_finite() && self.high_hz > self.low_hz) {
            return Err(reject("high cutoff must exceed low cutoff".to_string()));
        }
        if self.high_hz >= self.nyquist_hz() {
            return Err(reject(format!("high cutoff must be below Nyquist ({} Hz)", self.nyquist_hz())));
        }
        if !(MIN_FILTER_ORDER..=MAX_FILTER_ORDER).contains(&self.order) {
            return Err(reject(format!("order must be {}-{}", MIN_FILTER_ORDER, MAX_FILTER_ORDER)));
        }
        Ok(())
    }
}

/// Biquad coefficients, `a[0]` normalised to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondOrderSection {
    pub b: [f64; 3],
    pub a: [f64; 3],
}

impl SecondOrderSection {
    /// DC gain `H(1)`
    pub fn dc_gain(&self) -> f64 {
        (self.b[0] + self.b[1] + self.b[2]) / (self.a[0] + self.a[1] + self.a[2])
    }

    /// Transposed direct form II state after a unit step has settled
    pub fn step_state(&self) -> [f64; 2] {
        let gain = self.dc_gain();
        let z2 = self.b[2] - self.a[2] * gain;
        let z1 = self.b[1] - self.a[1] * gain + z2;
        [z1, z2]
    }

    /// Run the section over `data` in place, starting from `state`
    pub fn process_in_place(&self, data: &mut [f64], mut state: [f64; 2]) {
        let [b0, b1, b2] = self.b;
        let [_, a1, a2] = self.a;
        for sample in data.iter_mut() {
            let x = *sample;
            let y = b0 * x + state[0];
            state[0] = b1 * x - a1 * y + state[1];
            state[1] = b2 * x - a2 * y;
            *sample = y;
        }
    }
}

/// Design and apply a zero-phase Butterworth bandpass in one call
pub fn bandpass_filter(raw_samples: &[f64], spec: &BandpassSpec) -> EmgResult<Vec<f64>> {
    let filter = BandpassFilter::design(spec)?;
    Ok(filter.apply(raw_samples))
}
