//! Simulation configuration structures
//! Location: src/simulation/config.rs

use crate::config::constants::{movement, muscles, signal};
use crate::error::{EmgError, EmgResult};
use serde::{Deserialize, Serialize};

/// Millisecond timestamps cap the rate that keeps them strictly increasing
pub const MAX_SIMULATION_RATE_HZ: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecordingConfig {
    pub sampling_hz: f64,
    pub duration_ms: u64,
    pub seed: u64,
    pub burst: BurstConfig,
    pub muscles: Vec<MuscleProfile>,
    pub noise: NoiseConfig,
}

/// Movement burst shared by all muscles
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BurstConfig {
    pub start_ms: u64,
    pub end_ms: u64,
    /// Raised-cosine ramp at both ends of the burst
    pub ramp_ms: u64,
    /// Carrier components; must lie inside the analysis band
    pub carrier_hz: Vec<f64>,
}

/// Activation gain per side; the burst RMS equals the gain
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MuscleProfile {
    pub name: String,
    pub left_gain: f64,
    pub right_gain: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NoiseConfig {
    /// RMS of the white Gaussian floor present over the whole recording
    pub baseline_rms: f64,
    pub powerline_hz: f64,
    /// Zero disables powerline interference
    pub powerline_amplitude: f64,
    pub dc_offset: f64,
}

impl MuscleProfile {
    pub fn new(name: &str, left_gain: f64, right_gain: f64) -> Self {
        Self {
            name: name.to_string(),
            left_gain,
            right_gain,
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            sampling_hz: signal::DEFAULT_SAMPLING_HZ,
            duration_ms: 5000,
            seed: 42,
            burst: BurstConfig::default(),
            muscles: muscles::HIP_FLEXORS
                .iter()
                .map(|name| MuscleProfile::new(name, 1.0, 1.0))
                .collect(),
            noise: NoiseConfig::default(),
        }
    }
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            start_ms: movement::DEFAULT_START_MS,
            end_ms: movement::DEFAULT_END_MS,
            ramp_ms: 50,
            carrier_hz: vec![47.0, 73.0, 101.0, 131.0, 163.0, 197.0],
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            baseline_rms: 0.01,
            powerline_hz: 50.0,
            powerline_amplitude: 0.0,
            dc_offset: 0.0,
        }
    }
}

impl RecordingConfig {
    pub fn with_muscles(mut self, muscles: Vec<MuscleProfile>) -> Self {
        self.muscles = muscles;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_powerline(mut self, amplitude: f64) -> Self {
        self.noise.powerline_amplitude = amplitude;
        self
    }

    pub fn with_dc_offset(mut self, offset: f64) -> Self {
        self.noise.dc_offset = offset;
        self
    }

    pub fn validate(&self) -> EmgResult<()> {
        if !(self.sampling_hz >= signal::MIN_SAMPLING_HZ && self.sampling_hz <= MAX_SIMULATION_RATE_HZ) {
            return Err(EmgError::configuration(
                "simulation",
                format!(
                    "sampling_hz must be within {}-{} Hz, got {}",
                    signal::MIN_SAMPLING_HZ,
                    MAX_SIMULATION_RATE_HZ,
                    self.sampling_hz
                ),
            ));
        }
        if self.duration_ms == 0 {
            return Err(EmgError::configuration("simulation", "duration_ms must be positive"));
        }
        if self.muscles.is_empty() {
            return Err(EmgError::configuration("simulation", "no muscles configured"));
        }
        if self.burst.carrier_hz.is_empty() {
            return Err(EmgError::configuration("simulation", "carrier has no components"));
        }
        let nyquist = self.sampling_hz / 2.0;
        if let Some(freq) = self.burst.carrier_hz.iter().find(|f| !(**f > 0.0 && **f < nyquist)) {
            return Err(EmgError::configuration(
                "simulation",
                format!("carrier component {} Hz outside (0, {}) Hz", freq, nyquist),
            ));
        }
        for muscle in &self.muscles {
            if !(muscle.left_gain >= 0.0 && muscle.right_gain >= 0.0) {
                return Err(EmgError::configuration(
                    "simulation",
                    format!("gains for '{}' must be non-negative", muscle.name),
                ));
            }
        }
        Ok(())
    }
}
