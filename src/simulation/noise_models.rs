//! Noise sources for simulated recordings
//! Location: src/simulation/noise_models.rs

use super::config::NoiseConfig;
use rand::Rng;
use std::f64::consts::PI;

/// Additive interference: Gaussian floor, powerline hum and DC offset
pub struct NoiseModel {
    config: NoiseConfig,
    powerline_phase: f64,
}

impl NoiseModel {
    pub fn new<R: Rng>(config: &NoiseConfig, rng: &mut R) -> Self {
        Self {
            config: config.clone(),
            powerline_phase: rng.gen::<f64>() * 2.0 * PI,
        }
    }

    /// Noise to add at time `t_s` seconds
    pub fn sample<R: Rng>(&self, t_s: f64, rng: &mut R) -> f64 {
        let thermal = gaussian(rng) * self.config.baseline_rms;
        let powerline = self.config.powerline_amplitude
            * (2.0 * PI * self.config.powerline_hz * t_s + self.powerline_phase).sin();
        thermal + powerline + self.config.dc_offset
    }
}

/// Standard normal draw via Box-Muller
pub fn gaussian<R: Rng>(rng: &mut R) -> f64 {
    // 1 - [0, 1) keeps the logarithm finite
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
