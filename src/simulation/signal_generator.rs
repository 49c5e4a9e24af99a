//! Deterministic bilateral EMG recordings
//! Location: src/simulation/signal_generator.rs

use super::config::{BurstConfig, RecordingConfig};
use super::noise_models::NoiseModel;
use crate::acquisition::table::{ChannelName, Column, SampleTable, Side};
use crate::error::EmgResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use tracing::debug;

/// Generates sample tables from a [`RecordingConfig`].
///
/// The same configuration and seed always give the same table. Channels are
/// emitted as `<muscle>_left`, `<muscle>_right` in muscle order.
#[derive(Debug, Clone)]
pub struct RecordingGenerator {
    config: RecordingConfig,
}

impl RecordingGenerator {
    pub fn new(config: RecordingConfig) -> EmgResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RecordingConfig {
        &self.config
    }

    pub fn generate(&self) -> EmgResult<SampleTable> {
        let config = &self.config;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let n = (config.duration_ms as f64 * config.sampling_hz / 1000.0).round() as usize;
        let time_ms: Vec<u64> = (0..n)
            .map(|i| (i as f64 * 1000.0 / config.sampling_hz).round() as u64)
            .collect();
        let burst_gate: Vec<f64> = time_ms.iter().map(|&t| burst_gate(&config.burst, t)).collect();

        let mut columns = Vec::with_capacity(config.muscles.len() * 2);
        for muscle in &config.muscles {
            for (side, gain) in [(Side::Left, muscle.left_gain), (Side::Right, muscle.right_gain)] {
                let channel = ChannelName::new(&muscle.name, side);
                let values = self.channel_values(&time_ms, &burst_gate, gain, &mut rng);
                columns.push(Column {
                    name: channel.to_string(),
                    values,
                });
            }
        }

        debug!(
            rows = n,
            channels = columns.len(),
            seed = config.seed,
            "Generated simulated recording"
        );
        SampleTable::new(time_ms, columns)
    }

    fn channel_values(&self, time_ms: &[u64], gate: &[f64], gain: f64, rng: &mut StdRng) -> Vec<f64> {
        let carrier_hz = &self.config.burst.carrier_hz;
        // Equal-amplitude components with unit total RMS
        let amplitude = (2.0 / carrier_hz.len() as f64).sqrt();
        let phases: Vec<f64> = carrier_hz.iter().map(|_| rng.gen::<f64>() * 2.0 * PI).collect();
        let noise = NoiseModel::new(&self.config.noise, rng);

        time_ms
            .iter()
            .zip(gate)
            .map(|(&t, &g)| {
                let t_s = t as f64 / 1000.0;
                let carrier: f64 = carrier_hz
                    .iter()
                    .zip(&phases)
                    .map(|(f, phase)| amplitude * (2.0 * PI * f * t_s + phase).sin())
                    .sum();
                gain * g * carrier + noise.sample(t_s, rng)
            })
            .collect()
    }
}

/// Burst amplitude in [0, 1] with raised-cosine ramps
fn burst_gate(burst: &BurstConfig, t: u64) -> f64 {
    if t < burst.start_ms || t > burst.end_ms {
        return 0.0;
    }
    let ramp = burst.ramp_ms as f64;
    if ramp <= 0.0 {
        return 1.0;
    }
    let from_edge = (t - burst.start_ms).min(burst.end_ms - t) as f64;
    if from_edge >= ramp {
        1.0
    } else {
        0.5 - 0.5 * (PI * from_edge / ramp).cos()
    }
}
