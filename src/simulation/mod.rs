//! Simulated bilateral recordings for demos, tests and benchmarks

pub mod config;
pub mod noise_models;
pub mod signal_generator;

pub use config::{BurstConfig, MuscleProfile, NoiseConfig, RecordingConfig};
pub use signal_generator::RecordingGenerator;
