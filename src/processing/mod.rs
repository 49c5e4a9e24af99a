// src/processing/mod.rs
//! Signal processing pipeline for EMG symmetry analysis

pub mod asymmetry;
pub mod envelope;
pub mod filters;
pub mod pipeline;
pub mod windowing;

pub use asymmetry::{FeatureMapping, InclusionRule, MuscleScore, ScoringPolicy};
pub use envelope::{rectify, rms_envelope};
pub use filters::{bandpass_filter, BandpassFilter, BandpassSpec};
pub use pipeline::{ChannelFeatures, FeatureReport, PipelineOutput, SymmetryPipeline};
pub use windowing::{extract, ActivationFeatures, MovementWindow};
