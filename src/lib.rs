//! EMG-Symmetry: bilateral symmetry features from surface EMG recordings
//!
//! Raw left/right muscle channels are bandpass filtered without phase
//! distortion, rectified, smoothed into an RMS activation envelope and
//! reduced to activation statistics over a movement window. Paired channels
//! are then scored for left/right asymmetry and dominance.
//!
//! - Zero-phase Butterworth bandpass (cascaded biquads, forward-backward)
//! - Centered rolling RMS envelope with edge-clipped windows
//! - Magnitude asymmetry and thresholded dominance scoring policies
//! - Layered TOML configuration with environment overrides
//! - CSV and line-streamed acquisition, plus a seeded simulator
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use emg_symmetry::config::AnalysisConfig;
//! use emg_symmetry::processing::SymmetryPipeline;
//! use emg_symmetry::simulation::{MuscleProfile, RecordingConfig, RecordingGenerator};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let recording = RecordingConfig::default().with_muscles(vec![
//!         MuscleProfile::new("iliacus", 1.0, 2.0),
//!         MuscleProfile::new("psoas", 1.0, 1.0),
//!     ]);
//!     let table = RecordingGenerator::new(recording)?.generate()?;
//!
//!     let pipeline = SymmetryPipeline::new(&AnalysisConfig::hip_flexor_report())?;
//!     let output = pipeline.run(&table)?;
//!     println!("{}", output.mapping.to_json_pretty()?);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod acquisition;
pub mod config;
pub mod error;
pub mod insight;
pub mod processing;
pub mod simulation;

// Re-export commonly used types for convenience
pub use acquisition::{MusclePairing, SampleTable, Side};
pub use config::{AnalysisConfig, ConfigLoader};
pub use error::{EmgError, EmgResult, ProcessingStage};
pub use processing::{
    FeatureMapping, FeatureReport, InclusionRule, MovementWindow, PipelineOutput, ScoringPolicy, SymmetryPipeline,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Bilateral EMG symmetry feature extraction".to_string(),
        features: vec![
            "Zero-phase Butterworth bandpass".to_string(),
            "RMS activation envelope".to_string(),
            "Magnitude and dominance asymmetry scoring".to_string(),
            "Layered configuration management".to_string(),
            "Seeded recording simulator".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        let info = version_info();
        assert_eq!(info.name, NAME);
        assert_eq!(info.version, VERSION);
        assert!(!info.features.is_empty());
    }

    #[test]
    fn test_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "emg-symmetry");
    }
}
