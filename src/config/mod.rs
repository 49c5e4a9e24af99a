// src/config/mod.rs
//! Analysis configuration: defaults, presets, validation and loading

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::ConfigLoader;

use crate::error::{EmgError, EmgResult};
use crate::processing::asymmetry::{InclusionRule, ScoringPolicy};
use crate::processing::filters::BandpassSpec;
use crate::processing::windowing::MovementWindow;
use serde::{Deserialize, Serialize};

/// Complete analysis configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub envelope: EnvelopeConfig,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub muscles: MuscleConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SignalConfig {
    /// Uniform sampling rate; timestamps are not used to derive it
    #[serde(default = "defaults::sampling_hz")]
    pub sampling_hz: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilterConfig {
    #[serde(default = "defaults::low_hz")]
    pub low_hz: f64,

    #[serde(default = "defaults::high_hz")]
    pub high_hz: f64,

    #[serde(default = "defaults::order")]
    pub order: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EnvelopeConfig {
    #[serde(default = "defaults::window_ms")]
    pub window_ms: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MovementConfig {
    #[serde(default = "defaults::start_ms")]
    pub start_ms: u64,

    #[serde(default = "defaults::end_ms")]
    pub end_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MuscleConfig {
    /// Muscle names; each expands to `<muscle>_left` and `<muscle>_right`
    #[serde(default = "defaults::muscle_names")]
    pub names: Vec<String>,
}

/// Which output shape the scorer produces
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Per-channel averages plus magnitude asymmetry
    Magnitude,
    /// Thresholded muscle -> dominant side mapping
    Dominance,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScoringConfig {
    #[serde(default = "defaults::policy")]
    pub policy: PolicyKind,

    /// Dominance policy only
    #[serde(default = "defaults::threshold")]
    pub threshold: f64,

    /// Dominance policy only
    #[serde(default)]
    pub inclusion: InclusionRule,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExecutionConfig {
    #[serde(default = "defaults::parallel_channels")]
    pub parallel_channels: bool,
}

/// Default value providers using constants
mod defaults {
    use super::PolicyKind;
    use crate::config::constants::*;

    pub fn sampling_hz() -> f64 { signal::DEFAULT_SAMPLING_HZ }

    pub fn low_hz() -> f64 { filters::DEFAULT_LOW_CUTOFF_HZ }
    pub fn high_hz() -> f64 { filters::DEFAULT_HIGH_CUTOFF_HZ }
    pub fn order() -> usize { filters::DEFAULT_FILTER_ORDER }

    pub fn window_ms() -> f64 { envelope::DEFAULT_WINDOW_MS }

    pub fn start_ms() -> u64 { movement::DEFAULT_START_MS }
    pub fn end_ms() -> u64 { movement::DEFAULT_END_MS }

    pub fn muscle_names() -> Vec<String> {
        muscles::HIP_FLEXORS.iter().map(|m| m.to_string()).collect()
    }

    pub fn policy() -> PolicyKind { PolicyKind::Magnitude }
    pub fn threshold() -> f64 { asymmetry::DEFAULT_THRESHOLD_PERCENT }

    pub fn parallel_channels() -> bool { true }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self { sampling_hz: defaults::sampling_hz() }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            low_hz: defaults::low_hz(),
            high_hz: defaults::high_hz(),
            order: defaults::order(),
        }
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self { window_ms: defaults::window_ms() }
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            start_ms: defaults::start_ms(),
            end_ms: defaults::end_ms(),
        }
    }
}

impl Default for MuscleConfig {
    fn default() -> Self {
        Self { names: defaults::muscle_names() }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            policy: defaults::policy(),
            threshold: defaults::threshold(),
            inclusion: InclusionRule::default(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self { parallel_channels: defaults::parallel_channels() }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            signal: SignalConfig::default(),
            filter: FilterConfig::default(),
            envelope: EnvelopeConfig::default(),
            movement: MovementConfig::default(),
            muscles: MuscleConfig::default(),
            scoring: ScoringConfig::default(),
            execution: ExecutionConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Iliacus and psoas, both sides reported with magnitude asymmetry
    pub fn hip_flexor_report() -> Self {
        Self::default()
    }

    /// Eight-muscle lower limb panel reported as thresholded dominance
    pub fn lower_limb_panel() -> Self {
        Self {
            filter: FilterConfig {
                high_hz: filters::PANEL_HIGH_CUTOFF_HZ,
                ..FilterConfig::default()
            },
            muscles: MuscleConfig {
                names: muscles::LOWER_LIMB_PANEL.iter().map(|m| m.to_string()).collect(),
            },
            scoring: ScoringConfig {
                policy: PolicyKind::Dominance,
                ..ScoringConfig::default()
            },
            ..Self::default()
        }
    }

    /// Bandpass parameters combined with the sampling rate
    pub fn bandpass_spec(&self) -> BandpassSpec {
        BandpassSpec {
            low_hz: self.filter.low_hz,
            high_hz: self.filter.high_hz,
            sampling_hz: self.signal.sampling_hz,
            order: self.filter.order,
        }
    }

    pub fn movement_window(&self) -> MovementWindow {
        MovementWindow::new(self.movement.start_ms, self.movement.end_ms)
    }

    pub fn scoring_policy(&self) -> ScoringPolicy {
        match self.scoring.policy {
            PolicyKind::Magnitude => ScoringPolicy::Magnitude,
            PolicyKind::Dominance => ScoringPolicy::Dominance {
                threshold: self.scoring.threshold,
                inclusion: self.scoring.inclusion,
            },
        }
    }

    /// Validate the whole configuration before any computation begins.
    ///
    /// The movement window ordering is deliberately not checked here: an
    /// inverted window surfaces as `EmptyWindow` when the pipeline runs.
    pub fn validate(&self) -> EmgResult<()> {
        if !(self.signal.sampling_hz.is_finite() && self.signal.sampling_hz >= signal::MIN_SAMPLING_HZ) {
            return Err(EmgError::configuration(
                "signal",
                format!("sampling_hz must be at least {} Hz, got {}", signal::MIN_SAMPLING_HZ, self.signal.sampling_hz),
            ));
        }

        self.bandpass_spec().validate()?;

        if !(self.envelope.window_ms.is_finite() && self.envelope.window_ms > 0.0) {
            return Err(EmgError::configuration(
                "envelope",
                format!("window_ms must be positive, got {}", self.envelope.window_ms),
            ));
        }

        if self.muscles.names.is_empty() {
            return Err(EmgError::configuration("muscles", "muscle list is empty"));
        }
        let mut seen = std::collections::HashSet::new();
        for name in &self.muscles.names {
            if name.trim().is_empty() {
                return Err(EmgError::configuration("muscles", "muscle name is empty"));
            }
            if !seen.insert(name.as_str()) {
                return Err(EmgError::configuration("muscles", format!("duplicate muscle '{}'", name)));
            }
        }

        if self.scoring.policy == PolicyKind::Dominance
            && !(self.scoring.threshold.is_finite() && self.scoring.threshold > 0.0)
        {
            return Err(EmgError::configuration(
                "scoring",
                format!("threshold must be a positive percentage, got {}", self.scoring.threshold),
            ));
        }

        Ok(())
    }
}
