// src/error.rs
//! Unified error handling for the symmetry pipeline
//!
//! Every fallible operation in the crate returns [`EmgResult`]. Errors are
//! detected eagerly and carry enough context (channel, muscle, cutoffs) to
//! diagnose the failing input. A failed channel invalidates the whole run:
//! no partial feature mapping is ever returned.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for the symmetry pipeline
#[derive(Debug, Error)]
pub enum EmgError {
    /// A declared channel is absent from the input table
    #[error("[DATA] Missing channel '{channel}' in sample table")]
    MissingChannel { channel: String },

    /// Bandpass cutoffs or order are out of range for the sampling rate
    #[error(
        "[FILTER] Invalid filter spec: {reason} (low: {low_hz} Hz, high: {high_hz} Hz, fs: {sampling_hz} Hz, order: {order})"
    )]
    InvalidFilterSpec {
        low_hz: f64,
        high_hz: f64,
        sampling_hz: f64,
        order: usize,
        reason: String,
    },

    /// The movement window selected no valid envelope samples
    #[error("[WINDOW] Empty movement window [{start_ms}, {end_ms}] ms{}", channel_suffix(.channel))]
    EmptyWindow {
        channel: Option<String>,
        start_ms: u64,
        end_ms: u64,
    },

    /// Malformed input data
    #[error("[DATA] Invalid {data_type}: {reason}")]
    InvalidData { data_type: String, reason: String },

    /// Configuration outside the filter spec
    #[error("[CONFIG] Configuration error in {component}: {reason}")]
    Configuration { component: String, reason: String },

    /// Parse failure in a text format (TOML, CSV, JSON)
    #[error("[PARSE] {reason}")]
    Parse { reason: String },

    /// File system failure
    #[error("[IO] {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn channel_suffix(channel: &Option<String>) -> String {
    match channel {
        Some(name) => format!(" for channel '{}'", name),
        None => String::new(),
    }
}

/// Pipeline stages for error tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingStage {
    Validation,
    Filtering,
    Envelope,
    FeatureExtraction,
    Scoring,
    Io,
}

impl EmgError {
    /// Stage that produced this error
    pub fn stage(&self) -> ProcessingStage {
        match self {
            EmgError::MissingChannel { .. } | EmgError::InvalidData { .. } => ProcessingStage::Validation,
            EmgError::Configuration { .. } => ProcessingStage::Validation,
            EmgError::InvalidFilterSpec { .. } => ProcessingStage::Filtering,
            EmgError::EmptyWindow { .. } => ProcessingStage::FeatureExtraction,
            EmgError::Parse { .. } | EmgError::Io { .. } => ProcessingStage::Io,
        }
    }

    /// Attach the failing channel to an `EmptyWindow` error.
    ///
    /// Other variants pass through unchanged.
    pub fn for_channel(self, name: &str) -> Self {
        match self {
            EmgError::EmptyWindow { start_ms, end_ms, .. } => EmgError::EmptyWindow {
                channel: Some(name.to_string()),
                start_ms,
                end_ms,
            },
            other => other,
        }
    }

    pub(crate) fn invalid_data(data_type: &str, reason: impl Into<String>) -> Self {
        EmgError::InvalidData {
            data_type: data_type.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(component: &str, reason: impl Into<String>) -> Self {
        EmgError::Configuration {
            component: component.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EmgError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<toml::de::Error> for EmgError {
    fn from(err: toml::de::Error) -> Self {
        EmgError::Parse {
            reason: format!("TOML: {}", err),
        }
    }
}

impl From<toml::ser::Error> for EmgError {
    fn from(err: toml::ser::Error) -> Self {
        EmgError::Parse {
            reason: format!("TOML serialization: {}", err),
        }
    }
}

impl From<serde_json::Error> for EmgError {
    fn from(err: serde_json::Error) -> Self {
        EmgError::Parse {
            reason: format!("JSON: {}", err),
        }
    }
}

/// Result type alias for pipeline operations
pub type EmgResult<T> = Result<T, EmgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_window_display_with_channel() {
        let err = EmgError::EmptyWindow {
            channel: None,
            start_ms: 5000,
            end_ms: 1000,
        }
        .for_channel("psoas_left");

        let display = err.to_string();
        assert!(display.contains("psoas_left"));
        assert!(display.contains("[5000, 1000]"));
        assert_eq!(err.stage(), ProcessingStage::FeatureExtraction);
    }

    #[test]
    fn test_for_channel_leaves_other_variants() {
        let err = EmgError::MissingChannel {
            channel: "iliacus_left".to_string(),
        }
        .for_channel("psoas_right");

        match err {
            EmgError::MissingChannel { channel } => assert_eq!(channel, "iliacus_left"),
            other => panic!("Expected missing channel, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_spec_display() {
        let err = EmgError::InvalidFilterSpec {
            low_hz: 20.0,
            high_hz: 600.0,
            sampling_hz: 1000.0,
            order: 4,
            reason: "high cutoff must be below Nyquist".to_string(),
        };

        let display = format!("{}", err);
        assert!(display.contains("[FILTER]"));
        assert!(display.contains("600"));
        assert_eq!(err.stage(), ProcessingStage::Filtering);
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EmgError>();
    }

    #[test]
    fn test_toml_error_conversion() {
        let parsed: Result<toml::Value, _> = toml::from_str("[signal\nsampling_hz = ");
        let err: EmgError = parsed.unwrap_err().into();
        assert_eq!(err.stage(), ProcessingStage::Io);
        assert!(err.to_string().starts_with("[PARSE] TOML"));
    }
}
