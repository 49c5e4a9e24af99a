// src/processing/asymmetry.rs
//! Left/right asymmetry scoring and output assembly
//!
//! Two policies share the same per-muscle scores and differ only in the
//! shape of the final mapping:
//!
//! - **Magnitude**: per-channel averages plus `|R - L| / mean * 100`,
//!   rounded to two decimals, for every muscle.
//! - **Dominance**: `muscle -> side` for the muscles whose asymmetry passes
//!   the threshold. With [`InclusionRule::Signed`] the signed value is
//!   compared, so left-dominant muscles (negative values) are never
//!   reported. That matches the legacy output; [`InclusionRule::Magnitude`]
//!   compares the absolute value instead.

use crate::acquisition::table::{MusclePair, Side};
use crate::config::constants::asymmetry::{EPSILON, OUTPUT_DECIMALS};
use crate::processing::windowing::ActivationFeatures;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// `|R - L| / ((R + L)/2 + ε) * 100`, symmetric under swapping sides
pub fn magnitude_asymmetry(left_avg: f64, right_avg: f64) -> f64 {
    signed_asymmetry(left_avg, right_avg).abs()
}

/// `(R - L) / ((R + L)/2 + ε) * 100`; positive means right-dominant
pub fn signed_asymmetry(left_avg: f64, right_avg: f64) -> f64 {
    (right_avg - left_avg) / ((right_avg + left_avg) / 2.0 + EPSILON) * 100.0
}

/// Left when the signed asymmetry is negative, otherwise right (ties go right)
pub fn dominant_side(signed_percent: f64) -> Side {
    if signed_percent < 0.0 {
        Side::Left
    } else {
        Side::Right
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Which quantity the dominance threshold is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InclusionRule {
    /// `signed > threshold`
    #[default]
    Signed,
    /// `|signed| > threshold`
    Magnitude,
}

impl InclusionRule {
    pub fn includes(&self, signed_percent: f64, threshold: f64) -> bool {
        match self {
            InclusionRule::Signed => signed_percent > threshold,
            InclusionRule::Magnitude => signed_percent.abs() > threshold,
        }
    }
}

/// Scoring strategy selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum ScoringPolicy {
    Magnitude,
    Dominance { threshold: f64, inclusion: InclusionRule },
}

/// Scores for one muscle pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleScore {
    pub muscle: String,
    pub left_avg: f64,
    pub right_avg: f64,
    pub left_peak: f64,
    pub right_peak: f64,
    pub magnitude_percent: f64,
    pub signed_percent: f64,
    pub dominant_side: Side,
}

impl MuscleScore {
    pub fn compute(muscle: &str, left: &ActivationFeatures, right: &ActivationFeatures) -> Self {
        let signed_percent = signed_asymmetry(left.avg, right.avg);
        Self {
            muscle: muscle.to_string(),
            left_avg: left.avg,
            right_avg: right.avg,
            left_peak: left.peak,
            right_peak: right.peak,
            magnitude_percent: magnitude_asymmetry(left.avg, right.avg),
            signed_percent,
            dominant_side: dominant_side(signed_percent),
        }
    }
}

/// The externally consumed feature mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureMapping {
    /// `<channel>_avg` and `asymmetry_<muscle>` entries
    Magnitude(BTreeMap<String, f64>),
    /// `<muscle> -> side`, thresholded
    Dominance(BTreeMap<String, Side>),
}

impl FeatureMapping {
    pub fn len(&self) -> usize {
        match self {
            FeatureMapping::Magnitude(map) => map.len(),
            FeatureMapping::Dominance(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for FeatureMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureMapping::Magnitude(map) => {
                for (key, value) in map {
                    writeln!(f, "{}: {}", key, value)?;
                }
            }
            FeatureMapping::Dominance(map) => {
                for (muscle, side) in map {
                    writeln!(f, "{}: {}", muscle, side)?;
                }
            }
        }
        Ok(())
    }
}

/// Build the policy-shaped mapping from a finished set of scores.
///
/// `scores` is only read; filtering builds a new map from it.
pub fn assemble(policy: &ScoringPolicy, pairs: &[MusclePair], scores: &[MuscleScore]) -> FeatureMapping {
    match policy {
        ScoringPolicy::Magnitude => {
            let mut map = BTreeMap::new();
            for (pair, score) in pairs.iter().zip(scores) {
                map.insert(format!("{}_avg", pair.left_channel()), score.left_avg);
                map.insert(format!("{}_avg", pair.right_channel()), score.right_avg);
                map.insert(
                    format!("asymmetry_{}", pair.muscle()),
                    round_to(score.magnitude_percent, OUTPUT_DECIMALS),
                );
            }
            FeatureMapping::Magnitude(map)
        }
        ScoringPolicy::Dominance { threshold, inclusion } => FeatureMapping::Dominance(
            scores
                .iter()
                .filter(|score| inclusion.includes(score.signed_percent, *threshold))
                .map(|score| (score.muscle.clone(), score.dominant_side))
                .collect(),
        ),
    }
}
