// src/processing/pipeline.rs
//! Batch symmetry pipeline: filter, rectify, envelope, window, score

use crate::acquisition::table::{ChannelName, Column, MusclePairing, SampleTable};
use crate::config::AnalysisConfig;
use crate::error::EmgResult;
use crate::processing::asymmetry::{assemble, FeatureMapping, MuscleScore, ScoringPolicy};
use crate::processing::envelope::{rectify, rms_envelope};
use crate::processing::filters::{BandpassFilter, BandpassSpec};
use crate::processing::windowing::{extract, ActivationFeatures, MovementWindow};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Activation statistics of one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFeatures {
    pub channel: String,
    #[serde(flatten)]
    pub features: ActivationFeatures,
}

/// Everything computed for a run, independent of the output policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureReport {
    pub window: MovementWindow,
    pub channels: Vec<ChannelFeatures>,
    pub muscles: Vec<MuscleScore>,
}

impl FeatureReport {
    pub fn channel(&self, name: &str) -> Option<&ActivationFeatures> {
        self.channels.iter().find(|c| c.channel == name).map(|c| &c.features)
    }

    pub fn muscle(&self, name: &str) -> Option<&MuscleScore> {
        self.muscles.iter().find(|m| m.muscle == name)
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Policy-shaped mapping handed to reporting
    pub mapping: FeatureMapping,
    pub report: FeatureReport,
    /// Input table plus one `<channel>_envelope` column per channel
    pub augmented: SampleTable,
}

/// Per-channel stage output
struct ChannelResult {
    channel: ChannelName,
    envelope: Vec<f64>,
    features: ActivationFeatures,
}

/// Stateless pipeline over sample tables.
///
/// The filter is designed once at construction; [`SymmetryPipeline::run`]
/// holds no state between calls and the same table always produces the
/// same output.
#[derive(Debug, Clone)]
pub struct SymmetryPipeline {
    filter: BandpassFilter,
    envelope_window_ms: f64,
    window: MovementWindow,
    pairing: MusclePairing,
    policy: ScoringPolicy,
    parallel_channels: bool,
}

impl SymmetryPipeline {
    /// Validate `config` and build the pipeline it describes
    pub fn new(config: &AnalysisConfig) -> EmgResult<Self> {
        config.validate()?;

        let mut pipeline = Self::from_parts(
            &config.bandpass_spec(),
            config.envelope.window_ms,
            config.movement_window(),
            MusclePairing::from_muscles(&config.muscles.names)?,
            config.scoring_policy(),
        )?;
        pipeline.parallel_channels = config.execution.parallel_channels;
        Ok(pipeline)
    }

    /// Build from explicit stage parameters; channels run sequentially
    pub fn from_parts(
        filter: &BandpassSpec,
        envelope_window_ms: f64,
        window: MovementWindow,
        pairing: MusclePairing,
        policy: ScoringPolicy,
    ) -> EmgResult<Self> {
        Ok(Self {
            filter: BandpassFilter::design(filter)?,
            envelope_window_ms,
            window,
            pairing,
            policy,
            parallel_channels: false,
        })
    }

    pub fn with_parallel_channels(mut self, parallel: bool) -> Self {
        self.parallel_channels = parallel;
        self
    }

    pub fn pairing(&self) -> &MusclePairing {
        &self.pairing
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn filter(&self) -> &BandpassFilter {
        &self.filter
    }

    pub fn run(&self, table: &SampleTable) -> EmgResult<PipelineOutput> {
        let channels = self.pairing.channels();

        // Every declared channel must exist before any work starts
        for channel in &channels {
            table.channel(&channel.to_string())?;
        }

        let results: Vec<EmgResult<ChannelResult>> = if self.parallel_channels {
            channels.par_iter().map(|c| self.process_channel(table, c)).collect()
        } else {
            channels.iter().map(|c| self.process_channel(table, c)).collect()
        };
        // Join point: the first failure in channel order aborts the run
        let results = results.into_iter().collect::<EmgResult<Vec<_>>>()?;

        let mut report_channels = Vec::with_capacity(results.len());
        let mut envelope_columns = Vec::with_capacity(results.len());
        for result in results {
            report_channels.push(ChannelFeatures {
                channel: result.channel.to_string(),
                features: result.features,
            });
            envelope_columns.push(Column {
                name: result.channel.envelope_column(),
                values: result.envelope,
            });
        }

        // Channels come out as [left, right] per muscle in pairing order
        let scores: Vec<MuscleScore> = self
            .pairing
            .pairs()
            .iter()
            .zip(report_channels.chunks_exact(2))
            .map(|(pair, sides)| MuscleScore::compute(pair.muscle(), &sides[0].features, &sides[1].features))
            .collect();

        let mapping = assemble(&self.policy, self.pairing.pairs(), &scores);
        if let (ScoringPolicy::Dominance { threshold, .. }, FeatureMapping::Dominance(map)) = (&self.policy, &mapping) {
            for score in scores.iter().filter(|s| !map.contains_key(&s.muscle)) {
                debug!(
                    muscle = %score.muscle,
                    signed_percent = score.signed_percent,
                    threshold,
                    "Muscle below dominance threshold"
                );
            }
        }

        let augmented = table.with_columns(envelope_columns)?;

        info!(
            channels = channels.len(),
            muscles = scores.len(),
            reported = mapping.len(),
            rows = table.len(),
            "Symmetry analysis complete"
        );

        Ok(PipelineOutput {
            mapping,
            report: FeatureReport {
                window: self.window,
                channels: report_channels,
                muscles: scores,
            },
            augmented,
        })
    }

    fn process_channel(&self, table: &SampleTable, channel: &ChannelName) -> EmgResult<ChannelResult> {
        let name = channel.to_string();
        let raw = table.channel(&name)?;

        let filtered = self.filter.apply(raw);
        let rectified = rectify(&filtered);
        let envelope = rms_envelope(&rectified, self.envelope_window_ms, self.filter.spec().sampling_hz);
        let features = extract(&envelope, table.time_ms(), &self.window).map_err(|e| e.for_channel(&name))?;

        debug!(
            channel = %name,
            samples = raw.len(),
            window_samples = features.samples,
            avg = features.avg,
            peak = features.peak,
            "Channel processed"
        );

        Ok(ChannelResult {
            channel: channel.clone(),
            envelope,
            features,
        })
    }
}

/// One-shot run with explicit stage parameters.
///
/// Returns the policy-shaped mapping and the augmented table.
pub fn run(
    table: &SampleTable,
    pairing: &MusclePairing,
    window: MovementWindow,
    filter: &BandpassSpec,
    envelope_window_ms: f64,
    policy: ScoringPolicy,
) -> EmgResult<(FeatureMapping, SampleTable)> {
    let pipeline = SymmetryPipeline::from_parts(filter, envelope_window_ms, window, pairing.clone(), policy)?;
    let output = pipeline.run(table)?;
    Ok((output.mapping, output.augmented))
}
