// src/acquisition/recorder.rs
//! Line-oriented recording of streamed samples into a [`SampleTable`]

use super::table::{Column, SampleTable};
use crate::error::{EmgError, EmgResult};
use tracing::{debug, warn};

/// Why a streamed line was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    WrongFieldCount,
    UnparsableValue,
    NonIncreasingTime,
}

/// Counters kept while recording
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub accepted: usize,
    pub wrong_field_count: usize,
    pub unparsable: usize,
    pub out_of_order: usize,
}

impl RecorderStats {
    pub fn skipped(&self) -> usize {
        self.wrong_field_count + self.unparsable + self.out_of_order
    }
}

/// Accumulates comma separated device lines for a fixed channel list.
///
/// Each line carries one value per channel in channel order; the timestamp
/// is supplied by the caller. Malformed lines are counted and skipped so a
/// noisy serial link never aborts a session. The table only becomes visible
/// through [`SampleRecorder::finish`].
#[derive(Debug)]
pub struct SampleRecorder {
    channels: Vec<String>,
    time_ms: Vec<u64>,
    values: Vec<Vec<f64>>,
    stats: RecorderStats,
}

impl SampleRecorder {
    pub fn new<S: AsRef<str>>(channels: &[S]) -> EmgResult<Self> {
        if channels.is_empty() {
            return Err(EmgError::configuration("recorder", "no channels configured"));
        }
        let channels: Vec<String> = channels.iter().map(|c| c.as_ref().to_string()).collect();
        let values = vec![Vec::new(); channels.len()];

        Ok(Self {
            channels,
            time_ms: Vec::new(),
            values,
            stats: RecorderStats::default(),
        })
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn stats(&self) -> &RecorderStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.time_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_ms.is_empty()
    }

    /// Parse one line received `elapsed_ms` after the session started.
    ///
    /// Returns the reason when the line is skipped.
    pub fn push_line(&mut self, elapsed_ms: u64, line: &str) -> Result<(), SkipReason> {
        let result = self.parse_line(elapsed_ms, line);
        match result {
            Ok(row) => {
                self.time_ms.push(elapsed_ms);
                for (column, value) in self.values.iter_mut().zip(row) {
                    column.push(value);
                }
                self.stats.accepted += 1;
                Ok(())
            }
            Err(reason) => {
                match reason {
                    SkipReason::WrongFieldCount => self.stats.wrong_field_count += 1,
                    SkipReason::UnparsableValue => self.stats.unparsable += 1,
                    SkipReason::NonIncreasingTime => self.stats.out_of_order += 1,
                }
                warn!(elapsed_ms, ?reason, line = line.trim(), "Skipping recorder line");
                Err(reason)
            }
        }
    }

    fn parse_line(&self, elapsed_ms: u64, line: &str) -> Result<Vec<f64>, SkipReason> {
        if let Some(&last) = self.time_ms.last() {
            if elapsed_ms <= last {
                return Err(SkipReason::NonIncreasingTime);
            }
        }

        let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        if fields.len() != self.channels.len() {
            return Err(SkipReason::WrongFieldCount);
        }

        fields
            .iter()
            .map(|field| field.parse::<f64>().map_err(|_| SkipReason::UnparsableValue))
            .collect()
    }

    /// Hand over everything recorded so far as a validated table
    pub fn finish(self) -> EmgResult<SampleTable> {
        debug!(
            rows = self.stats.accepted,
            skipped = self.stats.skipped(),
            channels = self.channels.len(),
            "Recording finished"
        );

        let columns = self
            .channels
            .into_iter()
            .zip(self.values)
            .map(|(name, values)| Column { name, values })
            .collect();
        SampleTable::new(self.time_ms, columns)
    }
}
