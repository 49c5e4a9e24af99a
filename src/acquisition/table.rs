// src/acquisition/table.rs
//! Core types for multi-channel sample tables and muscle pairing

use crate::config::constants::signal::{ENVELOPE_SUFFIX, LEFT_SUFFIX, RIGHT_SUFFIX};
use crate::error::{EmgError, EmgResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Body side of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => LEFT_SUFFIX,
            Side::Right => RIGHT_SUFFIX,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel key following `<muscle>_<side>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelName {
    pub muscle: String,
    pub side: Side,
}

impl ChannelName {
    pub fn new(muscle: &str, side: Side) -> Self {
        Self { muscle: muscle.to_string(), side }
    }

    /// Split on the last underscore; muscle names may contain underscores
    pub fn parse(name: &str) -> EmgResult<Self> {
        let (muscle, side) = name
            .rsplit_once('_')
            .ok_or_else(|| EmgError::invalid_data("channel name", format!("'{}' has no side suffix", name)))?;

        let side = match side {
            LEFT_SUFFIX => Side::Left,
            RIGHT_SUFFIX => Side::Right,
            other => {
                return Err(EmgError::invalid_data(
                    "channel name",
                    format!("'{}' has side '{}', expected left or right", name, other),
                ))
            }
        };
        if muscle.is_empty() {
            return Err(EmgError::invalid_data("channel name", format!("'{}' has no muscle", name)));
        }

        Ok(Self::new(muscle, side))
    }

    pub fn envelope_column(&self) -> String {
        format!("{}{}", self, ENVELOPE_SUFFIX)
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.muscle, self.side)
    }
}

/// Left and right channels of one muscle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusclePair {
    muscle: String,
    left: ChannelName,
    right: ChannelName,
}

impl MusclePair {
    pub fn new(muscle: &str) -> Self {
        Self {
            muscle: muscle.to_string(),
            left: ChannelName::new(muscle, Side::Left),
            right: ChannelName::new(muscle, Side::Right),
        }
    }

    pub fn muscle(&self) -> &str {
        &self.muscle
    }

    pub fn left_channel(&self) -> &ChannelName {
        &self.left
    }

    pub fn right_channel(&self) -> &ChannelName {
        &self.right
    }

    pub fn channel(&self, side: Side) -> &ChannelName {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Ordered muscle pairs and the channel list they imply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusclePairing {
    pairs: Vec<MusclePair>,
}

impl MusclePairing {
    /// Pair every muscle with its `_left` and `_right` channels
    pub fn from_muscles<S: AsRef<str>>(muscles: &[S]) -> EmgResult<Self> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::with_capacity(muscles.len());
        for muscle in muscles {
            let muscle = muscle.as_ref();
            if muscle.is_empty() {
                return Err(EmgError::invalid_data("muscle list", "empty muscle name"));
            }
            if !seen.insert(muscle) {
                return Err(EmgError::invalid_data("muscle list", format!("duplicate muscle '{}'", muscle)));
            }
            pairs.push(MusclePair::new(muscle));
        }
        if pairs.is_empty() {
            return Err(EmgError::invalid_data("muscle list", "no muscles declared"));
        }
        Ok(Self { pairs })
    }

    /// Group channel names into pairs, in order of first appearance.
    ///
    /// Every muscle must have exactly one left and one right channel.
    pub fn from_channels<S: AsRef<str>>(channels: &[S]) -> EmgResult<Self> {
        let mut muscles: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for channel in channels {
            let parsed = ChannelName::parse(channel.as_ref())?;
            if !seen.insert((parsed.muscle.clone(), parsed.side)) {
                return Err(EmgError::invalid_data("channel list", format!("duplicate channel '{}'", parsed)));
            }
            if !muscles.contains(&parsed.muscle) {
                muscles.push(parsed.muscle);
            }
        }

        for muscle in &muscles {
            for side in [Side::Left, Side::Right] {
                if !seen.contains(&(muscle.clone(), side)) {
                    return Err(EmgError::invalid_data(
                        "channel list",
                        format!("muscle '{}' has no {} channel", muscle, side),
                    ));
                }
            }
        }

        Self::from_muscles(&muscles)
    }

    pub fn pairs(&self) -> &[MusclePair] {
        &self.pairs
    }

    /// All channels, left before right within each muscle
    pub fn channels(&self) -> Vec<ChannelName> {
        self.pairs
            .iter()
            .flat_map(|pair| [pair.left.clone(), pair.right.clone()])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Named floating-point column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Timestamped multi-channel samples
///
/// Timestamps are strictly increasing and every column has one value per
/// timestamp. The sampling interval comes from configuration, not from the
/// timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTable {
    time_ms: Vec<u64>,
    columns: Vec<Column>,
}

impl SampleTable {
    pub fn new(time_ms: Vec<u64>, columns: Vec<Column>) -> EmgResult<Self> {
        if let Some(pos) = time_ms.windows(2).position(|w| w[1] <= w[0]) {
            return Err(EmgError::invalid_data(
                "sample table",
                format!(
                    "time must be strictly increasing (row {}: {} ms after {} ms)",
                    pos + 1,
                    time_ms[pos + 1],
                    time_ms[pos]
                ),
            ));
        }

        let mut names = HashSet::new();
        for column in &columns {
            if column.values.len() != time_ms.len() {
                return Err(EmgError::invalid_data(
                    "sample table",
                    format!(
                        "column '{}' has {} values for {} timestamps",
                        column.name,
                        column.values.len(),
                        time_ms.len()
                    ),
                ));
            }
            if !names.insert(column.name.as_str()) {
                return Err(EmgError::invalid_data(
                    "sample table",
                    format!("duplicate column '{}'", column.name),
                ));
            }
        }

        Ok(Self { time_ms, columns })
    }

    /// Build from `(name, values)` pairs
    pub fn from_columns<S: Into<String>>(time_ms: Vec<u64>, columns: Vec<(S, Vec<f64>)>) -> EmgResult<Self> {
        let columns = columns
            .into_iter()
            .map(|(name, values)| Column { name: name.into(), values })
            .collect();
        Self::new(time_ms, columns)
    }

    pub fn time_ms(&self) -> &[u64] {
        &self.time_ms
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.time_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_ms.is_empty()
    }

    /// Values of a channel, or `MissingChannel`
    pub fn channel(&self, name: &str) -> EmgResult<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| EmgError::MissingChannel { channel: name.to_string() })
    }

    /// Copy of the table with one more column
    pub fn with_column(&self, name: &str, values: Vec<f64>) -> EmgResult<Self> {
        let mut columns = self.columns.clone();
        columns.push(Column { name: name.to_string(), values });
        Self::new(self.time_ms.clone(), columns)
    }

    /// Copy of the table with several more columns
    pub fn with_columns(&self, extra: Vec<Column>) -> EmgResult<Self> {
        let mut columns = self.columns.clone();
        columns.extend(extra);
        Self::new(self.time_ms.clone(), columns)
    }
}
