// src/acquisition/mod.rs
//! Sample tables and the collaborators that produce them

pub mod csv;
pub mod recorder;
pub mod table;

pub use recorder::{RecorderStats, SampleRecorder, SkipReason};
pub use table::{ChannelName, Column, MusclePair, MusclePairing, SampleTable, Side};
