// src/insight.rs
//! Prompt construction for the recommendation collaborator
//!
//! Turning the prompt into advice is left to an [`InsightGenerator`]
//! supplied by the caller. Any client or credentials it needs live inside
//! the implementor.

use crate::error::EmgResult;
use crate::processing::asymmetry::FeatureMapping;
use std::fmt::Write;

const MAGNITUDE_PREAMBLE: &str = "Based on the following EMG data from a movement task, suggest specific \
exercises or stretches to improve muscle balance. Values ending in _avg are mean activation levels; \
asymmetry values are percentage differences between the left and right side.";

const DOMINANCE_PREAMBLE: &str = "Based on the following EMG dominance results from a movement task, \
suggest targeted exercises or stretches for each listed muscle to restore left/right balance. \
Each line names the muscle and the side that dominates it.";

/// Produces natural-language recommendations from a prompt
pub trait InsightGenerator {
    fn generate(&self, prompt: &str) -> EmgResult<String>;
}

/// Render the feature mapping as the analyst prompt
pub fn build_prompt(mapping: &FeatureMapping) -> String {
    let mut prompt = String::new();
    match mapping {
        FeatureMapping::Magnitude(values) => {
            prompt.push_str(MAGNITUDE_PREAMBLE);
            prompt.push_str("\n\n");
            for (key, value) in values {
                // Writing to a String cannot fail
                let _ = writeln!(prompt, "- {}: {:.2}", key, value);
            }
        }
        FeatureMapping::Dominance(sides) => {
            prompt.push_str(DOMINANCE_PREAMBLE);
            prompt.push_str("\n\n");
            if sides.is_empty() {
                prompt.push_str("- No muscle exceeded the asymmetry threshold.\n");
            }
            for (muscle, side) in sides {
                let _ = writeln!(prompt, "- {}: {} dominant", muscle.replace('_', " "), side);
            }
        }
    }
    prompt
}

/// Build the prompt and hand it to `generator`
pub fn generate_insights<G: InsightGenerator + ?Sized>(generator: &G, mapping: &FeatureMapping) -> EmgResult<String> {
    generator.generate(&build_prompt(mapping))
}
