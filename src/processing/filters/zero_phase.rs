// src/processing/filters/zero_phase.rs
//! Forward-backward application of a biquad cascade

use super::SecondOrderSection;
use crate::config::constants::filters::PADDING_FACTOR;

/// Zero-phase filtering with odd-extension edge padding.
///
/// The signal is extended at both ends by a point reflection about its end
/// samples, filtered forward from the settled step state scaled to the first
/// sample, reversed, filtered again the same way, reversed back and cropped.
/// The output has the input's length and no time shift.
pub fn filtfilt(sections: &[SecondOrderSection], samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    if n == 0 || sections.is_empty() {
        return samples.to_vec();
    }

    let pad = padding_len(sections.len()).min(n - 1);
    let mut extended = odd_extend(samples, pad);

    run_cascade(sections, &mut extended);
    extended.reverse();
    run_cascade(sections, &mut extended);
    extended.reverse();

    extended.drain(..pad);
    extended.truncate(n);
    extended
}

fn padding_len(section_count: usize) -> usize {
    PADDING_FACTOR * (2 * section_count + 1)
}

fn odd_extend(samples: &[f64], pad: usize) -> Vec<f64> {
    let n = samples.len();
    let first = samples[0];
    let last = samples[n - 1];

    let mut extended = Vec::with_capacity(n + 2 * pad);
    extended.extend((1..=pad).rev().map(|i| 2.0 * first - samples[i]));
    extended.extend_from_slice(samples);
    extended.extend((1..=pad).map(|i| 2.0 * last - samples[n - 1 - i]));
    extended
}

/// Cascade every section, each starting settled on the first input value
fn run_cascade(sections: &[SecondOrderSection], data: &mut [f64]) {
    let Some(&x0) = data.first() else {
        return;
    };

    let mut level = x0;
    for section in sections {
        let [z1, z2] = section.step_state();
        section.process_in_place(data, [z1 * level, z2 * level]);
        level *= section.dc_gain();
    }
}
