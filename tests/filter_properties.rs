// tests/filter_properties.rs
//! Property tests for the signal stages and the scorer

use emg_symmetry::acquisition::table::MusclePair;
use emg_symmetry::processing::asymmetry::{
    assemble, magnitude_asymmetry, signed_asymmetry, FeatureMapping, InclusionRule, MuscleScore, ScoringPolicy,
};
use emg_symmetry::processing::envelope::{rectify, rms_envelope};
use emg_symmetry::processing::filters::{BandpassFilter, BandpassSpec};
use emg_symmetry::processing::windowing::ActivationFeatures;
use emg_symmetry::simulation::noise_models::gaussian;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn variance(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

fn symmetric_pulse(half_len: usize, width: f64) -> Vec<f64> {
    (0..=2 * half_len)
        .map(|i| {
            let d = i as f64 - half_len as f64;
            (-(d * d) / (2.0 * width * width)).exp()
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn zero_phase_keeps_pulse_centered(
        low_hz in 10.0f64..40.0,
        high_hz in 200.0f64..450.0,
        order in 1usize..=6,
        width in 2.0f64..8.0,
    ) {
        let spec = BandpassSpec { low_hz, high_hz, sampling_hz: 1000.0, order };
        let filter = BandpassFilter::design(&spec).unwrap();
        let half = 1500;
        let output = filter.apply(&symmetric_pulse(half, width));

        let scale = output.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        prop_assert!(scale > 0.0);
        for k in 1..200 {
            prop_assert!((output[half + k] - output[half - k]).abs() <= 1e-6 * scale);
        }
    }

    #[test]
    fn filter_preserves_length(len in 1usize..300, order in 1usize..=8) {
        let spec = BandpassSpec { low_hz: 20.0, high_hz: 450.0, sampling_hz: 1000.0, order };
        let signal: Vec<f64> = (0..len).map(|i| (i as f64 * 0.37).sin()).collect();
        prop_assert_eq!(BandpassFilter::design(&spec).unwrap().apply(&signal).len(), len);
    }

    #[test]
    fn rectify_is_idempotent(signal in prop::collection::vec(-1e3f64..1e3, 0..200)) {
        let once = rectify(&signal);
        prop_assert_eq!(rectify(&once), once);
    }

    #[test]
    fn rms_envelope_is_non_negative(
        signal in prop::collection::vec(-1e3f64..1e3, 0..300),
        window_ms in 0.5f64..400.0,
    ) {
        let envelope = rms_envelope(&signal, window_ms, 1000.0);
        prop_assert_eq!(envelope.len(), signal.len());
        prop_assert!(envelope.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn wider_windows_smooth_more(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let signal: Vec<f64> = (0..3000).map(|_| gaussian(&mut rng).abs()).collect();

        let narrow = variance(&rms_envelope(&signal, 5.0, 1000.0));
        let medium = variance(&rms_envelope(&signal, 20.0, 1000.0));
        let wide = variance(&rms_envelope(&signal, 80.0, 1000.0));
        prop_assert!(narrow > medium, "{} vs {}", narrow, medium);
        prop_assert!(medium > wide, "{} vs {}", medium, wide);
    }

    #[test]
    fn magnitude_asymmetry_is_swap_symmetric(left in 0.0f64..1e3, right in 0.0f64..1e3) {
        prop_assert_eq!(magnitude_asymmetry(left, right), magnitude_asymmetry(right, left));
        prop_assert!(magnitude_asymmetry(left, right) >= 0.0);
    }

    #[test]
    fn signed_asymmetry_is_swap_antisymmetric(left in 0.0f64..1e3, right in 0.0f64..1e3) {
        prop_assert_eq!(signed_asymmetry(left, right), -signed_asymmetry(right, left));
    }

    #[test]
    fn dominance_mapping_respects_threshold(
        averages in prop::collection::vec((0.0f64..100.0, 0.0f64..100.0), 1..12),
        threshold in 1.0f64..150.0,
        magnitude_rule in any::<bool>(),
    ) {
        let pairs: Vec<MusclePair> = (0..averages.len()).map(|i| MusclePair::new(&format!("m{}", i))).collect();
        let scores: Vec<MuscleScore> = pairs
            .iter()
            .zip(&averages)
            .map(|(pair, (l, r))| {
                let left = ActivationFeatures { avg: *l, peak: *l, samples: 1 };
                let right = ActivationFeatures { avg: *r, peak: *r, samples: 1 };
                MuscleScore::compute(pair.muscle(), &left, &right)
            })
            .collect();
        let inclusion = if magnitude_rule { InclusionRule::Magnitude } else { InclusionRule::Signed };

        match assemble(&ScoringPolicy::Dominance { threshold, inclusion }, &pairs, &scores) {
            FeatureMapping::Dominance(map) => {
                for score in &scores {
                    let expected = inclusion.includes(score.signed_percent, threshold);
                    prop_assert_eq!(map.contains_key(&score.muscle), expected);
                    if !magnitude_rule && score.signed_percent <= threshold {
                        prop_assert!(!map.contains_key(&score.muscle));
                    }
                }
            }
            other => prop_assert!(false, "Expected dominance mapping, got {:?}", other),
        }
    }
}
