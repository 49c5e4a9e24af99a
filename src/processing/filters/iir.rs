// src/processing/filters/iir.rs
//! Butterworth bandpass design as cascaded second-order sections
//!
//! The analog lowpass prototype is moved to the band with the lowpass to
//! bandpass transform, mapped to the z-plane with the bilinear transform
//! (cutoffs pre-warped), and split into biquads. Every section carries one
//! zero at `z = 1` and one at `z = -1` and is scaled to unit gain at the
//! band centre.

use super::{filtfilt, BandpassSpec, SecondOrderSection};
use crate::error::EmgResult;
use rustfft::num_complex::Complex64;
use std::f64::consts::PI;

/// Poles closer than this to the real axis are treated as real
const REAL_POLE_TOLERANCE: f64 = 1e-10;

/// Designed zero-phase Butterworth bandpass, reusable across channels
#[derive(Debug, Clone)]
pub struct BandpassFilter {
    spec: BandpassSpec,
    sections: Vec<SecondOrderSection>,
}

impl BandpassFilter {
    /// Design the filter, validating the spec first
    pub fn design(spec: &BandpassSpec) -> EmgResult<Self> {
        spec.validate()?;

        let fs2 = 2.0 * spec.sampling_hz;
        let warped_low = fs2 * (PI * spec.low_hz / spec.sampling_hz).tan();
        let warped_high = fs2 * (PI * spec.high_hz / spec.sampling_hz).tan();
        let bandwidth = warped_high - warped_low;
        let center_sq = warped_low * warped_high;

        let mut upper = Vec::with_capacity(spec.order);
        let mut real = Vec::new();

        for k in 0..spec.order {
            let theta = PI / 2.0 + PI * (2 * k + 1) as f64 / (2 * spec.order) as f64;
            let prototype = Complex64::from_polar(1.0, theta);

            // s^2 - p*bw*s + w0^2 = 0
            let half_sum = prototype * bandwidth / 2.0;
            let root = (half_sum * half_sum - center_sq).sqrt();
            for analog in [half_sum + root, half_sum - root] {
                let digital = (fs2 + analog) / (fs2 - analog);
                if digital.im > REAL_POLE_TOLERANCE {
                    upper.push(digital);
                } else if digital.im.abs() <= REAL_POLE_TOLERANCE {
                    real.push(digital.re);
                }
            }
        }

        let mut denominators: Vec<([f64; 3], f64)> = upper
            .iter()
            .map(|p| ([1.0, -2.0 * p.re, p.norm_sqr()], p.norm()))
            .collect();

        real.sort_by(|a, b| a.total_cmp(b));
        for pair in real.chunks(2) {
            let (r1, r2) = (pair[0], pair.get(1).copied().unwrap_or(0.0));
            denominators.push(([1.0, -(r1 + r2), r1 * r2], r1.abs().max(r2.abs())));
        }

        // Sections nearest the unit circle run last
        denominators.sort_by(|a, b| a.1.total_cmp(&b.1));

        let center_omega = 2.0 * (center_sq.sqrt() / fs2).atan();
        let sections = denominators
            .into_iter()
            .map(|(a, _)| normalize_at(SecondOrderSection { b: [1.0, 0.0, -1.0], a }, center_omega))
            .collect();

        Ok(Self { spec: *spec, sections })
    }

    /// Apply forward and backward; output has the input length and no phase shift
    pub fn apply(&self, samples: &[f64]) -> Vec<f64> {
        filtfilt(&self.sections, samples)
    }

    pub fn spec(&self) -> &BandpassSpec {
        &self.spec
    }

    pub fn sections(&self) -> &[SecondOrderSection] {
        &self.sections
    }

    /// Magnitude response of a single pass at `frequency_hz`
    pub fn magnitude_at(&self, frequency_hz: f64) -> f64 {
        let omega = 2.0 * PI * frequency_hz / self.spec.sampling_hz;
        self.sections.iter().map(|s| section_response(s, omega).norm()).product()
    }
}

fn section_response(section: &SecondOrderSection, omega: f64) -> Complex64 {
    let z1 = Complex64::from_polar(1.0, -omega);
    let z2 = z1 * z1;
    let numerator = section.b[0] + z1 * section.b[1] + z2 * section.b[2];
    let denominator = section.a[0] + z1 * section.a[1] + z2 * section.a[2];
    numerator / denominator
}

fn normalize_at(mut section: SecondOrderSection, omega: f64) -> SecondOrderSection {
    let gain = section_response(&section, omega).norm();
    if gain > 0.0 && gain.is_finite() {
        for coefficient in section.b.iter_mut() {
            *coefficient /= gain;
        }
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emg_spec() -> BandpassSpec {
        BandpassSpec { low_hz: 20.0, high_hz: 450.0, sampling_hz: 1000.0, order: 4 }
    }

    #[test]
    fn test_bandpass_creation() {
        let filter = BandpassFilter::design(&emg_spec()).unwrap();
        assert_eq!(filter.sections().len(), 4);
        for section in filter.sections() {
            assert_eq!(section.a[0], 1.0);
            // Stable: |a2| is the squared pole radius
            assert!(section.a[2].abs() < 1.0);
        }
    }

    #[test]
    fn test_odd_order_section_count() {
        let spec = BandpassSpec { order: 3, ..emg_spec() };
        let filter = BandpassFilter::design(&spec).unwrap();
        assert_eq!(filter.sections().len(), 3);
    }

    #[test]
    fn test_frequency_response() {
        let filter = BandpassFilter::design(&emg_spec()).unwrap();

        assert!((filter.magnitude_at(100.0) - 1.0).abs() < 1e-3);
        assert!((filter.magnitude_at(200.0) - 1.0).abs() < 1e-3);
        assert!(filter.magnitude_at(2.0) < 1e-3);
        assert!(filter.magnitude_at(0.0) < 1e-9);

        // -3 dB at both cutoffs
        let half_power = std::f64::consts::FRAC_1_SQRT_2;
        assert!((filter.magnitude_at(20.0) - half_power).abs() < 1e-3);
        assert!((filter.magnitude_at(450.0) - half_power).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(BandpassFilter::design(&BandpassSpec { high_hz: 600.0, ..emg_spec() }).is_err());
        assert!(BandpassFilter::design(&BandpassSpec { order: 0, ..emg_spec() }).is_err());
    }
}
