// src/processing/envelope.rs
//! Rectification and RMS envelope estimation

/// Elementwise absolute value
pub fn rectify(samples: &[f64]) -> Vec<f64> {
    samples.iter().map(|x| x.abs()).collect()
}

/// Window length in samples: `max(1, round(fs * window_ms / 1000))`
pub fn window_len_samples(window_ms: f64, sampling_hz: f64) -> usize {
    let samples = (sampling_hz * window_ms / 1000.0).round();
    if samples.is_finite() && samples >= 1.0 {
        samples as usize
    } else {
        1
    }
}

/// Centered rolling RMS with edge-clipped windows.
///
/// For a window of `w` samples, index `i` covers `[i - w/2, i + (w - 1)/2]`
/// intersected with the signal (even windows reach one sample further back),
/// so every index gets a value and the output has the input's length.
pub fn rms_envelope(samples: &[f64], window_ms: f64, sampling_hz: f64) -> Vec<f64> {
    let n = samples.len();
    let window = window_len_samples(window_ms, sampling_hz);
    let ahead = (window - 1) / 2;
    let behind = window - 1 - ahead;

    // prefix[i] = sum of squares of samples[..i]
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for &x in samples {
        acc += x * x;
        prefix.push(acc);
    }

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(behind);
            let hi = (i + ahead).min(n - 1);
            let mean_square = (prefix[hi + 1] - prefix[lo]) / (hi + 1 - lo) as f64;
            // Prefix differences can dip a hair below zero
            mean_square.max(0.0).sqrt()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_len() {
        assert_eq!(window_len_samples(200.0, 1000.0), 200);
        assert_eq!(window_len_samples(2.5, 1000.0), 3);
        assert_eq!(window_len_samples(0.1, 1000.0), 1);
        assert_eq!(window_len_samples(0.0, 1000.0), 1);
    }

    #[test]
    fn test_rectify_idempotent() {
        let signal = vec![-3.0, -0.5, 0.0, 0.25, 2.0];
        let once = rectify(&signal);
        assert_eq!(once, vec![3.0, 0.5, 0.0, 0.25, 2.0]);
        assert_eq!(rectify(&once), once);
    }

    #[test]
    fn test_constant_signal_envelope() {
        let envelope = rms_envelope(&[2.0; 10], 5.0, 1000.0);
        assert_eq!(envelope.len(), 10);
        for value in envelope {
            assert!((value - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_centered_windows_clip_at_edges() {
        // 3-sample window: [i-1, i+1]
        let samples = [3.0, 0.0, 0.0, 4.0];
        let envelope = rms_envelope(&samples, 3.0, 1000.0);

        assert!((envelope[0] - (9.0f64 / 2.0).sqrt()).abs() < 1e-12);
        assert!((envelope[1] - (9.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((envelope[2] - (16.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((envelope[3] - (16.0f64 / 2.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_even_window_leans_backward() {
        // 4-sample window: [i-2, i+1]
        let samples = [0.0, 0.0, 0.0, 0.0, 2.0];
        let envelope = rms_envelope(&samples, 4.0, 1000.0);

        assert_eq!(envelope[2], 0.0);
        assert!((envelope[3] - 1.0).abs() < 1e-12);
        assert!((envelope[4] - (4.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_window_is_absolute_value() {
        let samples = [-1.5, 2.0, -0.25];
        let envelope = rms_envelope(&samples, 1.0, 1000.0);
        assert_eq!(envelope, vec![1.5, 2.0, 0.25]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rms_envelope(&[], 200.0, 1000.0).is_empty());
    }
}
