use std::f64::consts::PI;

use anyhow::{Result, ensure};

use crate::config::FilterConfig;

// ---------------------------------------------------------------------------
// Second-order section
// ---------------------------------------------------------------------------

/// One biquad stage in transposed direct form II, normalised so `a0 == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Section {
    b: [f64; 3],
    a: [f64; 3],
}

impl Section {
    /// Apply the section from zero initial state.
    fn apply(&self, input: &[f64]) -> Vec<f64> {
        let [b0, b1, b2] = self.b;
        let [_, a1, a2] = self.a;
        let (mut z1, mut z2) = (0.0, 0.0);
        input
            .iter()
            .map(|&x| {
                let y = b0 * x + z1;
                z1 = b1 * x - a1 * y + z2;
                z2 = b2 * x - a2 * y;
                y
            })
            .collect()
    }

    fn dc_gain(&self) -> f64 {
        self.b.iter().sum::<f64>() / self.a.iter().sum::<f64>()
    }
}

// ---------------------------------------------------------------------------
// Butterworth low-pass
// ---------------------------------------------------------------------------

/// Digital Butterworth low-pass designed by the pre-warped bilinear
/// transform, applied causally like a single `lfilter` pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LowPassFilter {
    sections: Vec<Section>,
}

impl LowPassFilter {
    pub fn new(order: usize, cutoff_hz: f64, sample_rate_hz: f64) -> Result<Self> {
        ensure!(order >= 1, "filter order must be at least 1");
        ensure!(sample_rate_hz > 0.0, "sample rate must be positive");
        ensure!(
            cutoff_hz > 0.0 && cutoff_hz < sample_rate_hz / 2.0,
            "cutoff {cutoff_hz} Hz must lie between 0 and Nyquist ({} Hz)",
            sample_rate_hz / 2.0
        );

        let k = (PI * cutoff_hz / sample_rate_hz).tan();
        let k2 = k * k;
        let mut sections = Vec::with_capacity(order.div_ceil(2));

        for i in 0..order / 2 {
            // Conjugate pole pair i of the analog prototype.
            let q = 1.0 / (2.0 * (PI * (2 * i + 1) as f64 / (2 * order) as f64).sin());
            let norm = 1.0 / (1.0 + k / q + k2);
            let b0 = k2 * norm;
            sections.push(Section {
                b: [b0, 2.0 * b0, b0],
                a: [1.0, 2.0 * (k2 - 1.0) * norm, (1.0 - k / q + k2) * norm],
            });
        }
        if order % 2 == 1 {
            // Real pole.
            let norm = 1.0 / (1.0 + k);
            sections.push(Section {
                b: [k * norm, k * norm, 0.0],
                a: [1.0, (k - 1.0) * norm, 0.0],
            });
        }

        Ok(Self { sections })
    }

    pub fn from_config(config: &FilterConfig) -> Result<Self> {
        Self::new(config.order, config.cutoff_hz, config.sample_rate_hz)
    }

    /// Filter a whole row; the output has the same length as the input.
    pub fn apply(&self, signal: &[f64]) -> Vec<f64> {
        self.sections
            .iter()
            .fold(signal.to_vec(), |acc, section| section.apply(&acc))
    }

    pub fn order(&self) -> usize {
        self.sections
            .iter()
            .map(|s| if s.b[2] == 0.0 && s.a[2] == 0.0 { 1 } else { 2 })
            .sum()
    }

    /// Gain at 0 Hz (unity for a Butterworth low-pass).
    pub fn dc_gain(&self) -> f64 {
        self.sections.iter().map(Section::dc_gain).product()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn default_filter() -> LowPassFilter {
        LowPassFilter::from_config(&FilterConfig::default()).unwrap()
    }

    fn sine(freq_hz: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq_hz * i as f64 / fs).sin())
            .collect()
    }

    fn peak(signal: &[f64]) -> f64 {
        signal.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    #[test]
    fn design_has_requested_order_and_unity_dc_gain() {
        let f = default_filter();
        assert_eq!(f.order(), 4);
        assert_abs_diff_eq!(f.dc_gain(), 1.0, epsilon = 1e-12);

        let odd = LowPassFilter::new(3, 30.0, 1000.0).unwrap();
        assert_eq!(odd.order(), 3);
        assert_abs_diff_eq!(odd.dc_gain(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn step_response_settles_to_input_level() {
        let out = default_filter().apply(&vec![2.0; 2000]);
        assert_eq!(out.len(), 2000);
        // Causal from rest: the first output is only the feed-forward term.
        assert!(out[0] > 0.0 && out[0] < 1e-3);
        assert_abs_diff_eq!(out[1999], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn attenuates_above_cutoff_and_passes_below() {
        let f = default_filter();
        let fs = 1000.0;

        let low = f.apply(&sine(5.0, fs, 4000));
        assert_abs_diff_eq!(peak(&low[2000..]), 1.0, epsilon = 0.01);

        let high = f.apply(&sine(200.0, fs, 4000));
        assert!(peak(&high[2000..]) < 0.01);

        // -3 dB at the cutoff.
        let edge = f.apply(&sine(30.0, fs, 4000));
        assert_abs_diff_eq!(peak(&edge[2000..]), 1.0 / 2.0_f64.sqrt(), epsilon = 0.01);
    }

    #[test]
    fn empty_row_stays_empty() {
        assert!(default_filter().apply(&[]).is_empty());
    }

    #[test]
    fn rejects_cutoff_at_nyquist() {
        assert!(LowPassFilter::new(4, 500.0, 1000.0).is_err());
        assert!(LowPassFilter::new(0, 30.0, 1000.0).is_err());
    }
}
