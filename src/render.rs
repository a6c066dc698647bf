use std::ops::RangeInclusive;

use crate::data::filter::LowPassFilter;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Rendered series – everything the plot needs for one frame
// ---------------------------------------------------------------------------

/// A row prepared for display: the full trace plus the visible window.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSeries {
    /// `[time, amplitude]` for every sample of the row.
    pub points: Vec<[f64; 2]>,
    /// Visible time window `[window_end - window_length, window_end]`.
    pub x_range: RangeInclusive<f64>,
    /// Amplitude range over the whole trace, padded for display.
    pub y_range: RangeInclusive<f64>,
    /// Whether the low-pass filter was applied.
    pub filtered: bool,
}

impl RenderedSeries {
    pub fn legend(&self) -> &'static str {
        if self.filtered { "Filtered" } else { "ECG" }
    }
}

/// Fixed geometry of the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Total time span every row is stretched over.
    pub duration: f64,
    /// Width of the trailing window.
    pub window_length: f64,
}

/// Prepare `row` for display with the window ending at `window_end`.
///
/// The time axis spreads the samples evenly over `viewport.duration`
/// regardless of how many there are. `filter` is applied when given.
pub fn render(
    index: usize,
    row: &[f64],
    filter: Option<&LowPassFilter>,
    window_end: f64,
    viewport: Viewport,
) -> Result<RenderedSeries, RenderError> {
    if row.is_empty() {
        return Err(RenderError::EmptyRow { index });
    }

    let values = match filter {
        Some(f) => f.apply(row),
        None => row.to_vec(),
    };
    let points = time_axis(values.len(), viewport.duration)
        .zip(values)
        .map(|(t, v)| [t, v])
        .collect::<Vec<_>>();

    Ok(RenderedSeries {
        y_range: amplitude_range(&points),
        points,
        x_range: (window_end - viewport.window_length)..=window_end,
        filtered: filter.is_some(),
    })
}

/// `n` evenly spaced points from 0 to `duration`, both ends included.
fn time_axis(n: usize, duration: f64) -> impl Iterator<Item = f64> {
    let step = if n > 1 { duration / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| i as f64 * step)
}

/// Min/max of the finite amplitudes with a 5 % margin on both sides.
fn amplitude_range(points: &[[f64; 2]]) -> RangeInclusive<f64> {
    let (min, max) = points
        .iter()
        .map(|p| p[1])
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return -1.0..=1.0;
    }
    let span = max - min;
    let pad = if span.abs() < f64::EPSILON {
        min.abs().max(1.0) * 0.05
    } else {
        span * 0.05
    };
    (min - pad)..=(max + pad)
}
