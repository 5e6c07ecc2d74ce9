// Fixed-width binning of simulation samples for display.

use serde::Serialize;

/// Number of bins used for alliance score histograms.
pub const BIN_COUNT: usize = 20;

/// One histogram bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// `"{lower}-{upper}"` with both boundaries rounded to whole points.
    pub label: String,
    pub count: usize,
    pub lower: f64,
    pub upper: f64,
}

/// Bin `samples` into `bin_count` equal-width bins spanning `[min, max]`.
///
/// The maximum sample lands in the last bin. When every sample is equal the
/// width is zero and every sample goes to the first bin.
pub fn build_histogram(samples: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    if bin_count == 0 {
        return Vec::new();
    }

    let (min, max) = if samples.is_empty() {
        (0.0, 0.0)
    } else {
        (
            samples.iter().copied().fold(f64::INFINITY, f64::min),
            samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )
    };
    let width = (max - min) / bin_count as f64;

    let mut counts = vec![0usize; bin_count];
    for &sample in samples {
        let index = if width > 0.0 {
            let raw = ((sample - min) / width).floor();
            if raw < 0.0 {
                0
            } else {
                (raw as usize).min(bin_count - 1)
            }
        } else {
            0
        };
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lower = min + i as f64 * width;
            let upper = min + (i + 1) as f64 * width;
            HistogramBin {
                label: format!("{}-{}", lower.round() as i64, upper.round() as i64),
                count,
                lower,
                upper,
            }
        })
        .collect()
}
