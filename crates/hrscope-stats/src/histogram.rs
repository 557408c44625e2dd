use std::ops::Range;

use serde::Serialize;

/// A histogram representation of a dataset's distribution.
///
/// The histogram divides the data range into bins of equal width and counts the
/// frequency of values falling into each bin. Bin boundaries are aligned to
/// multiples of the bin width so that, for example, one-year age bins start on
/// whole years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order, without gaps.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
///
/// Each bin represents a range of values and the count of data points falling within that range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Creates a histogram with bins of `bin_width` covering all `values`.
    ///
    /// Non-finite values are ignored. An empty input or a non-positive width
    /// yields a histogram without bins.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hrscope_stats::histogram::Histogram;
    /// let histogram = Histogram::with_bin_width([31.0, 32.5, 35.0, 39.9], 5.0);
    /// assert_eq!(histogram.bins.len(), 2);
    /// assert_eq!(histogram.bins[0].range, 30.0..35.0);
    /// assert_eq!(histogram.bins[0].count, 2);
    /// assert_eq!(histogram.bins[1].count, 2);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn with_bin_width<I>(values: I, bin_width: f64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        if values.is_empty() || !(bin_width > 0.0 && bin_width.is_finite()) {
            return Self { bins: vec![] };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Align the first bin to a multiple of the width
        let first_start = (min / bin_width).floor() * bin_width;
        let num_bins = ((max - first_start) / bin_width).floor() as usize + 1;

        let mut bins = (0..num_bins)
            .map(|idx| HistogramBin {
                // Recompute from the origin to avoid accumulating rounding error
                range: first_start + idx as f64 * bin_width
                    ..first_start + (idx + 1) as f64 * bin_width,
                count: 0,
            })
            .collect::<Vec<_>>();

        for value in values {
            let idx = ((value - first_start) / bin_width).floor() as usize;
            bins[idx.min(num_bins - 1)].count += 1;
        }

        Self { bins }
    }

    /// Returns the total number of values counted.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }
}
