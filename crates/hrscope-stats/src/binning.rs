//! Fixed-edge binning for data analysis
//!
//! This module maps continuous values onto a predeclared, ordered list of bin
//! edges. Unlike a histogram, whose bins are derived from the data, the edges
//! here are part of the analysis definition (for example age brackets), so the
//! same value always lands in the same bin regardless of the rest of the data.
//!
//! Bins are half-open: bin `i` covers `[edges[i], edges[i + 1])`, and the last
//! bin is unbounded above. Values below the first edge belong to no bin.
//!
//! # Examples
//!
//! ```
//! use hrscope_stats::binning::FixedBins;
//!
//! let bins = FixedBins::new([0.0, 30.0, 40.0, 50.0]).unwrap();
//!
//! assert_eq!(bins.index_of(29.9), Some(0));
//! assert_eq!(bins.index_of(30.0), Some(1));
//! assert_eq!(bins.index_of(120.0), Some(3)); // last bin is open-ended
//! assert_eq!(bins.index_of(-1.0), None);
//! ```

use std::ops::Range;

/// An ordered set of half-open bins defined by their lower edges.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedBins {
    edges: Vec<f64>,
}

impl FixedBins {
    /// Creates bins from strictly ascending lower edges.
    ///
    /// # Returns
    ///
    /// * `Some(FixedBins)` - if at least one edge is given and all edges are
    ///   finite and strictly ascending
    /// * `None` - otherwise
    #[must_use]
    pub fn new<I>(edges: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let edges = edges.into_iter().collect::<Vec<_>>();
        if edges.is_empty()
            || edges.iter().any(|e| !e.is_finite())
            || !edges.windows(2).all(|w| w[0] < w[1])
        {
            return None;
        }
        Some(Self { edges })
    }

    /// Returns the number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if there are no bins. Never the case for a constructed value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns the index of the bin containing `value`.
    ///
    /// `None` if the value is below the first edge or is NaN.
    #[must_use]
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if value.is_nan() || value < self.edges[0] {
            return None;
        }
        // number of edges <= value, minus one
        Some(self.edges.partition_point(|&edge| edge <= value) - 1)
    }

    /// Returns the range covered by bin `index`.
    ///
    /// The last bin ends at `f64::INFINITY`.
    #[must_use]
    pub fn range(&self, index: usize) -> Option<Range<f64>> {
        let start = *self.edges.get(index)?;
        let end = self.edges.get(index + 1).copied().unwrap_or(f64::INFINITY);
        Some(start..end)
    }

    /// Counts how many of `values` fall into each bin.
    ///
    /// Values outside every bin are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrscope_stats::binning::FixedBins;
    ///
    /// let bins = FixedBins::new([0.0, 10.0]).unwrap();
    /// assert_eq!(bins.count([1.0, 5.0, 12.0, -3.0]), vec![2, 1]);
    /// ```
    #[must_use]
    pub fn count<I>(&self, values: I) -> Vec<u64>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut counts = vec![0; self.len()];
        for value in values {
            if let Some(idx) = self.index_of(value) {
                counts[idx] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_edges() {
        assert!(FixedBins::new([]).is_none());
        assert!(FixedBins::new([0.0, 0.0]).is_none());
        assert!(FixedBins::new([10.0, 5.0]).is_none());
        assert!(FixedBins::new([0.0, f64::NAN]).is_none());
    }

    #[test]
    fn test_edges_are_inclusive_lower_bounds() {
        let bins = FixedBins::new([0.0, 30.0, 40.0, 50.0, 60.0]).unwrap();
        assert_eq!(bins.index_of(0.0), Some(0));
        assert_eq!(bins.index_of(39.999), Some(1));
        assert_eq!(bins.index_of(40.0), Some(2));
        assert_eq!(bins.index_of(60.0), Some(4));
        assert_eq!(bins.index_of(f64::NAN), None);
    }

    #[test]
    fn test_range_of_last_bin_is_open() {
        let bins = FixedBins::new([0.0, 30.0]).unwrap();
        assert_eq!(bins.range(0), Some(0.0..30.0));
        assert_eq!(bins.range(1), Some(30.0..f64::INFINITY));
        assert_eq!(bins.range(2), None);
    }

    #[test]
    fn test_counts_sum_to_in_range_values() {
        let bins = FixedBins::new([18.0, 30.0, 45.0]).unwrap();
        let values = [17.0, 18.0, 25.0, 30.0, 44.0, 45.0, 70.0];
        let counts = bins.count(values);
        assert_eq!(counts, vec![2, 2, 2]);
        assert_eq!(counts.iter().sum::<u64>(), 6);
    }
}
