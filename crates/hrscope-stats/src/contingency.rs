//! Two-way contingency tables
//!
//! A contingency table counts how often each (row category, column category)
//! pair occurs in a set of observations. Row and column categories are exactly
//! the distinct values observed, kept in sorted order, so a table never has an
//! all-zero row or column.
//!
//! # Examples
//!
//! ```
//! use hrscope_stats::contingency::ContingencyTable;
//!
//! let table = ContingencyTable::from_pairs([("x", 1), ("x", 2), ("y", 2), ("y", 2)]);
//!
//! assert_eq!(table.rows(), &["x", "y"]);
//! assert_eq!(table.columns(), &[1, 2]);
//! assert_eq!(table.counts(), &[vec![1, 1], vec![0, 2]]);
//! assert_eq!(table.grand_total(), 4);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

/// Observed co-occurrence counts of two categorical variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContingencyTable<R, C> {
    rows: Vec<R>,
    columns: Vec<C>,
    /// Row-major counts, `counts[row][column]`.
    counts: Vec<Vec<u64>>,
}

impl<R, C> ContingencyTable<R, C>
where
    R: Ord + Clone,
    C: Ord + Clone,
{
    /// Builds a table from `(row, column)` observations.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
    {
        let mut cells: BTreeMap<R, BTreeMap<C, u64>> = BTreeMap::new();
        for (row, column) in pairs {
            *cells.entry(row).or_default().entry(column).or_insert(0) += 1;
        }

        let mut columns = cells
            .values()
            .flat_map(|row| row.keys().cloned())
            .collect::<Vec<_>>();
        columns.sort();
        columns.dedup();

        let counts = cells
            .values()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| row.get(column).copied().unwrap_or(0))
                    .collect()
            })
            .collect();
        let rows = cells.into_keys().collect();

        Self {
            rows,
            columns,
            counts,
        }
    }
}

impl<R, C> ContingencyTable<R, C> {
    /// Row categories in ascending order.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Column categories in ascending order.
    #[must_use]
    pub fn columns(&self) -> &[C] {
        &self.columns
    }

    /// Row-major count matrix aligned with [`rows`](Self::rows) and [`columns`](Self::columns).
    #[must_use]
    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Returns `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    #[must_use]
    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    #[must_use]
    pub fn column_totals(&self) -> Vec<u64> {
        (0..self.columns.len())
            .map(|c| self.counts.iter().map(|row| row[c]).sum())
            .collect()
    }

    /// Total number of observations.
    #[must_use]
    pub fn grand_total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Frequencies expected under independence: `row_total * column_total / grand_total`.
    ///
    /// Returns an empty matrix for an empty table.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn expected(&self) -> Vec<Vec<f64>> {
        let grand_total = self.grand_total();
        if grand_total == 0 {
            return vec![];
        }
        let grand_total = grand_total as f64;
        let column_totals = self.column_totals();
        self.row_totals()
            .into_iter()
            .map(|row_total| {
                column_totals
                    .iter()
                    .map(|&column_total| row_total as f64 * column_total as f64 / grand_total)
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        let table = ContingencyTable::<u32, u32>::from_pairs([]);
        assert_eq!(table.shape(), (0, 0));
        assert_eq!(table.grand_total(), 0);
        assert!(table.expected().is_empty());
    }

    #[test]
    fn test_unobserved_combinations_are_zero() {
        let table = ContingencyTable::from_pairs([("a", 'x'), ("b", 'y')]);
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.rows(), &["a", "b"]);
        assert_eq!(table.columns(), &['x', 'y']);
        assert_eq!(table.counts(), &[vec![1, 0], vec![0, 1]]);
    }

    #[test]
    fn test_totals_are_consistent() {
        let pairs = [
            (1, "p"),
            (1, "q"),
            (1, "q"),
            (2, "p"),
            (3, "r"),
            (3, "r"),
            (3, "p"),
        ];
        let table = ContingencyTable::from_pairs(pairs);

        assert_eq!(table.grand_total(), pairs.len() as u64);
        assert_eq!(table.row_totals(), vec![3, 1, 3]);
        assert_eq!(table.column_totals(), vec![3, 2, 2]);
        assert_eq!(
            table.row_totals().iter().sum::<u64>(),
            table.column_totals().iter().sum::<u64>()
        );
        assert!(table.counts().iter().all(|row| row.len() == 3));
    }

    #[test]
    fn test_expected_preserves_margins() {
        let table = ContingencyTable::from_pairs([
            ("a", 1),
            ("a", 1),
            ("a", 2),
            ("b", 2),
            ("b", 2),
            ("b", 2),
        ]);
        let expected = table.expected();
        let row_sums = expected.iter().map(|r| r.iter().sum::<f64>()).collect::<Vec<_>>();
        assert!((row_sums[0] - 3.0).abs() < 1e-12);
        assert!((row_sums[1] - 3.0).abs() < 1e-12);
        // 3 * 2 / 6
        assert!((expected[0][0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_serializes_categories_and_counts() {
        let table = ContingencyTable::from_pairs([("a", 1), ("b", 1)]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["rows"], serde_json::json!(["a", "b"]));
        assert_eq!(json["counts"], serde_json::json!([[1], [1]]));
    }
}
