//! Pearson's chi-squared test of independence
//!
//! Given a [`ContingencyTable`], the test compares each observed count with the
//! count expected if the row and column variables were independent:
//!
//! ```text
//! expected[r][c] = row_total[r] * column_total[c] / grand_total
//! statistic      = Σ (observed - expected)² / expected
//! dof            = (rows - 1) * (columns - 1)
//! p-value        = P(X ≥ statistic),  X ~ χ²(dof)
//! ```
//!
//! No continuity correction is applied, including for 2×2 tables.
//!
//! The test is undefined when either variable shows no variation (a single row
//! or a single column). Such tables are rejected with [`DegenerateTableError`]
//! instead of producing NaN.
//!
//! Effect size is reported as Cramér's V, see [`cramers_v`].

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::contingency::ContingencyTable;

/// The table has fewer than two categories on at least one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("degenerate contingency table ({rows}x{columns}): need at least 2 rows and 2 columns")]
pub struct DegenerateTableError {
    pub rows: usize,
    pub columns: usize,
}

/// Result of a chi-squared independence test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquaredTest {
    /// Pearson's chi-squared statistic.
    pub statistic: f64,
    /// Upper-tail probability of the statistic.
    pub p_value: f64,
    pub degrees_of_freedom: usize,
    /// Frequencies expected under independence, aligned with the table's rows and columns.
    pub expected: Vec<Vec<f64>>,
    /// Smallest value in [`expected`](Self::expected).
    pub min_expected: f64,
    /// Number of observations in the table.
    pub sample_size: u64,
}

impl ChiSquaredTest {
    /// Runs the test on an observed table.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrscope_stats::{chi_squared::ChiSquaredTest, contingency::ContingencyTable};
    ///
    /// // Both rows have the same 1:2 split, so the variables are independent.
    /// let table = ContingencyTable::from_pairs([
    ///     ("a", 1), ("a", 2), ("a", 2),
    ///     ("b", 1), ("b", 1), ("b", 2), ("b", 2), ("b", 2), ("b", 2),
    /// ]);
    /// let test = ChiSquaredTest::from_table(&table).unwrap();
    /// assert!(test.statistic.abs() < 1e-12);
    /// assert!((test.p_value - 1.0).abs() < 1e-12);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn from_table<R, C>(table: &ContingencyTable<R, C>) -> Result<Self, DegenerateTableError> {
        let (rows, columns) = table.shape();
        if rows < 2 || columns < 2 {
            return Err(DegenerateTableError { rows, columns });
        }

        let expected = table.expected();
        let statistic = table
            .counts()
            .iter()
            .zip(&expected)
            .flat_map(|(observed, expected)| observed.iter().zip(expected))
            .map(|(&observed, &expected)| (observed as f64 - expected).powi(2) / expected)
            .sum::<f64>();
        let min_expected = expected
            .iter()
            .flatten()
            .copied()
            .fold(f64::INFINITY, f64::min);

        let degrees_of_freedom = (rows - 1) * (columns - 1);
        let p_value = upper_tail_probability(statistic, degrees_of_freedom);

        Ok(Self {
            statistic,
            p_value,
            degrees_of_freedom,
            expected,
            min_expected,
            sample_size: table.grand_total(),
        })
    }

    /// Cramér's V for this test's table.
    ///
    /// `rows` and `columns` must describe the table the test was computed from.
    pub fn cramers_v(&self, rows: usize, columns: usize) -> Result<f64, DegenerateTableError> {
        cramers_v(self.statistic, self.sample_size, rows, columns)
    }
}

/// Cramér's V effect size: `sqrt((statistic / n) / min(rows - 1, columns - 1))`.
///
/// Ranges from 0 (no association) to 1 (perfect association).
///
/// # Examples
///
/// ```
/// use hrscope_stats::chi_squared::cramers_v;
///
/// // Perfect association in a 2x2 table with 10 observations has statistic 10.
/// let v = cramers_v(10.0, 10, 2, 2).unwrap();
/// assert!((v - 1.0).abs() < 1e-12);
///
/// assert!(cramers_v(3.0, 10, 1, 4).is_err());
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn cramers_v(
    statistic: f64,
    sample_size: u64,
    rows: usize,
    columns: usize,
) -> Result<f64, DegenerateTableError> {
    let min_dim = rows.min(columns).saturating_sub(1);
    if min_dim == 0 || sample_size == 0 {
        return Err(DegenerateTableError { rows, columns });
    }
    Ok(((statistic / sample_size as f64) / min_dim as f64).sqrt())
}

#[expect(clippy::cast_precision_loss)]
fn upper_tail_probability(statistic: f64, degrees_of_freedom: usize) -> f64 {
    // dof >= 1 is guaranteed by the degenerate-table check, which makes `new` infallible here
    match ChiSquared::new(degrees_of_freedom as f64) {
        Ok(distribution) => distribution.sf(statistic.max(0.0)).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}
