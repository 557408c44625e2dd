//! Association between manager and performance label
//!
//! Builds the manager x label contingency table and runs Pearson's
//! chi-squared test of independence on it, reporting Cramér's V as the
//! effect size.
//!
//! The outcome is an explicit three-way result:
//!
//! - `Ok` with `warning: None`: the test is reliable.
//! - `Ok` with `warning: Some(..)`: the test ran, but at least one expected
//!   frequency is below the configured threshold and the p-value should be
//!   read with care.
//! - `Err(AssociationError::DegenerateTable)`: fewer than two managers or two
//!   labels; no statistic exists.

use hrscope_stats::{
    chi_squared::{ChiSquaredTest, DegenerateTableError},
    contingency::ContingencyTable,
};
use serde::{Deserialize, Serialize};

use crate::{performance::PerformanceLabel, record::CleanedDataset};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssociationOptions {
    /// Expected frequency below which the result carries a warning.
    pub min_expected_frequency: f64,
}

impl Default for AssociationOptions {
    fn default() -> Self {
        Self {
            min_expected_frequency: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AssociationError {
    #[display(
        "cannot test association on a {rows}x{columns} table: at least 2 managers and 2 performance labels are required"
    )]
    DegenerateTable { rows: usize, columns: usize },
}

impl From<DegenerateTableError> for AssociationError {
    fn from(err: DegenerateTableError) -> Self {
        Self::DegenerateTable {
            rows: err.rows,
            columns: err.columns,
        }
    }
}

/// Some expected cell frequency is too small for the chi-squared approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, derive_more::Display)]
#[display("minimum expected frequency {min_expected:.2} is below {threshold}; the chi-squared approximation may be unreliable")]
pub struct LowExpectedFrequencyWarning {
    pub min_expected: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationResult {
    pub observed: ContingencyTable<String, PerformanceLabel>,
    pub test: ChiSquaredTest,
    pub cramers_v: f64,
    pub warning: Option<LowExpectedFrequencyWarning>,
    /// Rows skipped for a null manager, a null score or an unmapped score.
    pub excluded: usize,
}

impl AssociationResult {
    #[must_use]
    pub fn statistic(&self) -> f64 {
        self.test.statistic
    }

    #[must_use]
    pub fn p_value(&self) -> f64 {
        self.test.p_value
    }

    #[must_use]
    pub fn degrees_of_freedom(&self) -> usize {
        self.test.degrees_of_freedom
    }

    /// Expected frequencies, aligned with `observed.rows()` x `observed.columns()`.
    #[must_use]
    pub fn expected(&self) -> &[Vec<f64>] {
        &self.test.expected
    }

    /// Whether independence is rejected at significance level `alpha`.
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.test.p_value < alpha
    }
}

/// Tests whether performance labels depend on the manager.
///
/// # Examples
///
/// ```
/// use hrscope_analysis::association::{AssociationOptions, chi_squared_association};
/// # use hrscope_analysis::record::{CleanedDataset, EmployeeId, EmployeeRecord};
/// # use chrono::NaiveDate;
/// # let employee = |id: u64, manager: &str, score: i64| EmployeeRecord {
/// #     emp_id: EmployeeId(id),
/// #     manager_name: Some(manager.to_owned()),
/// #     perf_score_id: Some(score),
/// #     date_of_birth: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
/// #     date_of_hire: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
/// #     date_of_termination: None,
/// #     recruitment_source: None,
/// #     marital_status: None,
/// #     emp_satisfaction: None,
/// #     employment_status: None,
/// #     special_projects_count: None,
/// # };
/// let dataset = CleanedDataset::new(vec![
///     employee(1, "Ann", 1),
///     employee(2, "Ann", 1),
///     employee(3, "Bob", 4),
///     employee(4, "Bob", 4),
/// ]);
/// let result = chi_squared_association(&dataset, &AssociationOptions::default()).unwrap();
///
/// assert_eq!(result.degrees_of_freedom(), 1);
/// assert!((result.cramers_v - 1.0).abs() < 1e-12);
/// // four observations cannot satisfy the expected-frequency rule
/// assert!(result.warning.is_some());
/// ```
pub fn chi_squared_association(
    dataset: &CleanedDataset,
    options: &AssociationOptions,
) -> Result<AssociationResult, AssociationError> {
    let mut excluded = 0;
    let pairs = dataset
        .iter()
        .filter_map(|record| {
            let pair = record
                .manager_name
                .clone()
                .zip(record.performance_label());
            if pair.is_none() {
                excluded += 1;
            }
            pair
        })
        .collect::<Vec<_>>();

    let observed = ContingencyTable::from_pairs(pairs);
    let (rows, columns) = observed.shape();
    log::info!(
        "association table: {rows} managers x {columns} labels, {} observations, {excluded} rows excluded",
        observed.grand_total()
    );

    let test = ChiSquaredTest::from_table(&observed)?;
    let cramers_v = test.cramers_v(rows, columns)?;

    let warning = (test.min_expected < options.min_expected_frequency).then(|| {
        let warning = LowExpectedFrequencyWarning {
            min_expected: test.min_expected,
            threshold: options.min_expected_frequency,
        };
        log::warn!("{warning}");
        warning
    });

    Ok(AssociationResult {
        observed,
        test,
        cramers_v,
        warning,
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_util::with_manager;

    fn dataset(cells: &[(&str, i64, usize)]) -> CleanedDataset {
        let mut records = vec![];
        let mut id = 0;
        for &(manager, score, n) in cells {
            for _ in 0..n {
                id += 1;
                records.push(with_manager(id, Some(manager), Some(score)));
            }
        }
        CleanedDataset::new(records)
    }

    #[test]
    fn test_independent_table_has_zero_statistic() {
        // B's row is three times A's row
        let dataset = dataset(&[("A", 1, 4), ("A", 2, 2), ("B", 1, 12), ("B", 2, 6)]);
        let result = chi_squared_association(&dataset, &AssociationOptions::default()).unwrap();
        assert!(result.statistic().abs() < 1e-9);
        assert!((result.p_value() - 1.0).abs() < 1e-9);
        assert!(result.cramers_v.abs() < 1e-6);
        assert!(!result.is_significant(0.05));
    }

    #[test]
    fn test_single_manager_is_degenerate() {
        let dataset = dataset(&[("A", 1, 3), ("A", 2, 3), ("A", 4, 1)]);
        let err = chi_squared_association(&dataset, &AssociationOptions::default()).unwrap_err();
        assert_eq!(err, AssociationError::DegenerateTable { rows: 1, columns: 3 });
    }

    #[test]
    fn test_single_label_is_degenerate() {
        let dataset = dataset(&[("A", 1, 3), ("B", 1, 3)]);
        let err = chi_squared_association(&dataset, &AssociationOptions::default()).unwrap_err();
        assert_eq!(err, AssociationError::DegenerateTable { rows: 2, columns: 1 });
    }

    #[test]
    fn test_empty_dataset_is_degenerate() {
        let err =
            chi_squared_association(&CleanedDataset::default(), &AssociationOptions::default())
                .unwrap_err();
        assert_eq!(err, AssociationError::DegenerateTable { rows: 0, columns: 0 });
    }

    #[test]
    fn test_strong_association_is_significant_without_warning() {
        let dataset = dataset(&[("A", 1, 40), ("A", 4, 5), ("B", 1, 5), ("B", 4, 40)]);
        let result = chi_squared_association(&dataset, &AssociationOptions::default()).unwrap();
        assert!(result.warning.is_none());
        assert!(result.is_significant(0.05));
        assert!(result.cramers_v > 0.5 && result.cramers_v <= 1.0);
        assert_eq!(result.observed.grand_total(), 90);
    }

    #[test]
    fn test_low_expected_frequency_is_flagged() {
        let dataset = dataset(&[("A", 1, 3), ("A", 2, 1), ("B", 1, 1), ("B", 2, 3)]);
        let result = chi_squared_association(&dataset, &AssociationOptions::default()).unwrap();
        let warning = result.warning.unwrap();
        assert!((warning.min_expected - 2.0).abs() < 1e-12);
        assert!((warning.threshold - 5.0).abs() < 1e-12);

        let lenient = AssociationOptions {
            min_expected_frequency: 1.0,
        };
        assert!(chi_squared_association(&dataset, &lenient).unwrap().warning.is_none());
    }

    #[test]
    fn test_null_and_unmapped_rows_are_excluded() {
        let mut dataset = dataset(&[("A", 1, 2), ("A", 2, 2), ("B", 1, 2), ("B", 2, 2)]);
        dataset.records.push(with_manager(100, None, Some(1)));
        dataset.records.push(with_manager(101, Some("A"), None));
        dataset.records.push(with_manager(102, Some("C"), Some(9)));
        let result = chi_squared_association(&dataset, &AssociationOptions::default()).unwrap();
        assert_eq!(result.excluded, 3);
        assert_eq!(result.observed.rows(), ["A", "B"]);
        assert_eq!(result.observed.grand_total(), 8);
    }
}
