//! Manager/performance deviation analysis
//!
//! For each manager, the share of their reports in each performance label is
//! compared with the average share across all managers. A positive deviation
//! means the manager rates more people into that label than managers do on
//! average.
//!
//! ```text
//! percent[m][l]   = count[m][l] / Σ_l count[m][l] * 100
//! mean[l]         = mean of percent[m][l] over managers with count[m][l] > 0
//! deviation[m][l] = percent[m][l] - mean[l]
//! ```
//!
//! A cell is present only when the manager has at least one employee with
//! that label. Absent cells carry no percentage, contribute nothing to the
//! label mean and get no deviation.
//!
//! Rows with a null manager or a null score are excluded. Scores outside
//! [`PerformanceLabel`]'s domain are excluded too, but counted separately as
//! `unmapped` so the caller can surface them.

use std::collections::BTreeMap;

use hrscope_stats::contingency::ContingencyTable;
use serde::{Deserialize, Serialize};

use crate::record::CleanedDataset;

/// Performance score label, totally mapped from score ids 1 to 4.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum PerformanceLabel {
    #[display("Fully Meets")]
    FullyMeets,
    #[display("Partially Meets")]
    PartiallyMeets,
    #[display("PIP")]
    Pip,
    #[display("Exceeds")]
    Exceeds,
}

impl PerformanceLabel {
    pub const ALL: [Self; 4] = [
        Self::FullyMeets,
        Self::PartiallyMeets,
        Self::Pip,
        Self::Exceeds,
    ];

    /// Maps a score id to its label; ids outside 1 to 4 are unmapped.
    #[must_use]
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::FullyMeets),
            2 => Some(Self::PartiallyMeets),
            3 => Some(Self::Pip),
            4 => Some(Self::Exceeds),
            _ => None,
        }
    }

    #[must_use]
    pub fn id(self) -> i64 {
        match self {
            Self::FullyMeets => 1,
            Self::PartiallyMeets => 2,
            Self::Pip => 3,
            Self::Exceeds => 4,
        }
    }
}

/// Manager x performance-label grid of percentages and their deviation from the column mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceDeviation {
    /// Labels observed in the retained rows, in id order.
    pub labels: Vec<PerformanceLabel>,
    /// Row-normalized percentages of present cells; every manager row sums to 100.
    pub percentages: BTreeMap<String, BTreeMap<PerformanceLabel, f64>>,
    /// Mean percentage per label across the managers that have the label.
    pub column_means: BTreeMap<PerformanceLabel, f64>,
    /// `percentages - column_means` for every present cell.
    pub deviations: BTreeMap<String, BTreeMap<PerformanceLabel, f64>>,
    /// Rows whose manager is set but whose score id is outside the label domain.
    pub unmapped: usize,
    /// Rows dropped because the manager or the score is null.
    pub excluded_null: usize,
}

impl PerformanceDeviation {
    /// Returns the largest absolute deviation in the grid, 0 for an empty grid.
    #[must_use]
    pub fn max_abs_deviation(&self) -> f64 {
        self.deviations
            .values()
            .flat_map(BTreeMap::values)
            .fold(0.0, |acc: f64, d| acc.max(d.abs()))
    }
}

/// Computes the manager x performance deviation table.
///
/// # Examples
///
/// ```
/// use hrscope_analysis::performance::{PerformanceLabel, performance_deviation};
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
///     employee(2, "Ann", 4),
///     employee(3, "Bob", 1),
///     employee(4, "Bob", 1),
/// ]);
/// let table = performance_deviation(&dataset);
///
/// // Ann: 50% Fully Meets, Bob: 100%, mean 75%
/// assert_eq!(table.column_means[&PerformanceLabel::FullyMeets], 75.0);
/// assert_eq!(table.deviations["Ann"][&PerformanceLabel::FullyMeets], -25.0);
///
/// // only Ann rates anyone Exceeds, so Bob has no cell there
/// assert_eq!(table.column_means[&PerformanceLabel::Exceeds], 50.0);
/// assert_eq!(table.deviations["Ann"][&PerformanceLabel::Exceeds], 0.0);
/// assert!(!table.deviations["Bob"].contains_key(&PerformanceLabel::Exceeds));
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn performance_deviation(dataset: &CleanedDataset) -> PerformanceDeviation {
    let mut unmapped = 0;
    let mut excluded_null = 0;
    let mut pairs = vec![];

    for record in dataset {
        let (Some(manager), Some(id)) = (&record.manager_name, record.perf_score_id) else {
            excluded_null += 1;
            continue;
        };
        let Some(label) = PerformanceLabel::from_id(id) else {
            log::debug!("employee {}: unmapped performance score id {id}", record.emp_id);
            unmapped += 1;
            continue;
        };
        pairs.push((manager.clone(), label));
    }
    if unmapped > 0 {
        log::warn!("{unmapped} rows have a performance score id outside 1..=4 and were excluded");
    }

    let table = ContingencyTable::from_pairs(pairs);
    let labels = table.columns().to_vec();

    let percentages = table
        .rows()
        .iter()
        .zip(table.counts())
        .zip(table.row_totals())
        .filter(|(_, total)| *total > 0)
        .map(|((manager, counts), total)| {
            let row = labels
                .iter()
                .zip(counts)
                .filter(|(_, count)| **count > 0)
                .map(|(&label, &count)| (label, count as f64 / total as f64 * 100.0))
                .collect::<BTreeMap<_, _>>();
            (manager.clone(), row)
        })
        .collect::<BTreeMap<_, _>>();

    let column_means = labels
        .iter()
        .map(|label| {
            // every observed label is present in at least one row
            let values = percentages
                .values()
                .filter_map(|row| row.get(label))
                .collect::<Vec<_>>();
            let mean = values.iter().copied().sum::<f64>() / values.len() as f64;
            (*label, mean)
        })
        .collect::<BTreeMap<_, _>>();

    let deviations = percentages
        .iter()
        .map(|(manager, row)| {
            let row = row
                .iter()
                .map(|(label, percent)| (*label, percent - column_means[label]))
                .collect();
            (manager.clone(), row)
        })
        .collect();

    PerformanceDeviation {
        labels,
        percentages,
        column_means,
        deviations,
        unmapped,
        excluded_null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_util::with_manager;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_label_mapping_is_total_over_domain() {
        for label in PerformanceLabel::ALL {
            assert_eq!(PerformanceLabel::from_id(label.id()), Some(label));
        }
        assert_eq!(PerformanceLabel::from_id(0), None);
        assert_eq!(PerformanceLabel::from_id(5), None);
        assert_eq!(PerformanceLabel::Pip.to_string(), "PIP");
        assert_eq!(PerformanceLabel::PartiallyMeets.to_string(), "Partially Meets");
    }

    #[test]
    fn test_rows_sum_to_hundred() {
        let dataset = CleanedDataset::new(vec![
            with_manager(1, Some("A"), Some(1)),
            with_manager(2, Some("A"), Some(2)),
            with_manager(3, Some("A"), Some(2)),
            with_manager(4, Some("B"), Some(3)),
            with_manager(5, Some("B"), Some(4)),
            with_manager(6, Some("C"), Some(1)),
        ]);
        let result = performance_deviation(&dataset);
        assert_eq!(result.percentages.len(), 3);
        for row in result.percentages.values() {
            assert!((row.values().sum::<f64>() - 100.0).abs() < EPSILON);
        }
        // C only has Fully Meets
        assert_eq!(result.percentages["C"].len(), 1);
    }

    #[test]
    fn test_identical_distributions_have_zero_deviation() {
        let mut records = vec![];
        let mut id = 0;
        for manager in ["A", "B", "C"] {
            for score in [1, 1, 2, 4] {
                id += 1;
                records.push(with_manager(id, Some(manager), Some(score)));
            }
        }
        let result = performance_deviation(&CleanedDataset::new(records));
        assert!(result.max_abs_deviation() < EPSILON);
        assert!((result.column_means[&PerformanceLabel::FullyMeets] - 50.0).abs() < EPSILON);
    }

    #[test]
    fn test_scaled_identical_distributions_have_zero_deviation() {
        let mut records = vec![];
        let mut id = 0;
        for (manager, copies) in [("A", 1), ("B", 3)] {
            for _ in 0..copies {
                for score in [1, 3] {
                    id += 1;
                    records.push(with_manager(id, Some(manager), Some(score)));
                }
            }
        }
        let result = performance_deviation(&CleanedDataset::new(records));
        assert!(result.max_abs_deviation() < EPSILON);
    }

    #[test]
    fn test_column_deviations_sum_to_zero() {
        let dataset = CleanedDataset::new(vec![
            with_manager(1, Some("A"), Some(1)),
            with_manager(2, Some("A"), Some(3)),
            with_manager(3, Some("B"), Some(1)),
            with_manager(4, Some("C"), Some(4)),
            with_manager(5, Some("C"), Some(4)),
            with_manager(6, Some("C"), Some(1)),
        ]);
        let result = performance_deviation(&dataset);
        for label in &result.labels {
            let sum = result
                .deviations
                .values()
                .filter_map(|row| row.get(label))
                .sum::<f64>();
            assert!(sum.abs() < EPSILON, "label {label}: {sum}");
        }
    }

    #[test]
    fn test_nulls_and_unmapped_are_excluded_and_counted() {
        let dataset = CleanedDataset::new(vec![
            with_manager(1, Some("A"), Some(1)),
            with_manager(2, Some("A"), Some(7)),
            with_manager(3, None, Some(1)),
            with_manager(4, Some("B"), None),
            with_manager(5, Some("B"), Some(2)),
        ]);
        let result = performance_deviation(&dataset);
        assert_eq!(result.unmapped, 1);
        assert_eq!(result.excluded_null, 2);
        assert_eq!(
            result.labels,
            vec![PerformanceLabel::FullyMeets, PerformanceLabel::PartiallyMeets]
        );
        assert!((result.percentages["A"][&PerformanceLabel::FullyMeets] - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_absent_cells_do_not_contribute_to_column_mean() {
        let dataset = CleanedDataset::new(vec![
            with_manager(1, Some("Ann"), Some(1)),
            with_manager(2, Some("Ann"), Some(4)),
            with_manager(3, Some("Bob"), Some(1)),
            with_manager(4, Some("Bob"), Some(1)),
        ]);
        let result = performance_deviation(&dataset);

        assert!((result.column_means[&PerformanceLabel::Exceeds] - 50.0).abs() < EPSILON);
        assert!((result.column_means[&PerformanceLabel::FullyMeets] - 75.0).abs() < EPSILON);
        assert!(!result.percentages["Bob"].contains_key(&PerformanceLabel::Exceeds));
        assert!(!result.deviations["Bob"].contains_key(&PerformanceLabel::Exceeds));
        assert!(result.deviations["Ann"][&PerformanceLabel::Exceeds].abs() < EPSILON);
        assert!((result.deviations["Bob"][&PerformanceLabel::FullyMeets] - 25.0).abs() < EPSILON);
        assert_eq!(
            result.labels,
            vec![PerformanceLabel::FullyMeets, PerformanceLabel::Exceeds]
        );
    }

    #[test]
    fn test_empty_dataset() {
        let result = performance_deviation(&CleanedDataset::default());
        assert!(result.labels.is_empty());
        assert!(result.deviations.is_empty());
        assert!(result.column_means.is_empty());
    }
}
