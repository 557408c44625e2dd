//! Grouped counts and grouped means over a cleaned dataset.
//!
//! Grouping is driven by key and value accessor closures instead of column
//! names, so every analysis states exactly which record fields it reads.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    derived::compute_tenure_years,
    record::{CleanedDataset, EmployeeRecord},
};

/// Number of records per key, with records lacking a key counted separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCounts<K: Ord> {
    pub counts: BTreeMap<K, usize>,
    /// Records whose key was null.
    pub missing: usize,
}

impl<K: Ord> Default for GroupCounts<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            missing: 0,
        }
    }
}

impl<K: Ord> GroupCounts<K> {
    /// Sum of the keyed counts, excluding `missing`.
    #[must_use]
    pub fn keyed_total(&self) -> usize {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.keyed_total() + self.missing
    }

    /// Entries sorted by descending count, ties by key.
    #[must_use]
    pub fn sorted_by_count(&self) -> Vec<(&K, usize)> {
        let mut entries = self.counts.iter().map(|(k, &n)| (k, n)).collect::<Vec<_>>();
        entries.sort_by(|(ka, na), (kb, nb)| nb.cmp(na).then_with(|| ka.cmp(kb)));
        entries
    }
}

/// Counts records per key; every record is counted exactly once.
pub fn count_by<K, F>(dataset: &CleanedDataset, mut key_fn: F) -> GroupCounts<K>
where
    K: Ord,
    F: FnMut(&EmployeeRecord) -> Option<K>,
{
    let mut result = GroupCounts::default();
    for record in dataset {
        match key_fn(record) {
            Some(key) => *result.counts.entry(key).or_insert(0) += 1,
            None => result.missing += 1,
        }
    }
    result
}

/// Employee counts per manager; employees without a manager are `unassigned`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagerCounts {
    pub by_manager: BTreeMap<String, usize>,
    pub unassigned: usize,
}

/// Counts employees per manager.
///
/// ```
/// use hrscope_analysis::grouping::count_by_manager;
/// # use hrscope_analysis::record::{CleanedDataset, EmployeeId, EmployeeRecord};
/// # use chrono::NaiveDate;
/// # let employee = |id: u64, manager: Option<&str>| EmployeeRecord {
/// #     emp_id: EmployeeId(id),
/// #     manager_name: manager.map(str::to_owned),
/// #     perf_score_id: None,
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
///     employee(1, Some("Ann")),
///     employee(2, Some("Ann")),
///     employee(3, None),
/// ]);
/// let counts = count_by_manager(&dataset);
/// assert_eq!(counts.by_manager["Ann"], 2);
/// assert_eq!(counts.unassigned, 1);
/// ```
#[must_use]
pub fn count_by_manager(dataset: &CleanedDataset) -> ManagerCounts {
    let GroupCounts { counts, missing } = count_by(dataset, |r| r.manager_name.clone());
    log::info!(
        "{} managers, {missing} employees without a manager",
        counts.len()
    );
    ManagerCounts {
        by_manager: counts,
        unassigned: missing,
    }
}

/// Counts employees per employment status.
#[must_use]
pub fn count_by_employment_status(dataset: &CleanedDataset) -> GroupCounts<String> {
    count_by(dataset, |r| r.employment_status.clone())
}

/// Mean and extremes of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean<K> {
    pub key: K,
    pub mean: f64,
    pub count: usize,
    pub min: f64,
    pub max: f64,
}

/// Per-group means sorted by descending mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedMeans<K> {
    pub entries: Vec<GroupMean<K>>,
    /// Records skipped because the group or the value was null.
    pub excluded: usize,
}

impl<K: PartialEq> GroupedMeans<K> {
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&GroupMean<K>> {
        self.entries.iter().find(|e| &e.key == key)
    }
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn new(value: f64) -> Self {
        Self {
            sum: value,
            count: 1,
            min: value,
            max: value,
        }
    }

    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Groups records by `group_fn` and averages `value_fn` within each group.
///
/// Records where either accessor returns `None` are excluded before grouping,
/// so no group is ever reported with zero members.
#[expect(clippy::cast_precision_loss)]
pub fn grouped_mean<K, G, V>(dataset: &CleanedDataset, mut group_fn: G, mut value_fn: V) -> GroupedMeans<K>
where
    K: Ord,
    G: FnMut(&EmployeeRecord) -> Option<K>,
    V: FnMut(&EmployeeRecord) -> Option<f64>,
{
    let mut groups = BTreeMap::<K, Accumulator>::new();
    let mut excluded = 0;
    for record in dataset {
        let (Some(key), Some(value)) = (group_fn(record), value_fn(record)) else {
            excluded += 1;
            continue;
        };
        groups
            .entry(key)
            .and_modify(|acc| acc.push(value))
            .or_insert_with(|| Accumulator::new(value));
    }

    let mut entries = groups
        .into_iter()
        .map(|(key, acc)| GroupMean {
            key,
            mean: acc.sum / acc.count as f64,
            count: acc.count,
            min: acc.min,
            max: acc.max,
        })
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| b.mean.total_cmp(&a.mean).then_with(|| a.key.cmp(&b.key)));

    GroupedMeans { entries, excluded }
}

/// Mean seniority in years per recruitment source.
#[must_use]
pub fn seniority_by_recruitment_source(
    dataset: &CleanedDataset,
    reference: NaiveDate,
) -> GroupedMeans<String> {
    grouped_mean(
        dataset,
        |r| r.recruitment_source.clone(),
        |r| {
            Some(compute_tenure_years(
                r.date_of_hire,
                r.date_of_termination,
                reference,
            ))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_util::{date, employee, with_manager};

    #[test]
    fn test_manager_counts_sum_to_non_null_rows() {
        let dataset = CleanedDataset::new(vec![
            with_manager(1, Some("A"), None),
            with_manager(2, Some("B"), None),
            with_manager(3, Some("A"), None),
            with_manager(4, None, None),
            with_manager(5, None, None),
        ]);
        let counts = count_by_manager(&dataset);
        let non_null = dataset.iter().filter(|r| r.manager_name.is_some()).count();
        assert_eq!(counts.by_manager.values().sum::<usize>(), non_null);
        assert_eq!(counts.by_manager.values().sum::<usize>() + counts.unassigned, dataset.len());
        assert_eq!(counts.by_manager["A"], 2);
        assert_eq!(counts.unassigned, 2);
    }

    #[test]
    fn test_count_by_sorted_by_count() {
        let statuses = ["Active", "Voluntarily Terminated", "Active", "Active"];
        let records = statuses
            .iter()
            .zip(1..)
            .map(|(status, id)| EmployeeRecord {
                employment_status: Some((*status).to_owned()),
                ..employee(id)
            })
            .collect();
        let counts = count_by_employment_status(&CleanedDataset::new(records));
        assert_eq!(counts.total(), 4);
        let sorted = counts.sorted_by_count();
        assert_eq!(sorted[0], (&"Active".to_owned(), 3));
        assert_eq!(sorted[1].1, 1);
    }

    #[test]
    fn test_grouped_mean_excludes_null_values_and_empty_groups() {
        let records = vec![
            EmployeeRecord {
                recruitment_source: Some("Indeed".to_owned()),
                special_projects_count: Some(2),
                ..employee(1)
            },
            EmployeeRecord {
                recruitment_source: Some("Indeed".to_owned()),
                special_projects_count: Some(6),
                ..employee(2)
            },
            // only member has a null value: the group must not appear
            EmployeeRecord {
                recruitment_source: Some("Website".to_owned()),
                special_projects_count: None,
                ..employee(3)
            },
            EmployeeRecord {
                recruitment_source: None,
                special_projects_count: Some(1),
                ..employee(4)
            },
        ];
        let means = grouped_mean(
            &CleanedDataset::new(records),
            |r| r.recruitment_source.clone(),
            |r| r.special_projects_count.map(f64::from),
        );
        assert_eq!(means.entries.len(), 1);
        assert_eq!(means.excluded, 2);
        let indeed = means.get(&"Indeed".to_owned()).unwrap();
        assert_eq!(indeed.count, 2);
        assert!((indeed.mean - 4.0).abs() < 1e-12);
        assert!((indeed.min - 2.0).abs() < 1e-12);
        assert!((indeed.max - 6.0).abs() < 1e-12);
        assert!(means.get(&"Website".to_owned()).is_none());
        assert!(means.entries.iter().all(|e| e.mean.is_finite()));
    }

    #[test]
    fn test_grouped_mean_sorted_descending() {
        let records = [("a", 1), ("b", 5), ("c", 3), ("d", 5)]
            .into_iter()
            .zip(1..)
            .map(|((source, projects), id)| EmployeeRecord {
                recruitment_source: Some(source.to_owned()),
                special_projects_count: Some(projects),
                ..employee(id)
            })
            .collect();
        let means = grouped_mean(
            &CleanedDataset::new(records),
            |r| r.recruitment_source.clone(),
            |r| r.special_projects_count.map(f64::from),
        );
        let keys = means.entries.iter().map(|e| e.key.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, ["b", "d", "c", "a"]);
    }

    #[test]
    fn test_seniority_by_recruitment_source() {
        let reference = date(2019, 9, 27);
        let records = vec![
            EmployeeRecord {
                recruitment_source: Some("LinkedIn".to_owned()),
                date_of_hire: date(2010, 1, 1),
                date_of_termination: None,
                ..employee(1)
            },
            EmployeeRecord {
                recruitment_source: Some("LinkedIn".to_owned()),
                date_of_hire: date(2010, 1, 1),
                date_of_termination: Some(date(2011, 1, 1)),
                ..employee(2)
            },
        ];
        let means = seniority_by_recruitment_source(&CleanedDataset::new(records), reference);
        let linkedin = &means.entries[0];
        assert_eq!(linkedin.count, 2);
        let expected = (3556.0 / 365.25 + 365.0 / 365.25) / 2.0;
        assert!((linkedin.mean - expected).abs() < 1e-12);
    }
}
