//! Age demographics and their relation to satisfaction and workload.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use hrscope_stats::{descriptive::DescriptiveStats, histogram::Histogram};
use serde::Serialize;

use crate::{
    derived::{AgeGroup, compute_age},
    grouping::{GroupedMeans, grouped_mean},
    record::CleanedDataset,
};

/// Width of the age histogram bins, in years.
const AGE_BIN_WIDTH: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeProfile {
    /// `None` when no record has a defined age.
    pub age_stats: Option<DescriptiveStats>,
    pub age_histogram: Histogram,
    /// Every age group, including empty ones, in ascending order.
    pub age_group_counts: BTreeMap<AgeGroup, u64>,
    pub satisfaction_by_age_group: GroupedMeans<AgeGroup>,
    pub special_projects_by_marital_status: GroupedMeans<String>,
    /// Records whose birth date is after the reference date.
    pub undefined_age: usize,
}

/// Summarizes the age distribution of the dataset at `reference`.
///
/// Records with an undefined age are left out of every age-based figure and
/// only show up in [`AgeProfile::undefined_age`].
#[must_use]
pub fn age_profile(dataset: &CleanedDataset, reference: NaiveDate) -> AgeProfile {
    let ages = dataset
        .iter()
        .filter_map(|r| compute_age(r.date_of_birth, reference))
        .collect::<Vec<_>>();
    let undefined_age = dataset.len() - ages.len();
    if undefined_age > 0 {
        log::warn!("{undefined_age} records have a birth date after {reference}; their age is undefined");
    }

    let age_stats = DescriptiveStats::new(ages.iter().copied().map(f64::from));
    let age_histogram = Histogram::with_bin_width(ages.iter().copied().map(f64::from), AGE_BIN_WIDTH);

    let age_group_counts = AgeGroup::count_ages(ages.iter().copied());

    let satisfaction_by_age_group = grouped_mean(
        dataset,
        |r| compute_age(r.date_of_birth, reference).and_then(AgeGroup::from_age),
        |r| r.emp_satisfaction.map(f64::from),
    );
    let special_projects_by_marital_status = grouped_mean(
        dataset,
        |r| r.marital_status.clone(),
        |r| r.special_projects_count.map(f64::from),
    );

    AgeProfile {
        age_stats,
        age_histogram,
        age_group_counts,
        satisfaction_by_age_group,
        special_projects_by_marital_status,
        undefined_age,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{
        EmployeeRecord,
        test_util::{date, employee},
    };

    fn person(id: u64, birth: NaiveDate, satisfaction: u8, marital: &str, projects: u32) -> EmployeeRecord {
        EmployeeRecord {
            date_of_birth: birth,
            emp_satisfaction: Some(satisfaction),
            marital_status: Some(marital.to_owned()),
            special_projects_count: Some(projects),
            ..employee(id)
        }
    }

    #[test]
    fn test_age_profile() {
        let reference = date(2019, 9, 27);
        let dataset = CleanedDataset::new(vec![
            person(1, date(1995, 1, 1), 5, "Single", 0),
            person(2, date(1993, 1, 1), 3, "Single", 2),
            person(3, date(1979, 1, 1), 4, "Married", 6),
            person(4, date(2052, 1, 1), 1, "Married", 4),
        ]);
        let profile = age_profile(&dataset, reference);

        assert_eq!(profile.undefined_age, 1);
        let stats = profile.age_stats.unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.min - 24.0).abs() < 1e-12);
        assert!((stats.max - 40.0).abs() < 1e-12);
        assert!((stats.median - 26.0).abs() < 1e-12);

        assert_eq!(profile.age_histogram.total(), 3);
        assert_eq!(profile.age_group_counts[&AgeGroup::Under30], 2);
        assert_eq!(profile.age_group_counts[&AgeGroup::Forties], 1);
        assert_eq!(profile.age_group_counts[&AgeGroup::SixtyPlus], 0);
        assert_eq!(profile.age_group_counts.len(), AgeGroup::ALL.len());

        let under_30 = profile.satisfaction_by_age_group.get(&AgeGroup::Under30).unwrap();
        assert!((under_30.mean - 4.0).abs() < 1e-12);
        // the undefined-age record never forms a group
        assert_eq!(profile.satisfaction_by_age_group.entries.len(), 2);
        assert_eq!(profile.satisfaction_by_age_group.excluded, 1);

        // marital status does not depend on age, so all four records count
        let married = profile
            .special_projects_by_marital_status
            .get(&"Married".to_owned())
            .unwrap();
        assert!((married.mean - 5.0).abs() < 1e-12);
        assert_eq!(profile.special_projects_by_marital_status.entries[0].key, "Married");
    }

    #[test]
    fn test_empty_dataset() {
        let profile = age_profile(&CleanedDataset::default(), date(2019, 9, 27));
        assert_eq!(profile.age_stats, None);
        assert!(profile.age_histogram.bins.is_empty());
        assert!(profile.age_group_counts.values().all(|&n| n == 0));
        assert_eq!(profile.undefined_age, 0);
    }
}
