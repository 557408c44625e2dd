//! Retention analysis on right-censored tenure
//!
//! An employee's tenure ends in one of two ways:
//!
//! - **Terminated**: the termination date is known (event observed)
//! - **Censored**: still employed at the reference date (event not observed)
//!
//! ```text
//! Terminated: |----x    (left after 3.2 years)
//! Censored:   |------->  (still here after 5.0 years, true tenure unknown)
//! ```
//!
//! Averaging tenure over everyone underestimates how long people stay,
//! because long-serving employees are the ones most likely to still be
//! censored. The Kaplan-Meier median accounts for that.
//!
//! # Examples
//!
//! ```
//! use hrscope_analysis::retention::RetentionStats;
//!
//! // (tenure_years, is_censored)
//! let data = [(1.0, false), (2.5, true), (3.0, false), (6.0, true)];
//! let stats = RetentionStats::from_data(&data);
//!
//! assert_eq!(stats.employees_count, 4);
//! assert_eq!(stats.censored_count, 2);
//! assert_eq!(stats.mean_terminated, 2.0);
//! assert!(stats.median_km.is_some());
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDate;
use hrscope_stats::survival::KaplanMeierCurve;
use serde::Serialize;

use crate::{
    derived::compute_tenure_years,
    record::{CleanedDataset, EmployeeRecord},
};

/// Retention statistics for a group of employees; times are in years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionStats {
    pub employees_count: usize,
    /// Employees still employed at the reference date.
    pub censored_count: usize,
    /// Mean tenure of terminated employees only, 0 when nobody left.
    pub mean_terminated: f64,
    /// Naive mean tenure over everyone, biased low by censoring.
    pub mean_all: f64,
    /// Kaplan-Meier median tenure, `None` when fewer than half ever leave.
    pub median_km: Option<f64>,
    pub km_curve: KaplanMeierCurve,
}

impl RetentionStats {
    /// Computes statistics from `(tenure_years, is_censored)` pairs.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_data(data: &[(f64, bool)]) -> Self {
        let employees_count = data.len();
        let censored_count = data.iter().filter(|(_, c)| *c).count();

        let terminated = data
            .iter()
            .filter(|(_, c)| !*c)
            .map(|(t, _)| *t)
            .collect::<Vec<_>>();
        let mean_terminated = if terminated.is_empty() {
            0.0
        } else {
            terminated.iter().sum::<f64>() / terminated.len() as f64
        };
        let mean_all = if data.is_empty() {
            0.0
        } else {
            data.iter().map(|(t, _)| t).sum::<f64>() / employees_count as f64
        };

        let km_curve = KaplanMeierCurve::from_data(data.to_vec());
        let median_km = km_curve.median_survival();

        Self {
            employees_count,
            censored_count,
            mean_terminated,
            mean_all,
            median_km,
            km_curve,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionStatsMap<K: Ord> {
    pub map: BTreeMap<K, RetentionStats>,
    /// Records left out because their tenure was negative.
    pub negative_tenure: usize,
    /// Records left out because the group key was null.
    pub ungrouped: usize,
}

impl<K: Ord> RetentionStatsMap<K> {
    /// Collects tenure observations grouped by a key computed from each record.
    ///
    /// Terminated employees are events at their tenure; everyone else is
    /// censored at the reference date. Records with a negative tenure (hire
    /// date after the end date) cannot be placed on the time axis and are
    /// counted in `negative_tenure` instead.
    pub fn collect_by_group<F>(dataset: &CleanedDataset, reference: NaiveDate, mut group: F) -> Self
    where
        F: FnMut(&EmployeeRecord) -> Option<K>,
    {
        let mut data_map: BTreeMap<K, Vec<(f64, bool)>> = BTreeMap::new();
        let mut negative_tenure = 0;
        let mut ungrouped = 0;

        for record in dataset {
            let tenure = compute_tenure_years(
                record.date_of_hire,
                record.date_of_termination,
                reference,
            );
            if tenure < 0.0 {
                log::debug!(
                    "employee {}: hire date {} is after the end of employment",
                    record.emp_id,
                    record.date_of_hire
                );
                negative_tenure += 1;
                continue;
            }
            let Some(key) = group(record) else {
                ungrouped += 1;
                continue;
            };
            let is_censored = !record.is_terminated();
            data_map.entry(key).or_default().push((tenure, is_censored));
        }
        if negative_tenure > 0 {
            log::warn!("{negative_tenure} records have a negative tenure and were excluded from retention");
        }

        Self {
            map: data_map
                .into_iter()
                .map(|(key, data)| (key, RetentionStats::from_data(&data)))
                .collect(),
            negative_tenure,
            ungrouped,
        }
    }
}

/// Retention per recruitment source.
#[must_use]
pub fn retention_by_source(dataset: &CleanedDataset, reference: NaiveDate) -> RetentionStatsMap<String> {
    RetentionStatsMap::collect_by_group(dataset, reference, |r| r.recruitment_source.clone())
}
