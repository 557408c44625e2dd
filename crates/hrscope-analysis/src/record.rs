//! Typed employee records
//!
//! Rows of the raw table are converted into [`EmployeeRecord`]s by
//! [`prepare`](crate::dataset::prepare). Downstream analyses only ever see
//! named fields, never column-name lookups.

use chrono::NaiveDate;
use serde::Serialize;

use crate::performance::PerformanceLabel;

/// Unique employee identifier (`EmpID`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
pub struct EmployeeId(pub u64);

/// One cleaned employee row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRecord {
    pub emp_id: EmployeeId,
    pub manager_name: Option<String>,
    /// Raw performance score identifier; see [`EmployeeRecord::performance_label`].
    pub perf_score_id: Option<i64>,
    pub date_of_birth: NaiveDate,
    pub date_of_hire: NaiveDate,
    /// `None` while the employee is still employed.
    pub date_of_termination: Option<NaiveDate>,
    pub recruitment_source: Option<String>,
    pub marital_status: Option<String>,
    /// Employment satisfaction, ordinal 1 to 5.
    pub emp_satisfaction: Option<u8>,
    pub employment_status: Option<String>,
    pub special_projects_count: Option<u32>,
}

impl EmployeeRecord {
    /// Performance label for the score id, `None` when the id is null or unmapped.
    #[must_use]
    pub fn performance_label(&self) -> Option<PerformanceLabel> {
        self.perf_score_id.and_then(PerformanceLabel::from_id)
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.date_of_termination.is_some()
    }
}

/// Output of dataset preparation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanedDataset {
    pub records: Vec<EmployeeRecord>,
    /// Rows excluded by the sparsity filter.
    pub sparse_rows_dropped: usize,
}

impl CleanedDataset {
    #[must_use]
    pub fn new(records: Vec<EmployeeRecord>) -> Self {
        Self {
            records,
            sparse_rows_dropped: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EmployeeRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a CleanedDataset {
    type Item = &'a EmployeeRecord;
    type IntoIter = std::slice::Iter<'a, EmployeeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;

    #[test]
    fn test_performance_label_of_unmapped_id() {
        let record = with_manager(1, Some("A"), Some(9));
        assert_eq!(record.performance_label(), None);
        let record = with_manager(2, Some("A"), Some(3));
        assert_eq!(record.performance_label(), Some(PerformanceLabel::Pip));
    }

    #[test]
    fn test_employee_id_serializes_as_number() {
        let json = serde_json::to_string(&EmployeeId(10026)).unwrap();
        assert_eq!(json, "10026");
    }
}
