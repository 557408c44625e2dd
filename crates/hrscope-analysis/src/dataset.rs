//! Raw table loading and dataset preparation
//!
//! # Overview
//!
//! Preparation turns the untyped [`RawTable`] read from a CSV file into a
//! [`CleanedDataset`] of [`EmployeeRecord`]s:
//!
//! 1. Every required column is resolved by exact name; a missing column fails
//!    fast with [`PrepareError::MissingColumn`] before any row is looked at.
//! 2. [`column::DROPPED`] columns are removed from the column space.
//! 3. Rows with fewer non-null cells than the sparsity threshold (counted over
//!    the remaining columns) are excluded, not reported as errors.
//! 4. Dates are parsed with their field-specific layouts, integers are parsed,
//!    and employee ids are checked for uniqueness.
//!
//! Any structural error aborts preparation; there is no partially cleaned
//! dataset.
//!
//! # Examples
//!
//! ```
//! use hrscope_analysis::dataset::{PrepareOptions, RawTable, prepare};
//!
//! let csv = "\
//! EmpID,ManagerName,PerfScoreID,DOB,DateofHire,DateofTermination,RecruitmentSource,MaritalDesc,EmpSatisfaction,EmploymentStatus,SpecialProjectsCount,DaysLateLast30
//! 10026,Michael Albert,4,07/10/83,7/5/2011,,LinkedIn,Single,5,Active,0,0
//! ,,,,,,,,,,,3
//! ";
//! let raw = RawTable::from_reader(csv.as_bytes()).unwrap();
//! let dataset = prepare(&raw, &PrepareOptions::default()).unwrap();
//!
//! assert_eq!(dataset.len(), 1);
//! assert_eq!(dataset.sparse_rows_dropped, 1);
//! ```

use std::{collections::HashMap, io, path::Path};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::{CleanedDataset, EmployeeId, EmployeeRecord};

/// Column names of the input file.
pub mod column {
    pub const EMP_ID: &str = "EmpID";
    pub const MANAGER_NAME: &str = "ManagerName";
    pub const PERF_SCORE_ID: &str = "PerfScoreID";
    pub const DOB: &str = "DOB";
    pub const DATE_OF_HIRE: &str = "DateofHire";
    pub const DATE_OF_TERMINATION: &str = "DateofTermination";
    pub const RECRUITMENT_SOURCE: &str = "RecruitmentSource";
    pub const MARITAL_DESC: &str = "MaritalDesc";
    pub const EMP_SATISFACTION: &str = "EmpSatisfaction";
    pub const EMPLOYMENT_STATUS: &str = "EmploymentStatus";
    pub const SPECIAL_PROJECTS_COUNT: &str = "SpecialProjectsCount";

    pub const LAST_PERFORMANCE_REVIEW_DATE: &str = "LastPerformanceReview_Date";
    pub const DAYS_LATE_LAST_30: &str = "DaysLateLast30";

    /// Columns removed before any other processing.
    pub const DROPPED: [&str; 2] = [LAST_PERFORMANCE_REVIEW_DATE, DAYS_LATE_LAST_30];
}

/// Date layout of `DOB` (two-digit year).
pub const DOB_LAYOUT: &str = "%m/%d/%y";
/// Date layout of `DateofHire` (four-digit year).
pub const HIRE_LAYOUT: &str = "%m/%d/%Y";
/// Date layout of `DateofTermination` (two-digit year).
pub const TERMINATION_LAYOUT: &str = "%m/%d/%y";

const SATISFACTION_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PrepareError {
    #[display("required column '{column}' is missing from the input")]
    MissingColumn { column: &'static str },
    #[display("line {line}: {column} value '{value}' does not match date layout '{layout}'")]
    Parse {
        line: usize,
        column: &'static str,
        value: String,
        layout: &'static str,
        source: chrono::ParseError,
    },
    #[display("line {line}: {column} value '{value}' is not a valid integer")]
    InvalidNumber {
        line: usize,
        column: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },
    #[display("line {line}: {column} value {value} is outside {min}..={max}")]
    OutOfRange {
        line: usize,
        column: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[display("line {line}: required {column} value is empty")]
    MissingValue { line: usize, column: &'static str },
    #[display("line {line}: employee id {emp_id} already appeared on line {first_line}")]
    DuplicateEmployeeId {
        line: usize,
        emp_id: EmployeeId,
        first_line: usize,
    },
}

/// Header and nullable string cells as read from a delimited file.
///
/// Cells are trimmed; an empty cell is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Creates a table from already split cells.
    ///
    /// # Panics
    ///
    /// Panics if a row's length differs from the number of columns.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        assert!(
            rows.iter().all(|row| row.len() == columns.len()),
            "every row must have one cell per column"
        );
        Self { columns, rows }
    }

    /// Reads a comma-separated table with a header row.
    pub fn from_reader<R>(reader: R) -> Result<Self, csv::Error>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = reader
            .headers()?
            .iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        let rows = reader
            .records()
            .map(|record| {
                record.map(|record| {
                    record
                        .iter()
                        .map(|cell| (!cell.is_empty()).then(|| cell.to_owned()))
                        .collect()
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("read {} rows with {} columns", rows.len(), columns.len());
        Ok(Self { columns, rows })
    }

    /// Reads a comma-separated file with a header row.
    pub fn from_path<P>(path: P) -> Result<Self, csv::Error>
    where
        P: AsRef<Path>,
    {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(io::BufReader::new(file))
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareOptions {
    /// Minimum number of non-null cells a row needs to be kept.
    pub sparsity_threshold: usize,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            sparsity_threshold: 2,
        }
    }
}

/// Positions of the required columns in a [`RawTable`].
#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    emp_id: usize,
    manager_name: usize,
    perf_score_id: usize,
    dob: usize,
    date_of_hire: usize,
    date_of_termination: usize,
    recruitment_source: usize,
    marital_desc: usize,
    emp_satisfaction: usize,
    employment_status: usize,
    special_projects_count: usize,
}

impl ColumnIndices {
    fn resolve(raw: &RawTable) -> Result<Self, PrepareError> {
        let find = |column: &'static str| {
            raw.column_index(column)
                .ok_or(PrepareError::MissingColumn { column })
        };
        Ok(Self {
            emp_id: find(column::EMP_ID)?,
            manager_name: find(column::MANAGER_NAME)?,
            perf_score_id: find(column::PERF_SCORE_ID)?,
            dob: find(column::DOB)?,
            date_of_hire: find(column::DATE_OF_HIRE)?,
            date_of_termination: find(column::DATE_OF_TERMINATION)?,
            recruitment_source: find(column::RECRUITMENT_SOURCE)?,
            marital_desc: find(column::MARITAL_DESC)?,
            emp_satisfaction: find(column::EMP_SATISFACTION)?,
            employment_status: find(column::EMPLOYMENT_STATUS)?,
            special_projects_count: find(column::SPECIAL_PROJECTS_COUNT)?,
        })
    }
}

/// Cleans a raw table into typed employee records.
///
/// The dropped columns are removed first and the sparsity filter then counts
/// non-null cells over the columns that remain.
pub fn prepare(raw: &RawTable, options: &PrepareOptions) -> Result<CleanedDataset, PrepareError> {
    let indices = ColumnIndices::resolve(raw)?;

    let retained_columns = raw
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| !column::DROPPED.contains(&name.as_str()))
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>();

    let mut records = vec![];
    let mut first_seen = HashMap::new();
    let mut sparse_rows_dropped = 0;

    for (row_idx, row) in raw.rows().iter().enumerate() {
        // header is line 1
        let line = row_idx + 2;

        let non_null = retained_columns
            .iter()
            .filter(|&&idx| row.get(idx).is_some_and(Option::is_some))
            .count();
        if non_null < options.sparsity_threshold {
            log::debug!("line {line}: dropped, only {non_null} non-null cells");
            sparse_rows_dropped += 1;
            continue;
        }

        let record = RowParser { row, line }.parse(&indices)?;
        if let Some(&first_line) = first_seen.get(&record.emp_id) {
            return Err(PrepareError::DuplicateEmployeeId {
                line,
                emp_id: record.emp_id,
                first_line,
            });
        }
        first_seen.insert(record.emp_id, line);
        records.push(record);
    }

    log::info!(
        "prepared {} records ({} sparse rows dropped)",
        records.len(),
        sparse_rows_dropped
    );

    Ok(CleanedDataset {
        records,
        sparse_rows_dropped,
    })
}

struct RowParser<'a> {
    row: &'a [Option<String>],
    line: usize,
}

impl RowParser<'_> {
    fn parse(&self, indices: &ColumnIndices) -> Result<EmployeeRecord, PrepareError> {
        let emp_id = self.required_integer(indices.emp_id, column::EMP_ID)?;
        let emp_id = EmployeeId(self.non_negative(emp_id, column::EMP_ID)?);

        let date_of_birth = self.required_date(indices.dob, column::DOB, DOB_LAYOUT)?;
        let date_of_hire =
            self.required_date(indices.date_of_hire, column::DATE_OF_HIRE, HIRE_LAYOUT)?;
        let date_of_termination = self
            .cell(indices.date_of_termination)
            .map(|value| {
                parse_date(
                    value,
                    column::DATE_OF_TERMINATION,
                    TERMINATION_LAYOUT,
                    self.line,
                )
            })
            .transpose()?;

        let emp_satisfaction = self
            .integer(indices.emp_satisfaction, column::EMP_SATISFACTION)?
            .map(|value| self.in_range(value, column::EMP_SATISFACTION, SATISFACTION_RANGE))
            .transpose()?;
        let special_projects_count = self
            .integer(indices.special_projects_count, column::SPECIAL_PROJECTS_COUNT)?
            .map(|value| self.non_negative(value, column::SPECIAL_PROJECTS_COUNT))
            .transpose()?;

        Ok(EmployeeRecord {
            emp_id,
            manager_name: self.string(indices.manager_name),
            perf_score_id: self.integer(indices.perf_score_id, column::PERF_SCORE_ID)?,
            date_of_birth,
            date_of_hire,
            date_of_termination,
            recruitment_source: self.string(indices.recruitment_source),
            marital_status: self.string(indices.marital_desc),
            emp_satisfaction,
            employment_status: self.string(indices.employment_status),
            special_projects_count,
        })
    }

    fn cell(&self, idx: usize) -> Option<&str> {
        self.row.get(idx)?.as_deref()
    }

    fn string(&self, idx: usize) -> Option<String> {
        self.cell(idx).map(str::to_owned)
    }

    fn integer(&self, idx: usize, column: &'static str) -> Result<Option<i64>, PrepareError> {
        self.cell(idx)
            .map(|value| {
                value
                    .parse::<i64>()
                    .map_err(|source| PrepareError::InvalidNumber {
                        line: self.line,
                        column,
                        value: value.to_owned(),
                        source,
                    })
            })
            .transpose()
    }

    fn required_integer(&self, idx: usize, column: &'static str) -> Result<i64, PrepareError> {
        self.integer(idx, column)?
            .ok_or(PrepareError::MissingValue {
                line: self.line,
                column,
            })
    }

    fn required_date(
        &self,
        idx: usize,
        column: &'static str,
        layout: &'static str,
    ) -> Result<NaiveDate, PrepareError> {
        let value = self.cell(idx).ok_or(PrepareError::MissingValue {
            line: self.line,
            column,
        })?;
        parse_date(value, column, layout, self.line)
    }

    fn in_range<T>(
        &self,
        value: i64,
        column: &'static str,
        range: std::ops::RangeInclusive<i64>,
    ) -> Result<T, PrepareError>
    where
        T: TryFrom<i64>,
    {
        range
            .contains(&value)
            .then(|| T::try_from(value).ok())
            .flatten()
            .ok_or(PrepareError::OutOfRange {
                line: self.line,
                column,
                value,
                min: *range.start(),
                max: *range.end(),
            })
    }

    fn non_negative<T>(&self, value: i64, column: &'static str) -> Result<T, PrepareError>
    where
        T: TryFrom<i64>,
    {
        T::try_from(value).map_err(|_| PrepareError::OutOfRange {
            line: self.line,
            column,
            value,
            min: 0,
            max: i64::MAX,
        })
    }
}

fn parse_date(
    value: &str,
    column: &'static str,
    layout: &'static str,
    line: usize,
) -> Result<NaiveDate, PrepareError> {
    NaiveDate::parse_from_str(value, layout).map_err(|source| PrepareError::Parse {
        line,
        column,
        value: value.to_owned(),
        layout,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_util::date;

    const HEADER: &str = "Employee_Name,EmpID,ManagerName,PerfScoreID,DOB,DateofHire,DateofTermination,RecruitmentSource,MaritalDesc,EmpSatisfaction,EmploymentStatus,SpecialProjectsCount,LastPerformanceReview_Date,DaysLateLast30";

    fn table(rows: &[&str]) -> RawTable {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        RawTable::from_reader(csv.as_bytes()).unwrap()
    }

    fn prepare_default(raw: &RawTable) -> Result<CleanedDataset, PrepareError> {
        prepare(raw, &PrepareOptions::default())
    }

    #[test]
    fn test_fully_populated_row() {
        let raw = table(&[
            "\"Adinolfi, Wilson K\",10026,Michael Albert,4,07/10/83,7/5/2011,09/24/18,LinkedIn,Married,5,Voluntarily Terminated,3,1/17/2019,0",
        ]);
        let dataset = prepare_default(&raw).unwrap();
        assert_eq!(dataset.len(), 1);

        let record = &dataset.records[0];
        assert_eq!(record.emp_id, EmployeeId(10026));
        assert_eq!(record.manager_name.as_deref(), Some("Michael Albert"));
        assert_eq!(record.perf_score_id, Some(4));
        assert_eq!(record.date_of_birth, date(1983, 7, 10));
        assert_eq!(record.date_of_hire, date(2011, 7, 5));
        assert_eq!(record.date_of_termination, Some(date(2018, 9, 24)));
        assert_eq!(record.recruitment_source.as_deref(), Some("LinkedIn"));
        assert_eq!(record.marital_status.as_deref(), Some("Married"));
        assert_eq!(record.emp_satisfaction, Some(5));
        assert_eq!(
            record.employment_status.as_deref(),
            Some("Voluntarily Terminated")
        );
        assert_eq!(record.special_projects_count, Some(3));
    }

    #[test]
    fn test_nullable_fields_stay_null() {
        let raw = table(&[",10027,,,11/02/88,10/27/2008,,,,,,,,"]);
        let record = &prepare_default(&raw).unwrap().records[0];
        assert_eq!(record.manager_name, None);
        assert_eq!(record.perf_score_id, None);
        assert_eq!(record.date_of_termination, None);
        assert_eq!(record.emp_satisfaction, None);
        assert_eq!(record.special_projects_count, None);
    }

    #[test]
    fn test_two_digit_year_can_land_in_the_future() {
        let raw = table(&[",1,,,01/01/52,1/1/2010,,,,,,,,"]);
        let record = &prepare_default(&raw).unwrap().records[0];
        assert_eq!(record.date_of_birth, date(2052, 1, 1));
    }

    #[test]
    fn test_sparse_rows_are_excluded_not_errors() {
        let raw = table(&[
            ",10026,A,1,07/10/83,7/5/2011,,,,,,,,",
            ",,,,,,,,,,,,,",
            ",,,,,,,,,,,,1/17/2019,5",
        ]);
        let dataset = prepare_default(&raw).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.sparse_rows_dropped, 2);
    }

    #[test]
    fn test_dropped_columns_do_not_count_towards_sparsity() {
        // only one retained non-null cell; the dropped columns must not rescue it
        let raw = table(&[",,,,,,,,Single,,,,1/17/2019,5"]);
        let dataset = prepare_default(&raw).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.sparse_rows_dropped, 1);
    }

    #[test]
    fn test_row_with_exactly_two_cells_survives_threshold() {
        // survives the filter, then fails on the missing hire date
        let raw = table(&[",10030,,,01/02/80,,,,,,,,,"]);
        let err = prepare_default(&raw).unwrap_err();
        assert!(matches!(
            err,
            PrepareError::MissingValue {
                column: column::DATE_OF_HIRE,
                line: 2
            }
        ));
    }

    #[test]
    fn test_missing_column_is_named() {
        let raw = RawTable::from_reader("EmpID,ManagerName\n1,A\n".as_bytes()).unwrap();
        let err = prepare_default(&raw).unwrap_err();
        assert!(matches!(
            err,
            PrepareError::MissingColumn {
                column: column::PERF_SCORE_ID
            }
        ));
        assert!(err.to_string().contains("PerfScoreID"));
    }

    #[test]
    fn test_missing_column_fails_even_without_rows() {
        let raw = RawTable::new(vec!["EmpID".to_owned()], vec![]);
        assert!(matches!(
            prepare_default(&raw),
            Err(PrepareError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_malformed_date_is_a_parse_error() {
        // four-digit year where a two-digit one is expected
        let raw = table(&[",10026,A,1,07/10/1983,7/5/2011,,,,,,,,"]);
        let err = prepare_default(&raw).unwrap_err();
        match err {
            PrepareError::Parse {
                line,
                column,
                value,
                layout,
                ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, column::DOB);
                assert_eq!(value, "07/10/1983");
                assert_eq!(layout, DOB_LAYOUT);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_termination_date_is_not_coerced_to_null() {
        let raw = table(&[",10026,A,1,07/10/83,7/5/2011,not a date,,,,,,,"]);
        assert!(matches!(
            prepare_default(&raw),
            Err(PrepareError::Parse {
                column: column::DATE_OF_TERMINATION,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_integer() {
        let raw = table(&[",10026,A,three,07/10/83,7/5/2011,,,,,,,,"]);
        assert!(matches!(
            prepare_default(&raw),
            Err(PrepareError::InvalidNumber {
                column: column::PERF_SCORE_ID,
                ..
            })
        ));
    }

    #[test]
    fn test_satisfaction_out_of_range() {
        let raw = table(&[",10026,A,1,07/10/83,7/5/2011,,,,9,,,,"]);
        assert!(matches!(
            prepare_default(&raw),
            Err(PrepareError::OutOfRange {
                column: column::EMP_SATISFACTION,
                value: 9,
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_employee_id() {
        let raw = table(&[
            ",10026,A,1,07/10/83,7/5/2011,,,,,,,,",
            ",10026,B,2,07/10/84,7/5/2012,,,,,,,,",
        ]);
        let err = prepare_default(&raw).unwrap_err();
        assert!(matches!(
            err,
            PrepareError::DuplicateEmployeeId {
                line: 3,
                first_line: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_ragged_csv_is_rejected() {
        let result = RawTable::from_reader("a,b\n1,2,3\n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_cells_are_trimmed() {
        let raw = RawTable::from_reader("a,b\n  x , \n".as_bytes()).unwrap();
        assert_eq!(raw.rows()[0], vec![Some("x".to_owned()), None]);
    }
}
