//! Per-record derived quantities: tenure, age and age group.

use std::{collections::BTreeMap, ops::Range, sync::LazyLock};

use chrono::{Datelike as _, NaiveDate};
use hrscope_stats::binning::FixedBins;
use serde::{Deserialize, Serialize};

use crate::record::EmployeeRecord;

const DAYS_PER_YEAR: f64 = 365.25;

/// Returns the tenure in years between `hire` and `termination` (or `reference`
/// while still employed).
///
/// A hire date after the end date yields a negative value; callers decide how
/// to treat it.
///
/// ```
/// use chrono::NaiveDate;
/// use hrscope_analysis::derived::compute_tenure_years;
///
/// let hire = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
/// let reference = NaiveDate::from_ymd_opt(2019, 9, 27).unwrap();
/// let years = compute_tenure_years(hire, None, reference);
/// assert!((years - 9.74).abs() < 0.01);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn compute_tenure_years(
    hire: NaiveDate,
    termination: Option<NaiveDate>,
    reference: NaiveDate,
) -> f64 {
    let end = termination.unwrap_or(reference);
    (end - hire).num_days() as f64 / DAYS_PER_YEAR
}

/// Returns the age in whole years at `reference`, or `None` for a birth date
/// after the reference date.
///
/// ```
/// use chrono::NaiveDate;
/// use hrscope_analysis::derived::compute_age;
///
/// let reference = NaiveDate::from_ymd_opt(2019, 9, 27).unwrap();
/// let birth = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
/// assert_eq!(compute_age(birth, reference), Some(29));
/// ```
#[must_use]
pub fn compute_age(birth: NaiveDate, reference: NaiveDate) -> Option<i32> {
    if birth > reference {
        return None;
    }
    let mut age = reference.year() - birth.year();
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Some(age)
}

static AGE_BINS: LazyLock<FixedBins> = LazyLock::new(|| {
    FixedBins::new([0.0, 30.0, 40.0, 50.0, 60.0]).unwrap_or_else(|| unreachable!())
});

/// Reporting bucket of an age.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum AgeGroup {
    #[display("<30")]
    Under30,
    #[display("30-39")]
    Thirties,
    #[display("40-49")]
    Forties,
    #[display("50-59")]
    Fifties,
    #[display("60+")]
    SixtyPlus,
}

impl AgeGroup {
    pub const ALL: [Self; 5] = [
        Self::Under30,
        Self::Thirties,
        Self::Forties,
        Self::Fifties,
        Self::SixtyPlus,
    ];

    #[must_use]
    pub fn from_age(age: i32) -> Option<Self> {
        AGE_BINS
            .index_of(f64::from(age))
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Ages covered by this group, in years. The last group is unbounded.
    ///
    /// ```
    /// use hrscope_analysis::derived::AgeGroup;
    ///
    /// assert_eq!(AgeGroup::Thirties.years(), 30.0..40.0);
    /// assert_eq!(AgeGroup::SixtyPlus.years().end, f64::INFINITY);
    /// ```
    #[must_use]
    pub fn years(self) -> Range<f64> {
        AGE_BINS
            .range(self as usize)
            .unwrap_or_else(|| unreachable!())
    }

    /// Counts `ages` per group. Every group is present, empty ones with 0.
    #[must_use]
    pub fn count_ages<I>(ages: I) -> BTreeMap<Self, u64>
    where
        I: IntoIterator<Item = i32>,
    {
        let counts = AGE_BINS.count(ages.into_iter().map(f64::from));
        Self::ALL.into_iter().zip(counts).collect()
    }
}

/// Quantities derived from one record at a given reference date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedFields {
    pub seniority_years: f64,
    pub age: Option<i32>,
    pub age_group: Option<AgeGroup>,
}

#[must_use]
pub fn derive_fields(record: &EmployeeRecord, reference: NaiveDate) -> DerivedFields {
    let age = compute_age(record.date_of_birth, reference);
    if age.is_none() {
        log::debug!(
            "employee {}: birth date {} is after {reference}, age undefined",
            record.emp_id,
            record.date_of_birth
        );
    }
    DerivedFields {
        seniority_years: compute_tenure_years(
            record.date_of_hire,
            record.date_of_termination,
            reference,
        ),
        age,
        age_group: age.and_then(AgeGroup::from_age),
    }
}
