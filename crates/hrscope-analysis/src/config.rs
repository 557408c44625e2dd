//! Analysis configuration
//!
//! All tunable constants of the analysis live in [`AnalysisConfig`]. The
//! struct deserializes from JSON with every field optional, so a config file
//! only needs to name what it overrides:
//!
//! ```json
//! { "reference_date": "2020-01-01", "significance_level": 0.01 }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{association::AssociationOptions, dataset::PrepareOptions};

/// The as-of date the dataset was captured against.
pub const DEFAULT_REFERENCE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2019, 9, 27) {
    Some(date) => date,
    None => panic!("invalid default reference date"),
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// "As of" date for tenure of current employees and for ages.
    pub reference_date: NaiveDate,
    /// Alpha used when concluding on the chi-squared test.
    pub significance_level: f64,
    /// Expected cell frequency below which the chi-squared result is flagged as unreliable.
    pub min_expected_frequency: f64,
    /// Rows with fewer non-null cells than this are dropped during preparation.
    pub sparsity_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reference_date: DEFAULT_REFERENCE_DATE,
            significance_level: 0.05,
            min_expected_frequency: 5.0,
            sparsity_threshold: 2,
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub fn prepare_options(&self) -> PrepareOptions {
        PrepareOptions {
            sparsity_threshold: self.sparsity_threshold,
        }
    }

    #[must_use]
    pub fn association_options(&self) -> AssociationOptions {
        AssociationOptions {
            min_expected_frequency: self.min_expected_frequency,
        }
    }
}
