//! Statistical routines for the hrscope workspace.
//!
//! This crate is dataset-agnostic: it knows nothing about employees, only about
//! numbers and categories. It provides:
//!
//! - **Descriptive statistics**: mean, median, variance, standard deviation, extremes
//! - **Fixed-edge binning**: map values onto predeclared bucket edges
//! - **Histogram generation**: fixed-width frequency distributions
//! - **Contingency tables**: co-occurrence counts of two categorical variables
//! - **Chi-squared test**: Pearson's test of independence and Cramér's V
//! - **Survival analysis**: Kaplan-Meier estimator for right-censored durations
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`binning`]: Fixed-edge bucketing of continuous values
//! - [`histogram`]: Histogram construction for visualizing data distributions
//! - [`contingency`]: Two-way frequency tables
//! - [`chi_squared`]: Chi-squared independence test and effect size
//! - [`survival`]: Kaplan-Meier survival curves for analyzing time-to-event data
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use hrscope_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Testing two categorical variables for independence
//!
//! ```
//! use hrscope_stats::{chi_squared::ChiSquaredTest, contingency::ContingencyTable};
//!
//! let pairs = [("a", "x"), ("a", "x"), ("a", "y"), ("b", "y"), ("b", "y"), ("b", "x")];
//! let table = ContingencyTable::from_pairs(pairs);
//! let test = ChiSquaredTest::from_table(&table).unwrap();
//! assert_eq!(test.degrees_of_freedom, 1);
//! assert!(test.p_value > 0.0 && test.p_value <= 1.0);
//! ```
//!
//! ## Analyzing survival data
//!
//! ```
//! use hrscope_stats::survival::KaplanMeierCurve;
//!
//! // Data: (time, is_censored)
//! let data = vec![
//!     (1.5, false), // Event occurred at time 1.5
//!     (2.0, true),  // Censored at time 2.0
//!     (3.0, false), // Event occurred at time 3.0
//! ];
//! let curve = KaplanMeierCurve::from_data(data);
//! assert_eq!(curve.times, vec![1.5, 3.0]);
//! ```

pub mod binning;
pub mod chi_squared;
pub mod contingency;
pub mod descriptive;
pub mod histogram;
pub mod survival;
