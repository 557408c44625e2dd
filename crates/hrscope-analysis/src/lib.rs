//! Statistical analysis of HR employee records
//!
//! This crate turns an employee CSV export into typed records and runs the
//! workforce analyses on them. Numeric work is delegated to `hrscope-stats`;
//! this crate owns the domain: which fields are read, how nulls are handled,
//! and what the reference date means.
//!
//! # Overview
//!
//! 1. **Load** ([`dataset::RawTable`]): read the delimited file as untyped cells
//! 2. **Prepare** ([`dataset::prepare`]): resolve columns, drop sparse rows,
//!    parse dates and integers into [`record::EmployeeRecord`]s
//! 3. **Analyze**, each function borrowing the [`record::CleanedDataset`]:
//!    - [`grouping::count_by_manager`]: team sizes
//!    - [`performance::performance_deviation`]: how each manager's rating
//!      distribution deviates from the average manager
//!    - [`association::chi_squared_association`]: whether ratings depend on
//!      the manager, with Cramér's V
//!    - [`grouping::seniority_by_recruitment_source`]: mean tenure per channel
//!    - [`demographics::age_profile`]: age distribution and related means
//!    - [`retention::retention_by_source`]: Kaplan-Meier retention per channel
//!
//! Analyses return plain numeric tables and series. Rendering them as text,
//! charts or heat maps is left to the caller.
//!
//! # Examples
//!
//! ```
//! use hrscope_analysis::{
//!     config::AnalysisConfig,
//!     dataset::{RawTable, prepare},
//!     grouping::count_by_manager,
//! };
//!
//! let csv = "\
//! EmpID,ManagerName,PerfScoreID,DOB,DateofHire,DateofTermination,RecruitmentSource,MaritalDesc,EmpSatisfaction,EmploymentStatus,SpecialProjectsCount
//! 10026,Michael Albert,4,07/10/83,7/5/2011,,LinkedIn,Single,5,Active,0
//! 10084,Simon Roup,1,04/04/75,1/7/2008,10/15/15,Indeed,Married,3,Voluntarily Terminated,6
//! 10196,Michael Albert,2,09/19/88,10/27/2008,,Website,Single,3,Active,0
//! ";
//! let config = AnalysisConfig::default();
//! let raw = RawTable::from_reader(csv.as_bytes())?;
//! let dataset = prepare(&raw, &config.prepare_options())?;
//!
//! let counts = count_by_manager(&dataset);
//! assert_eq!(counts.by_manager["Michael Albert"], 2);
//! assert_eq!(counts.unassigned, 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod association;
pub mod config;
pub mod dataset;
pub mod demographics;
pub mod derived;
pub mod grouping;
pub mod performance;
pub mod record;
pub mod retention;
