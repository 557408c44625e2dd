//! Full report: every analysis on one dataset, in a fixed order

use clap::Args;
use hrscope_analysis::{
    association::{AssociationResult, chi_squared_association},
    config::AnalysisConfig,
    demographics::{AgeProfile, age_profile},
    grouping::{
        GroupCounts, GroupedMeans, ManagerCounts, count_by_employment_status, count_by_manager,
        seniority_by_recruitment_source,
    },
    performance::{PerformanceDeviation, performance_deviation},
    retention::{RetentionStatsMap, retention_by_source},
};
use serde::Serialize;

use super::{association, demographics, managers, performance, retention, seniority};
use crate::util::DatasetArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct ReportArg {
    #[command(flatten)]
    pub dataset: DatasetArg,
}

#[derive(Debug, Serialize)]
struct Report {
    config: AnalysisConfig,
    employees: usize,
    sparse_rows_dropped: usize,
    managers: ManagerCounts,
    employment_status: GroupCounts<String>,
    performance: PerformanceDeviation,
    /// `None` when the test was not applicable; see `association_error`.
    association: Option<AssociationResult>,
    association_error: Option<String>,
    seniority: GroupedMeans<String>,
    demographics: AgeProfile,
    retention: RetentionStatsMap<String>,
}

fn section(title: &str) {
    println!("========================================");
    println!("{title}");
    println!("========================================\n");
}

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    let (config, dataset) = arg.dataset.load()?;
    let reference = config.reference_date;

    println!("HR Analytics Report (reference date {reference})");
    println!(
        "{} employees analyzed, {} sparse rows dropped\n",
        dataset.len(),
        dataset.sparse_rows_dropped
    );

    section("Team Sizes");
    let manager_counts = count_by_manager(&dataset);
    let employment_status = count_by_employment_status(&dataset);
    managers::print_manager_counts(&manager_counts);
    println!();
    managers::print_employment_status(&employment_status);
    println!();

    section("Performance by Manager");
    let deviation = performance_deviation(&dataset);
    performance::print_performance_deviation(&deviation);
    println!();

    section("Manager / Performance Association");
    let association_result = chi_squared_association(&dataset, &config.association_options());
    association::print_association(&association_result, &config);
    println!();

    section("Seniority");
    let seniority_means = seniority_by_recruitment_source(&dataset, reference);
    seniority::print_seniority(&seniority_means);
    println!();

    section("Demographics");
    let profile = age_profile(&dataset, reference);
    demographics::print_age_profile(&profile, false);
    println!();

    section("Retention");
    let retention_stats = retention_by_source(&dataset, reference);
    retention::print_retention(&retention_stats);

    let (association, association_error) = match association_result {
        Ok(result) => (Some(result), None),
        Err(err) => (None, Some(err.to_string())),
    };
    arg.dataset.export(&Report {
        employees: dataset.len(),
        sparse_rows_dropped: dataset.sparse_rows_dropped,
        config,
        managers: manager_counts,
        employment_status,
        performance: deviation,
        association,
        association_error,
        seniority: seniority_means,
        demographics: profile,
        retention: retention_stats,
    })
}
