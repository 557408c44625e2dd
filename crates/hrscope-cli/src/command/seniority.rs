//! Mean seniority per recruitment source

use clap::Args;
use hrscope_analysis::grouping::{GroupedMeans, seniority_by_recruitment_source};

use crate::util::DatasetArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct SeniorityArg {
    #[command(flatten)]
    pub dataset: DatasetArg,
}

pub(crate) fn run(arg: &SeniorityArg) -> anyhow::Result<()> {
    let (config, dataset) = arg.dataset.load()?;
    let seniority = seniority_by_recruitment_source(&dataset, config.reference_date);
    print_seniority(&seniority);
    arg.dataset.export(&seniority)
}

pub(super) fn print_seniority(seniority: &GroupedMeans<String>) {
    println!("Mean Seniority by Recruitment Source (years)");
    print_grouped_means("Source", seniority);
}

/// Prints grouped means in their descending-mean order.
pub(super) fn print_grouped_means<K>(label_col: &str, means: &GroupedMeans<K>)
where
    K: std::fmt::Display,
{
    println!(
        "  {:<24} {:>8} {:>8} {:>8} {:>8}",
        label_col, "Count", "Mean", "Min", "Max"
    );
    println!("  {}", "-".repeat(60));
    for entry in &means.entries {
        println!(
            "  {:<24} {:>8} {:>8.2} {:>8.2} {:>8.2}",
            entry.key.to_string(),
            entry.count,
            entry.mean,
            entry.min,
            entry.max
        );
    }
    if means.excluded > 0 {
        println!("  ({} rows without a group or value excluded)", means.excluded);
    }
}
