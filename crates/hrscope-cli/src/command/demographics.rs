//! Age profile of the workforce

use std::ops::Range;

use clap::Args;
use hrscope_analysis::demographics::{AgeProfile, age_profile};

use super::seniority::print_grouped_means;
use crate::util::DatasetArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct DemographicsArg {
    #[command(flatten)]
    pub dataset: DatasetArg,

    /// Also print the one-year age histogram
    #[arg(long)]
    pub histogram: bool,
}

pub(crate) fn run(arg: &DemographicsArg) -> anyhow::Result<()> {
    let (config, dataset) = arg.dataset.load()?;
    let profile = age_profile(&dataset, config.reference_date);
    print_age_profile(&profile, arg.histogram);
    arg.dataset.export(&profile)
}

/// Formats a range of ages as `[start, end)`, with an open end for the last group.
fn fmt_age_range(range: &Range<f64>) -> String {
    if range.end.is_finite() {
        format!("[{:.0}, {:.0})", range.start, range.end)
    } else {
        format!("[{:.0}, inf)", range.start)
    }
}

pub(super) fn print_age_profile(profile: &AgeProfile, histogram: bool) {
    println!("Age Profile");
    match &profile.age_stats {
        Some(stats) => {
            println!("  {:<12} {:>8}", "Employees", stats.count);
            println!("  {:<12} {:>8.0}", "Youngest", stats.min);
            println!("  {:<12} {:>8.0}", "Oldest", stats.max);
            println!("  {:<12} {:>8.1}", "Mean", stats.mean);
            println!("  {:<12} {:>8.1}", "Median", stats.median);
            println!("  {:<12} {:>8.1}", "Std dev", stats.std_dev);
        }
        None => println!("  No employee with a defined age"),
    }
    if profile.undefined_age > 0 {
        println!(
            "  ({} employees with a birth date after the reference date excluded)",
            profile.undefined_age
        );
    }
    println!();

    println!("Employees by Age Group");
    println!("  {:<8} {:>13} {:>6}", "Group", "Ages", "Count");
    for (group, count) in &profile.age_group_counts {
        println!(
            "  {:<8} {:>13} {count:>6}",
            group.to_string(),
            fmt_age_range(&group.years())
        );
    }
    println!();

    if histogram {
        println!("Age Histogram (1-year bins)");
        let max = profile
            .age_histogram
            .bins
            .iter()
            .map(|bin| bin.count)
            .max()
            .unwrap_or(0);
        for bin in &profile.age_histogram.bins {
            let bar_len = if max == 0 { 0 } else { bin.count * 40 / max };
            println!(
                "  {:>4.0} {:>4} {}",
                bin.range.start,
                bin.count,
                "#".repeat(usize::try_from(bar_len).unwrap_or(0))
            );
        }
        println!();
    }

    println!("Mean Satisfaction by Age Group");
    print_grouped_means("Age group", &profile.satisfaction_by_age_group);
    println!();

    println!("Mean Special Projects by Marital Status");
    print_grouped_means("Marital status", &profile.special_projects_by_marital_status);
}
