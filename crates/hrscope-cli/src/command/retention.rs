//! Kaplan-Meier retention per recruitment source
//!
//! Employees still employed at the reference date are right-censored, so the
//! naive mean tenure underestimates how long people stay. The KM median is
//! reported alongside for comparison.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Args;
use hrscope_analysis::retention::{RetentionStats, RetentionStatsMap, retention_by_source};
use serde::Serialize;

use crate::util::{DatasetArg, fmt_opt};

#[derive(Debug, Clone, Args)]
pub(crate) struct RetentionArg {
    #[command(flatten)]
    pub dataset: DatasetArg,

    /// Output directory for KM curve CSV files
    #[arg(long)]
    pub km_output_dir: Option<PathBuf>,
}

pub(crate) fn run(arg: &RetentionArg) -> anyhow::Result<()> {
    let (config, dataset) = arg.dataset.load()?;
    let retention = retention_by_source(&dataset, config.reference_date);

    print_legend();
    println!();
    print_retention(&retention);

    if let Some(dir) = &arg.km_output_dir {
        let path = save_km_curves(dir, "recruitment_source", &retention)?;
        println!("  KM curves saved to: {}", path.display());
    }
    arg.dataset.export(&retention)
}

/// Tenure at which the `Stay(1y)` column reads the KM curve.
const STAY_HORIZON_YEARS: f64 = 1.0;

fn print_legend() {
    println!("Legend:");
    println!("  Mean(Term)  : Mean tenure of employees who left (current employees excluded)");
    println!("  Mean(All)   : Naive mean over everyone (biased low by current employees)");
    println!("  Median(KM)  : Kaplan-Meier median tenure (accounts for current employees)");
    println!("  Stay(1y)    : Kaplan-Meier probability of staying at least one year");
}

#[expect(clippy::cast_precision_loss)]
fn censoring_rate(stats: &RetentionStats) -> f64 {
    stats.censored_count as f64 / stats.employees_count as f64 * 100.0
}

pub(super) fn print_retention(retention: &RetentionStatsMap<String>) {
    println!("Retention by Recruitment Source (years)");
    println!(
        "  {:<24} {:>9} {:>9} {:>11} {:>10} {:>11} {:>9}",
        "Source", "Employees", "Current%", "Mean(Term)", "Mean(All)", "Median(KM)", "Stay(1y)"
    );
    println!("  {}", "-".repeat(89));
    for (source, stats) in &retention.map {
        println!(
            "  {:<24} {:>9} {:>8.1}% {:>11.2} {:>10.2} {:>11} {:>8.1}%",
            source,
            stats.employees_count,
            censoring_rate(stats),
            stats.mean_terminated,
            stats.mean_all,
            fmt_opt(stats.median_km, 2),
            stats.km_curve.survival_at(STAY_HORIZON_YEARS) * 100.0,
        );
    }
    if retention.negative_tenure > 0 {
        println!(
            "  ({} employees hired after the end of their employment excluded)",
            retention.negative_tenure
        );
    }
    if retention.ungrouped > 0 {
        println!(
            "  ({} employees without a recruitment source excluded)",
            retention.ungrouped
        );
    }
}

/// One step of a KM curve as written to the CSV export.
#[derive(Debug, Serialize)]
struct KmCurveRow<'a> {
    group: &'a str,
    time: f64,
    survival_prob: f64,
    at_risk: usize,
    events: usize,
}

/// Saves the KM curves of every group to `<dir>/<name>_km.csv`.
fn save_km_curves(dir: &Path, name: &str, retention: &RetentionStatsMap<String>) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let csv_path = dir.join(format!("{name}_km.csv"));
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("Failed to create CSV file: {}", csv_path.display()))?;

    for (group, stats) in &retention.map {
        let km = &stats.km_curve;
        for i in 0..km.times.len() {
            let row = KmCurveRow {
                group,
                time: km.times[i],
                survival_prob: km.survival_prob[i],
                at_risk: km.at_risk[i],
                events: km.events[i],
            };
            writer
                .serialize(row)
                .with_context(|| format!("Failed to write CSV data for group {group}"))?;
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write CSV file: {}", csv_path.display()))?;
    Ok(csv_path)
}
