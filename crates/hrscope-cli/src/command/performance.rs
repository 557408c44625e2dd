//! Manager x performance deviation table

use std::collections::BTreeMap;

use clap::Args;
use hrscope_analysis::performance::{PerformanceDeviation, PerformanceLabel, performance_deviation};

use crate::util::DatasetArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct PerformanceArg {
    #[command(flatten)]
    pub dataset: DatasetArg,
}

pub(crate) fn run(arg: &PerformanceArg) -> anyhow::Result<()> {
    let (_config, dataset) = arg.dataset.load()?;
    let deviation = performance_deviation(&dataset);
    print_performance_deviation(&deviation);
    arg.dataset.export(&deviation)
}

fn print_grid(
    labels: &[PerformanceLabel],
    rows: &BTreeMap<String, BTreeMap<PerformanceLabel, f64>>,
    signed: bool,
) {
    print!("  {:<24}", "Manager");
    for label in labels {
        print!(" {:>16}", label.to_string());
    }
    println!();
    println!("  {}", "-".repeat(24 + 17 * labels.len()));
    for (manager, row) in rows {
        print!("  {manager:<24}");
        for label in labels {
            match row.get(label) {
                Some(value) if signed => print!(" {value:>+15.1}%"),
                Some(value) => print!(" {value:>15.1}%"),
                None => print!(" {:>16}", "-"),
            }
        }
        println!();
    }
}

pub(super) fn print_performance_deviation(deviation: &PerformanceDeviation) {
    println!("Performance Distribution per Manager (% of the manager's employees, - where none)");
    print_grid(&deviation.labels, &deviation.percentages, false);
    print!("  {:<24}", "(mean where present)");
    for label in &deviation.labels {
        print!(" {:>15.1}%", deviation.column_means[label]);
    }
    println!();
    println!();

    println!("Deviation from the Manager Average (percentage points)");
    print_grid(&deviation.labels, &deviation.deviations, true);
    println!(
        "  Largest absolute deviation: {:.1} pp",
        deviation.max_abs_deviation()
    );

    if deviation.unmapped > 0 {
        println!(
            "  Note: {} rows with an unknown performance score id were excluded",
            deviation.unmapped
        );
    }
    if deviation.excluded_null > 0 {
        println!(
            "  Note: {} rows without a manager or score were excluded",
            deviation.excluded_null
        );
    }
}
