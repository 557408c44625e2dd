//! Chi-squared test of independence between manager and performance label

use clap::Args;
use hrscope_analysis::{
    association::{AssociationError, AssociationResult, chi_squared_association},
    config::AnalysisConfig,
};

use crate::util::DatasetArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct AssociationArg {
    #[command(flatten)]
    pub dataset: DatasetArg,
}

pub(crate) fn run(arg: &AssociationArg) -> anyhow::Result<()> {
    let (config, dataset) = arg.dataset.load()?;
    let result = chi_squared_association(&dataset, &config.association_options());
    print_association(&result, &config);
    match result {
        Ok(result) => arg.dataset.export(&result),
        Err(_) => Ok(()),
    }
}

pub(super) fn print_association(
    result: &Result<AssociationResult, AssociationError>,
    config: &AnalysisConfig,
) {
    println!("Manager vs Performance: Chi-squared Test of Independence");
    let result = match result {
        Ok(result) => result,
        Err(err) => {
            println!("  Test not applicable: {err}");
            return;
        }
    };

    print_table("Observed", result, |r, c| {
        format!("{}", result.observed.counts()[r][c])
    });
    println!();
    print_table("Expected under independence", result, |r, c| {
        format!("{:.2}", result.expected()[r][c])
    });
    println!();

    println!("  {:<22} {:>10.4}", "Chi-squared", result.statistic());
    println!("  {:<22} {:>10.4}", "p-value", result.p_value());
    println!("  {:<22} {:>10}", "Degrees of freedom", result.degrees_of_freedom());
    println!("  {:<22} {:>10.4}", "Cramér's V", result.cramers_v);
    println!(
        "  {:<22} {:>10}",
        "Observations",
        result.observed.grand_total()
    );
    if let Some(warning) = &result.warning {
        println!("  Warning: {warning}");
    }

    let alpha = config.significance_level;
    if result.is_significant(alpha) {
        println!(
            "  Conclusion: p < {alpha}, performance ratings depend on the manager (independence rejected)"
        );
    } else {
        println!(
            "  Conclusion: p >= {alpha}, no evidence that performance ratings depend on the manager"
        );
    }
}

fn print_table<F>(title: &str, result: &AssociationResult, mut cell: F)
where
    F: FnMut(usize, usize) -> String,
{
    let labels = result.observed.columns();
    println!("  {title}");
    print!("    {:<24}", "Manager");
    for label in labels {
        print!(" {:>16}", label.to_string());
    }
    println!();
    println!("    {}", "-".repeat(24 + 17 * labels.len()));
    for (r, manager) in result.observed.rows().iter().enumerate() {
        print!("    {manager:<24}");
        for c in 0..labels.len() {
            print!(" {:>16}", cell(r, c));
        }
        println!();
    }
}
