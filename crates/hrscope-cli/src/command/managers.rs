//! Employee counts per manager and per employment status

use clap::Args;
use hrscope_analysis::grouping::{
    GroupCounts, ManagerCounts, count_by_employment_status, count_by_manager,
};
use serde::Serialize;

use crate::util::DatasetArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct ManagersArg {
    #[command(flatten)]
    pub dataset: DatasetArg,
}

#[derive(Debug, Serialize)]
struct ManagersExport {
    managers: ManagerCounts,
    employment_status: GroupCounts<String>,
}

pub(crate) fn run(arg: &ManagersArg) -> anyhow::Result<()> {
    let (_config, dataset) = arg.dataset.load()?;

    let managers = count_by_manager(&dataset);
    let employment_status = count_by_employment_status(&dataset);
    print_manager_counts(&managers);
    println!();
    print_employment_status(&employment_status);

    arg.dataset.export(&ManagersExport {
        managers,
        employment_status,
    })
}

pub(super) fn print_manager_counts(counts: &ManagerCounts) {
    let mut rows = counts.by_manager.iter().collect::<Vec<_>>();
    rows.sort_by(|(ma, na), (mb, nb)| nb.cmp(na).then_with(|| ma.cmp(mb)));

    println!("Employees per Manager");
    println!("  {:<24} {:>9}", "Manager", "Employees");
    println!("  {}", "-".repeat(34));
    for (manager, count) in rows {
        println!("  {manager:<24} {count:>9}");
    }
    if counts.unassigned > 0 {
        println!("  {:<24} {:>9}", "(no manager)", counts.unassigned);
    }
}

pub(super) fn print_employment_status(counts: &GroupCounts<String>) {
    println!("Employment Status");
    println!("  {:<24} {:>9}", "Status", "Employees");
    println!("  {}", "-".repeat(34));
    for (status, count) in counts.sorted_by_count() {
        println!("  {status:<24} {count:>9}");
    }
    if counts.missing > 0 {
        println!("  {:<24} {:>9}", "(unknown)", counts.missing);
    }
}
