use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use self::{
    association::AssociationArg, demographics::DemographicsArg, managers::ManagersArg,
    performance::PerformanceArg, report::ReportArg, retention::RetentionArg,
    seniority::SeniorityArg,
};

mod association;
mod demographics;
mod managers;
mod performance;
mod report;
mod retention;
mod seniority;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v: info, -vv: debug); `RUST_LOG` takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Which analysis to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run every analysis and print all tables
    Report(#[clap(flatten)] ReportArg),
    /// Count employees per manager
    Managers(#[clap(flatten)] ManagersArg),
    /// Compare each manager's performance distribution with the average
    Performance(#[clap(flatten)] PerformanceArg),
    /// Test whether performance ratings depend on the manager
    Association(#[clap(flatten)] AssociationArg),
    /// Mean seniority per recruitment source
    Seniority(#[clap(flatten)] SeniorityArg),
    /// Age distribution, satisfaction and workload
    Demographics(#[clap(flatten)] DemographicsArg),
    /// Kaplan-Meier retention per recruitment source
    Retention(#[clap(flatten)] RetentionArg),
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(args.verbose);
    match args.mode {
        Mode::Report(arg) => report::run(&arg)?,
        Mode::Managers(arg) => managers::run(&arg)?,
        Mode::Performance(arg) => performance::run(&arg)?,
        Mode::Association(arg) => association::run(&arg)?,
        Mode::Seniority(arg) => seniority::run(&arg)?,
        Mode::Demographics(arg) => demographics::run(&arg)?,
        Mode::Retention(arg) => retention::run(&arg)?,
    }
    Ok(())
}
