use std::{
    fs::File,
    io::{self, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use hrscope_analysis::{
    config::AnalysisConfig,
    dataset::{RawTable, prepare},
    record::CleanedDataset,
};

/// Input options shared by every analysis command.
#[derive(Debug, Clone, Args)]
pub(crate) struct DatasetArg {
    /// Path to the employee CSV file
    pub csv: PathBuf,

    /// Reference ("as of") date in YYYY-MM-DD, overrides the config file
    #[arg(long)]
    pub reference_date: Option<NaiveDate>,

    /// Path to an analysis configuration JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the numeric result as pretty JSON to this path
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl DatasetArg {
    /// Resolves the configuration: defaults, then the config file, then command-line overrides.
    pub fn load_config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => read_json_file::<AnalysisConfig, _>("config", path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(date) = self.reference_date {
            config.reference_date = date;
        }
        log::debug!("analysis config: {config:?}");
        Ok(config)
    }

    /// Loads the configuration and the prepared dataset.
    pub fn load(&self) -> anyhow::Result<(AnalysisConfig, CleanedDataset)> {
        let config = self.load_config()?;
        let dataset = read_dataset_file(&self.csv, &config)?;
        Ok((config, dataset))
    }

    /// Saves `value` as JSON if `--export` was given.
    pub fn export<T>(&self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        if let Some(path) = &self.export {
            save_json(value, path)?;
            eprintln!("Result exported to: {}", path.display());
        }
        Ok(())
    }
}

/// Writes `value` as pretty JSON to a new file at `path`.
pub fn save_json<T>(value: &T, path: &Path) -> anyhow::Result<()>
where
    T: serde::Serialize + ?Sized,
{
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush output to {}", path.display()))?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read and prepare the employee dataset from a CSV file
///
/// # Errors
///
/// Returns error if the file cannot be read as CSV or fails preparation
pub fn read_dataset_file<P>(path: P, config: &AnalysisConfig) -> anyhow::Result<CleanedDataset>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let raw = RawTable::from_path(path)
        .with_context(|| format!("Failed to read employee CSV file: {}", path.display()))?;
    let dataset = prepare(&raw, &config.prepare_options())
        .with_context(|| format!("Failed to prepare employee data from {}", path.display()))?;
    eprintln!(
        "Loaded {} employees from {} ({} sparse rows dropped)",
        dataset.len(),
        path.display(),
        dataset.sparse_rows_dropped
    );
    Ok(dataset)
}

/// Formats an optional number, `N/A` when absent.
pub fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.precision$}"))
}
