//! Runners behind the `cv`, `train` and `test` subcommands.
use std::path::Path;

use anyhow::{Context, Result};

use critic_classifiers::io::{read_instances_csv_with_config, LoadedData};

use crate::config::RunConfig;
use crate::util::validate_tsv_or_csv_file;

pub mod cross_validate;
pub mod train;

pub use cross_validate::run_cross_validation;
pub use test::{run_test, TestOutcome};
pub use train::run_training;

fn load_data(path: &Path, config: &RunConfig) -> Result<LoadedData> {
    validate_tsv_or_csv_file(path)?;
    let data = read_instances_csv_with_config(path, &config.loader)
        .with_context(|| format!("Failed to load data: {}", path.display()))?;
    if data.instances.is_empty() {
        anyhow::bail!("No instances found in {}", path.display());
    }
    Ok(data)
}
