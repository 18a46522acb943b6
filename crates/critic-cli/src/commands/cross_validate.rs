use std::path::Path;

use anyhow::Result;

use critic_classifiers::cross_validation::{CrossValidationReport, CrossValidator};

use super::load_data;
use crate::config::RunConfig;

/// Load `data_path` and cross-validate Complement Naive Bayes on it.
pub fn run_cross_validation(data_path: &Path, config: &RunConfig) -> Result<CrossValidationReport> {
    config.check()?;
    let data = load_data(data_path, config)?;
    log::info!(
        "[critic::cv] {} instances, {} features, k = {}, seed = {}",
        data.instances.len(),
        data.num_features(),
        config.cross_validation.k,
        config.cross_validation.seed
    );
    let report = CrossValidator::new(config.cross_validation.clone()).run(&data.instances)?;
    Ok(report)
}
