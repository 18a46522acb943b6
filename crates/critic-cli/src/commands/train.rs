use std::path::Path;

use anyhow::{Context, Result};

use critic_classifiers::models::{NaiveBayesModel, NaiveBayesTrainer};

use super::load_data;
use crate::config::RunConfig;

/// Train on every instance of `data_path` and write the model JSON to `output_path`.
pub fn run_training(data_path: &Path, output_path: &Path, config: &RunConfig) -> Result<NaiveBayesModel> {
    config.check()?;
    let data = load_data(data_path, config)?;
    let num_labels = config.label_set().num_labels();

    let trainer = NaiveBayesTrainer::new(config.cross_validation.trainer.clone());
    let model = trainer.train(&data.instances, num_labels, data.num_features())?;

    model
        .save(output_path)
        .with_context(|| format!("Failed to write model: {}", output_path.display()))?;
    log::info!(
        "[critic::train] Wrote {} x {} model to {}",
        model.num_labels(),
        model.num_features(),
        output_path.display()
    );
    Ok(model)
}
