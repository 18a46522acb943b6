//! JSON run configuration shared by every subcommand.
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use critic_classifiers::config::CrossValidationConfig;
use critic_classifiers::data_handling::LabelSet;
use critic_classifiers::io::LoaderConfig;

/// Loader and cross-validation settings, each section optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub loader: LoaderConfig,
    pub cross_validation: CrossValidationConfig,
}

impl RunConfig {
    /// Read the config file if one is given, then apply command line overrides.
    pub fn from_arguments(config_path: Option<&Path>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_run_config(path)?,
            None => RunConfig::default(),
        };

        if let Some(&k) = arg::<usize>(matches, "folds") {
            config.cross_validation.k = k;
        }
        if let Some(&seed) = arg::<u64>(matches, "seed") {
            config.cross_validation.seed = seed;
        }
        if let Some(&alpha) = arg::<f64>(matches, "alpha") {
            config.cross_validation.trainer.alpha = alpha;
        }
        if let Some(label_set) = arg::<String>(matches, "label_set") {
            let label_set = label_set.parse::<LabelSet>().map_err(anyhow::Error::msg)?;
            config.set_label_set(label_set);
        }
        if arg::<bool>(matches, "parallel").copied().unwrap_or(false) {
            config.cross_validation.parallel = true;
        }

        config.check()?;
        Ok(config)
    }

    /// Label set used for both loading and validation.
    pub fn label_set(&self) -> LabelSet {
        self.loader.label_set
    }

    pub fn set_label_set(&mut self, label_set: LabelSet) {
        self.loader.label_set = label_set;
        self.cross_validation.label_set = label_set;
    }

    /// Reject settings the library would refuse later, with the config wording.
    pub fn check(&self) -> Result<()> {
        if self.loader.label_set != self.cross_validation.label_set {
            anyhow::bail!(
                "loader.label_set ({:?}) and cross_validation.label_set ({:?}) disagree",
                self.loader.label_set,
                self.cross_validation.label_set
            );
        }
        self.cross_validation
            .validate()
            .context("Invalid cross-validation settings")?;
        Ok(())
    }
}

/// Load a run configuration from a JSON file.
pub fn load_run_config<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: RunConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

// Subcommands define different options, so unknown ids read as absent.
fn arg<'a, T>(matches: &'a ArgMatches, id: &str) -> Option<&'a T>
where
    T: std::any::Any + Clone + Send + Sync + 'static,
{
    matches.try_get_one::<T>(id).ok().flatten()
}
