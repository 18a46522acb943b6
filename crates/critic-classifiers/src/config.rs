use serde::{Deserialize, Serialize};

use crate::data_handling::LabelSet;
use crate::error::{ClassifierError, Result};

/// Hyper-parameters for Complement Naive Bayes training.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrainerConfig {
    /// Additive smoothing added to every complement feature weight.
    pub alpha: f64,
    /// Prior used for a label with no training weight, instead of `ln(0)`.
    pub prior_floor: f64,
    /// Train even when a label has no instances, scoring it with `prior_floor`.
    pub allow_missing_labels: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            prior_floor: 1e-10,
            allow_missing_labels: false,
        }
    }
}

impl TrainerConfig {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(ClassifierError::InvalidParameter {
                name: "alpha".to_string(),
                value: self.alpha.to_string(),
            });
        }
        if !self.prior_floor.is_finite() || self.prior_floor <= 0.0 || self.prior_floor > 1.0 {
            return Err(ClassifierError::InvalidParameter {
                name: "prior_floor".to_string(),
                value: self.prior_floor.to_string(),
            });
        }
        Ok(())
    }
}

/// Settings for a k-fold cross-validation run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CrossValidationConfig {
    /// Number of folds.
    pub k: usize,
    /// Seed for the fold assignment.
    pub seed: u64,
    /// Evaluate folds on the rayon thread pool.
    pub parallel: bool,
    pub label_set: LabelSet,
    pub trainer: TrainerConfig,
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        Self {
            k: 10,
            seed: 42,
            parallel: false,
            label_set: LabelSet::FourClass,
            trainer: TrainerConfig::default(),
        }
    }
}

impl CrossValidationConfig {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.k < 2 {
            return Err(ClassifierError::InvalidParameter {
                name: "k".to_string(),
                value: self.k.to_string(),
            });
        }
        self.trainer.validate()
    }
}
