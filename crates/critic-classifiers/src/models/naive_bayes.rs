//! Complement Naive Bayes statistics and training.
//!
//! Training accumulates per-label feature weights, then derives for every label
//! the weights of its *complement* (all other labels), smoothed by `alpha`,
//! normalised to unit L1 norm and log-transformed. Scoring subtracts the
//! complement log weights, so a vector scores high for a label the less it
//! resembles the rest of the training data (Rennie et al., 2003).
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::TrainerConfig;
use crate::data_handling::{DataInstance, FeatureVector};
use crate::error::{ClassifierError, Result};
use crate::math::{ln_clamped, Array2};

/// Trained statistics. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    num_features: usize,
    num_labels: usize,
    /// Raw accumulated weight, `[label][feature]`.
    feature_label_weights: Array2<f64>,
    label_weights: Vec<f64>,
    label_weight_sum: f64,
    feature_weight_sum: Vec<f64>,
    /// Smoothed, L1-normalised, log-transformed complement weights, `[label][feature]`.
    complement_log_weights: Array2<f64>,
    log_priors: Vec<f64>,
}

impl NaiveBayesModel {
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    pub fn feature_label_weights(&self) -> &Array2<f64> {
        &self.feature_label_weights
    }

    pub fn label_weights(&self) -> &[f64] {
        &self.label_weights
    }

    pub fn label_weight_sum(&self) -> f64 {
        self.label_weight_sum
    }

    pub fn feature_weight_sum(&self) -> &[f64] {
        &self.feature_weight_sum
    }

    pub fn complement_log_weights(&self) -> &Array2<f64> {
        &self.complement_log_weights
    }

    pub fn log_priors(&self) -> &[f64] {
        &self.log_priors
    }

    /// `score[l] = log_prior[l] - sum_f x[f] * complement_log_weight[l][f]`.
    ///
    /// Features at or beyond `num_features` contribute nothing.
    pub fn scores(&self, features: &FeatureVector) -> Vec<f64> {
        (0..self.num_labels)
            .map(|label| {
                self.log_priors[label]
                    - features.dot(self.complement_log_weights.row_slice(label))
            })
            .collect()
    }

    /// Encode the model as JSON bytes.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a model produced by [`NaiveBayesModel::serialize`], checking its shapes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let model: NaiveBayesModel = serde_json::from_slice(bytes)?;
        model.check_shapes()?;
        Ok(model)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.serialize()?;
        std::fs::write(&path, bytes)?;
        log::debug!("Saved model to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(&path)?;
        Self::deserialize(&bytes)
    }

    fn check_shapes(&self) -> Result<()> {
        let expected = (self.num_labels, self.num_features);
        for matrix in [&self.feature_label_weights, &self.complement_log_weights] {
            if !matrix.is_consistent() || matrix.shape() != expected {
                return Err(ClassifierError::DimensionMismatch {
                    expected: self.num_features,
                    found: matrix.ncols(),
                });
            }
        }
        for labels in [&self.label_weights, &self.log_priors] {
            if labels.len() != self.num_labels {
                return Err(ClassifierError::DimensionMismatch {
                    expected: self.num_labels,
                    found: labels.len(),
                });
            }
        }
        if self.feature_weight_sum.len() != self.num_features {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.num_features,
                found: self.feature_weight_sum.len(),
            });
        }
        Ok(())
    }
}

/// Builds [`NaiveBayesModel`]s from labelled instances.
#[derive(Debug, Clone, Default)]
pub struct NaiveBayesTrainer {
    config: TrainerConfig,
}

impl NaiveBayesTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train a Complement Naive Bayes model.
    ///
    /// # Arguments
    ///
    /// * `instances` - Training instances, borrowed; they are not modified.
    /// * `num_labels` - Size of the label range; every label must be below it.
    /// * `num_features` - Size of the feature space; every feature index must be below it.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` when a label has no instances, unless `allow_missing_labels` is set.
    /// * `DimensionMismatch` when an instance references a feature at or past `num_features`.
    /// * `LabelOutOfRange` when an instance's label is not below `num_labels`.
    pub fn train<'a, I>(
        &self,
        instances: I,
        num_labels: usize,
        num_features: usize,
    ) -> Result<NaiveBayesModel>
    where
        I: IntoIterator<Item = &'a DataInstance>,
    {
        self.config.validate()?;
        if num_labels == 0 {
            return Err(ClassifierError::InvalidParameter {
                name: "num_labels".to_string(),
                value: "0".to_string(),
            });
        }

        let mut feature_label_weights = Array2::<f64>::zeros(num_labels, num_features);
        let mut instance_counts = vec![0usize; num_labels];

        for instance in instances {
            if instance.label >= num_labels {
                return Err(ClassifierError::LabelOutOfRange {
                    label: instance.label,
                    num_labels,
                });
            }
            if let Some(max_index) = instance.features.max_index() {
                if max_index >= num_features {
                    return Err(ClassifierError::DimensionMismatch {
                        expected: num_features,
                        found: max_index + 1,
                    });
                }
            }
            instance_counts[instance.label] += 1;
            let row = feature_label_weights.row_slice_mut(instance.label);
            for (index, weight) in instance.features.iter() {
                row[index] += weight;
            }
        }

        if let Some(label) = instance_counts.iter().position(|&count| count == 0) {
            if !self.config.allow_missing_labels {
                return Err(ClassifierError::InsufficientData { label });
            }
            log::warn!(
                "Label {} has no training instances; using prior floor {}",
                label,
                self.config.prior_floor
            );
        }

        let label_weights = feature_label_weights.row_sums();
        let feature_weight_sum = feature_label_weights.column_sums();
        let label_weight_sum: f64 = label_weights.iter().sum();

        let complement_log_weights =
            self.complement_log_weights(&feature_label_weights, &feature_weight_sum);

        let log_priors = label_weights
            .iter()
            .map(|&weight| {
                let prior = if label_weight_sum > 0.0 {
                    weight / label_weight_sum
                } else {
                    0.0
                };
                if prior > 0.0 {
                    prior.ln()
                } else {
                    self.config.prior_floor.ln()
                }
            })
            .collect();

        log::debug!(
            "Trained complement naive bayes: {} labels, {} features, instances per label {:?}",
            num_labels,
            num_features,
            instance_counts
        );

        Ok(NaiveBayesModel {
            num_features,
            num_labels,
            feature_label_weights,
            label_weights,
            label_weight_sum,
            feature_weight_sum,
            complement_log_weights,
            log_priors,
        })
    }

    fn complement_log_weights(
        &self,
        feature_label_weights: &Array2<f64>,
        feature_weight_sum: &[f64],
    ) -> Array2<f64> {
        let (num_labels, num_features) = feature_label_weights.shape();
        let mut out = Array2::<f64>::zeros(num_labels, num_features);

        for label in 0..num_labels {
            let own = feature_label_weights.row_slice(label);
            // Column sums minus the label's own row can dip just below zero in floating point.
            let complement: Vec<f64> = feature_weight_sum
                .iter()
                .zip(own)
                .map(|(total, own)| (total - own).max(0.0) + self.config.alpha)
                .collect();
            let norm: f64 = complement.iter().sum();
            if norm <= 0.0 {
                continue;
            }
            for (dst, weight) in out.row_slice_mut(label).iter_mut().zip(&complement) {
                *dst = ln_clamped(weight / norm);
            }
        }

        out
    }
}

/// Train with default settings and the given smoothing constant.
pub fn train(
    instances: &[DataInstance],
    num_labels: usize,
    num_features: usize,
    alpha: f64,
) -> Result<NaiveBayesModel> {
    NaiveBayesTrainer::new(TrainerConfig::new(alpha)).train(instances, num_labels, num_features)
}
