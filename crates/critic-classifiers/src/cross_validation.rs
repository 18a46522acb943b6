//! Seeded k-fold cross-validation.
//!
//! Every instance is sent to fold `rng.gen_range(0..k)` in dataset order, so the
//! partition is random (not stratified) and fully determined by the seed. Each
//! round trains a fresh classifier on the other folds, scores the held-out fold
//! and records its accuracy; the reported figure is the plain mean of the
//! per-fold accuracies. Rounds that cannot be evaluated (empty test fold, or a
//! label absent from the training folds) are skipped and left out of the mean.
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::CrossValidationConfig;
use crate::data_handling::{infer_num_features, label_counts, DataInstance, LabelSet};
use crate::error::{ClassifierError, Result};
use crate::evaluation::{binary_accuracy, predict_records, EvaluationSummary};
use crate::models::factory::build_model;

/// Dataset indices belonging to one fold, in dataset order.
pub type Fold = Vec<usize>;

/// Assign `len` instances to `k` folds with a seeded RNG.
pub fn partition(len: usize, k: usize, seed: u64) -> Vec<Fold> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut folds: Vec<Fold> = vec![Vec::new(); k];
    if k == 0 {
        return folds;
    }
    for idx in 0..len {
        let fold = rng.gen_range(0..k);
        folds[fold].push(idx);
    }
    folds
}

/// Check that `folds` cover `0..len` exactly once.
pub fn validate_partition(folds: &[Fold], len: usize) -> Result<()> {
    let mut seen = vec![false; len];
    for fold in folds {
        for &idx in fold {
            if idx >= len {
                return Err(ClassifierError::InvalidParameter {
                    name: "folds".to_string(),
                    value: format!("index {} outside dataset of {} instances", idx, len),
                });
            }
            if seen[idx] {
                return Err(ClassifierError::InvalidParameter {
                    name: "folds".to_string(),
                    value: format!("index {} assigned to more than one fold", idx),
                });
            }
            seen[idx] = true;
        }
    }
    if let Some(missing) = seen.iter().position(|&assigned| !assigned) {
        return Err(ClassifierError::InvalidParameter {
            name: "folds".to_string(),
            value: format!("index {} not assigned to any fold", missing),
        });
    }
    Ok(())
}

/// Metrics of one evaluated fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldMetrics {
    pub summary: EvaluationSummary,
    pub binary_accuracy: f64,
}

impl FoldMetrics {
    pub fn accuracy(&self) -> f64 {
        self.summary.accuracy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldResult {
    Evaluated(FoldMetrics),
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldOutcome {
    pub fold: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub result: FoldResult,
}

impl FoldOutcome {
    pub fn metrics(&self) -> Option<&FoldMetrics> {
        match &self.result {
            FoldResult::Evaluated(metrics) => Some(metrics),
            FoldResult::Skipped { .. } => None,
        }
    }
}

impl fmt::Display for FoldOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            FoldResult::Evaluated(metrics) => write!(
                f,
                "Fold {}: accuracy {:.4} ({} / {} correct, binary {:.4}, {} training instances)",
                self.fold,
                metrics.accuracy(),
                metrics.summary.success,
                metrics.summary.total,
                metrics.binary_accuracy,
                self.train_size
            ),
            FoldResult::Skipped { reason } => write!(f, "Fold {}: skipped ({})", self.fold, reason),
        }
    }
}

/// Outcome of a full cross-validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationReport {
    pub k: usize,
    pub folds: Vec<FoldOutcome>,
    /// Mean of the per-fold accuracies over evaluated folds.
    pub mean_accuracy: f64,
    /// Mean of the per-fold binary-collapsed accuracies over evaluated folds.
    pub mean_binary_accuracy: f64,
}

impl CrossValidationReport {
    fn from_outcomes(k: usize, folds: Vec<FoldOutcome>) -> Result<Self> {
        let evaluated: Vec<&FoldMetrics> = folds.iter().filter_map(FoldOutcome::metrics).collect();
        if evaluated.is_empty() {
            return Err(ClassifierError::NoUsableFolds { k });
        }
        let n = evaluated.len() as f64;
        let mean_accuracy = evaluated.iter().map(|m| m.accuracy()).sum::<f64>() / n;
        let mean_binary_accuracy = evaluated.iter().map(|m| m.binary_accuracy).sum::<f64>() / n;
        Ok(Self {
            k,
            folds,
            mean_accuracy,
            mean_binary_accuracy,
        })
    }

    pub fn evaluated_folds(&self) -> usize {
        self.folds.iter().filter(|f| f.metrics().is_some()).count()
    }

    pub fn skipped_folds(&self) -> usize {
        self.folds.len() - self.evaluated_folds()
    }
}

impl fmt::Display for CrossValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.folds {
            writeln!(f, "{}", outcome)?;
        }
        write!(
            f,
            "Average accuracy: {:.4} over {} of {} folds",
            self.mean_accuracy,
            self.evaluated_folds(),
            self.k
        )
    }
}

/// Drives k train/test rounds over a dataset.
#[derive(Debug, Clone, Default)]
pub struct CrossValidator {
    config: CrossValidationConfig,
}

impl CrossValidator {
    pub fn new(config: CrossValidationConfig) -> Self {
        CrossValidator { config }
    }

    pub fn config(&self) -> &CrossValidationConfig {
        &self.config
    }

    /// Partition `dataset` with the configured seed and run every fold.
    pub fn run(&self, dataset: &[DataInstance]) -> Result<CrossValidationReport> {
        self.config.validate()?;
        let folds = partition(dataset.len(), self.config.k, self.config.seed);
        self.run_partition(dataset, &folds)
    }

    /// Run every fold of a caller-supplied partition.
    pub fn evaluate_partition(
        &self,
        dataset: &[DataInstance],
        folds: &[Fold],
    ) -> Result<CrossValidationReport> {
        self.config.trainer.validate()?;
        if folds.len() < 2 {
            return Err(ClassifierError::InvalidParameter {
                name: "k".to_string(),
                value: folds.len().to_string(),
            });
        }
        validate_partition(folds, dataset.len())?;
        self.run_partition(dataset, folds)
    }

    fn run_partition(
        &self,
        dataset: &[DataInstance],
        folds: &[Fold],
    ) -> Result<CrossValidationReport> {
        if dataset.is_empty() {
            return Err(ClassifierError::EmptyInput(
                "cross-validation needs at least one instance".to_string(),
            ));
        }

        let num_labels = self.config.label_set.num_labels();
        if let Some(bad) = dataset.iter().find(|i| !self.config.label_set.contains(i.label)) {
            return Err(ClassifierError::LabelOutOfRange {
                label: bad.label,
                num_labels,
            });
        }
        let num_features = infer_num_features(dataset);

        log::info!(
            "Cross-validating {} instances ({} features, label counts {:?}) over {} folds",
            dataset.len(),
            num_features,
            label_counts(dataset, num_labels),
            folds.len()
        );

        let outcomes: Vec<FoldOutcome> = if self.config.parallel {
            (0..folds.len())
                .into_par_iter()
                .map(|i| self.run_fold(dataset, folds, i, num_labels, num_features))
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..folds.len())
                .map(|i| self.run_fold(dataset, folds, i, num_labels, num_features))
                .collect::<Result<Vec<_>>>()?
        };

        let report = CrossValidationReport::from_outcomes(folds.len(), outcomes)?;
        log::info!("Average accuracy: {}", report.mean_accuracy);
        Ok(report)
    }

    fn run_fold(
        &self,
        dataset: &[DataInstance],
        folds: &[Fold],
        fold: usize,
        num_labels: usize,
        num_features: usize,
    ) -> Result<FoldOutcome> {
        let test: Vec<&DataInstance> = folds[fold].iter().map(|&idx| &dataset[idx]).collect();
        let train: Vec<&DataInstance> = folds
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != fold)
            .flat_map(|(_, members)| members.iter().map(|&idx| &dataset[idx]))
            .collect();

        log::trace!(
            "Preparing fold {} with {} training and {} testing instances",
            fold,
            train.len(),
            test.len()
        );

        let skipped = |reason: String| -> Result<FoldOutcome> {
            log::warn!("Fold {} skipped: {}", fold, reason);
            Ok(FoldOutcome {
                fold,
                train_size: train.len(),
                test_size: test.len(),
                result: FoldResult::Skipped { reason },
            })
        };

        if test.is_empty() {
            return skipped("empty test fold".to_string());
        }

        log::info!("Fold {}: training on {} instances", fold, train.len());
        let mut model = build_model(&self.config.trainer);
        match model.fit(&train, num_labels, num_features) {
            Ok(()) => {}
            Err(err @ ClassifierError::InsufficientData { .. }) => {
                return skipped(err.to_string());
            }
            Err(err) => return Err(err),
        }

        log::info!("Fold {}: testing on {} instances", fold, test.len());
        let records = predict_records(model.as_ref(), test.iter().copied())?;
        let summary = EvaluationSummary::from_predictions(&records)?;
        let binary = binary_accuracy(&records)?;
        log::debug!("Fold {}:\n{}", fold, summary);

        Ok(FoldOutcome {
            fold,
            train_size: train.len(),
            test_size: test.len(),
            result: FoldResult::Evaluated(FoldMetrics {
                summary,
                binary_accuracy: binary,
            }),
        })
    }
}

/// Mean per-fold accuracy of Complement Naive Bayes over `k` seeded folds.
///
/// Uses default trainer settings and the smallest label set that holds every
/// label in `dataset`.
pub fn evaluate(dataset: &[DataInstance], k: usize, seed: u64) -> Result<f64> {
    let config = CrossValidationConfig {
        label_set: LabelSet::smallest_containing(dataset),
        ..CrossValidationConfig::new(k, seed)
    };
    CrossValidator::new(config)
        .run(dataset)
        .map(|report| report.mean_accuracy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_is_reproducible_and_complete() {
        let a = partition(50, 5, 7);
        let b = partition(50, 5, 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        assert!(validate_partition(&a, 50).is_ok());
    }

    #[test]
    fn validate_partition_catches_duplicates_and_gaps() {
        assert!(validate_partition(&[vec![0, 1], vec![1]], 2).is_err());
        assert!(validate_partition(&[vec![0], vec![]], 2).is_err());
        assert!(validate_partition(&[vec![0], vec![5]], 2).is_err());
    }

    #[test]
    fn single_fold_rejected() {
        let err = evaluate(&[], 1, 0).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidParameter { .. }));
    }

    #[test]
    fn empty_dataset_is_empty_input() {
        assert!(matches!(evaluate(&[], 3, 0), Err(ClassifierError::EmptyInput(_))));
    }
}
