//! Accuracy metrics over prediction records.
//!
//! Binary accuracy compares labels after projecting both sides through
//! `LabelSet::collapsed`; the records and their instances are left untouched.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data_handling::{DataInstance, LabelSet};
use crate::error::{ClassifierError, Result};
use crate::models::ClassifierModel;

/// One scored test instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Position of the instance in the sequence it was scored from.
    pub index: usize,
    pub predicted_label: usize,
    pub true_label: usize,
}

impl PredictionRecord {
    pub fn new(index: usize, predicted_label: usize, true_label: usize) -> Self {
        Self {
            index,
            predicted_label,
            true_label,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.predicted_label == self.true_label
    }

    pub fn is_correct_collapsed(&self) -> bool {
        LabelSet::collapsed(self.predicted_label) == LabelSet::collapsed(self.true_label)
    }
}

/// Score every instance with `model` and pair each prediction with its truth.
pub fn predict_records<'a, I>(model: &dyn ClassifierModel, instances: I) -> Result<Vec<PredictionRecord>>
where
    I: IntoIterator<Item = &'a DataInstance>,
{
    instances
        .into_iter()
        .enumerate()
        .map(|(index, instance)| {
            let predicted = model.predict(&instance.features)?;
            Ok(PredictionRecord::new(index, predicted, instance.label))
        })
        .collect()
}

/// Fraction of records whose predicted label equals the true label.
///
/// Fails with `EmptyInput` instead of returning NaN for no records.
pub fn accuracy(predictions: &[PredictionRecord]) -> Result<f64> {
    ratio(predictions, PredictionRecord::is_correct)
}

/// Accuracy after collapsing both labels onto the polarity scale.
pub fn binary_accuracy(predictions: &[PredictionRecord]) -> Result<f64> {
    ratio(predictions, PredictionRecord::is_correct_collapsed)
}

fn ratio<F>(predictions: &[PredictionRecord], is_hit: F) -> Result<f64>
where
    F: Fn(&PredictionRecord) -> bool,
{
    if predictions.is_empty() {
        return Err(ClassifierError::EmptyInput(
            "cannot compute accuracy of zero predictions".to_string(),
        ));
    }
    let hits = predictions.iter().filter(|record| is_hit(record)).count();
    Ok(hits as f64 / predictions.len() as f64)
}

/// Total, success, fail and accuracy of one test pass.
pub fn summarize(predictions: &[PredictionRecord]) -> Result<EvaluationSummary> {
    EvaluationSummary::from_predictions(predictions)
}

/// Counts for one test pass. `Display` labels the accuracy `Precise:`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub total: usize,
    pub success: usize,
    pub fail: usize,
    pub accuracy: f64,
}

impl EvaluationSummary {
    pub fn from_predictions(predictions: &[PredictionRecord]) -> Result<Self> {
        let rate = accuracy(predictions)?;
        Ok(Self::build(predictions, rate, PredictionRecord::is_correct))
    }

    pub fn from_predictions_collapsed(predictions: &[PredictionRecord]) -> Result<Self> {
        let rate = binary_accuracy(predictions)?;
        Ok(Self::build(
            predictions,
            rate,
            PredictionRecord::is_correct_collapsed,
        ))
    }

    fn build<F>(predictions: &[PredictionRecord], accuracy: f64, is_hit: F) -> Self
    where
        F: Fn(&PredictionRecord) -> bool,
    {
        let total = predictions.len();
        let success = predictions.iter().filter(|record| is_hit(record)).count();
        Self {
            total,
            success,
            fail: total - success,
            accuracy,
        }
    }
}

impl fmt::Display for EvaluationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total: {}", self.total)?;
        writeln!(f, "Success: {}", self.success)?;
        writeln!(f, "Fail: {}", self.fail)?;
        write!(f, "Precise: {}", self.accuracy)
    }
}

/// Counts of `(true label, predicted label)` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    num_labels: usize,
    counts: Vec<usize>,
}

impl ConfusionMatrix {
    pub fn from_predictions(predictions: &[PredictionRecord], num_labels: usize) -> Result<Self> {
        let mut counts = vec![0usize; num_labels * num_labels];
        for record in predictions {
            for label in [record.true_label, record.predicted_label] {
                if label >= num_labels {
                    return Err(ClassifierError::LabelOutOfRange { label, num_labels });
                }
            }
            counts[record.true_label * num_labels + record.predicted_label] += 1;
        }
        Ok(Self { num_labels, counts })
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    pub fn count(&self, true_label: usize, predicted_label: usize) -> usize {
        self.counts[true_label * self.num_labels + predicted_label]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn correct(&self) -> usize {
        (0..self.num_labels).map(|label| self.count(label, label)).sum()
    }

    /// Share of instances with `label` that were predicted as `label`, `None` if there were none.
    pub fn recall(&self, label: usize) -> Option<f64> {
        let row: usize = (0..self.num_labels).map(|p| self.count(label, p)).sum();
        if row == 0 {
            None
        } else {
            Some(self.count(label, label) as f64 / row as f64)
        }
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "true\\pred")?;
        for predicted in 0..self.num_labels {
            write!(f, "\t{}", predicted)?;
        }
        for actual in 0..self.num_labels {
            write!(f, "\n{}", actual)?;
            for predicted in 0..self.num_labels {
                write!(f, "\t{}", self.count(actual, predicted))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(truth: &[usize], predicted: &[usize]) -> Vec<PredictionRecord> {
        truth
            .iter()
            .zip(predicted)
            .enumerate()
            .map(|(i, (&t, &p))| PredictionRecord::new(i, p, t))
            .collect()
    }

    #[test]
    fn binary_collapse_pairs_follow_projection() {
        let preds = records(&[0, 1, 2, 3], &[0, 1, 1, 3]);
        assert_eq!(accuracy(&preds).unwrap(), 0.75);
        let collapsed: Vec<(usize, usize)> = preds
            .iter()
            .map(|r| (LabelSet::collapsed(r.true_label), LabelSet::collapsed(r.predicted_label)))
            .collect();
        assert_eq!(collapsed, vec![(0, 0), (0, 0), (1, 0), (1, 1)]);
        assert_eq!(binary_accuracy(&preds).unwrap(), 0.75);
    }

    #[test]
    fn binary_collapse_matches_within_polarity() {
        let preds = records(&[0, 1, 2, 3], &[1, 0, 3, 2]);
        assert_eq!(accuracy(&preds).unwrap(), 0.0);
        assert_eq!(binary_accuracy(&preds).unwrap(), 1.0);

        let preds = records(&[0, 1, 2, 3], &[0, 0, 2, 2]);
        assert_eq!(accuracy(&preds).unwrap(), 0.5);
        assert_eq!(binary_accuracy(&preds).unwrap(), 1.0);
    }

    #[test]
    fn empty_predictions_are_an_error() {
        assert!(matches!(accuracy(&[]), Err(ClassifierError::EmptyInput(_))));
        assert!(matches!(binary_accuracy(&[]), Err(ClassifierError::EmptyInput(_))));
        assert!(EvaluationSummary::from_predictions(&[]).is_err());
    }

    #[test]
    fn summary_counts_and_display() {
        let preds = records(&[0, 1, 2, 3], &[0, 2, 2, 0]);
        let summary = summarize(&preds).unwrap();
        assert_eq!((summary.total, summary.success, summary.fail), (4, 2, 2));
        assert_eq!(summary.accuracy, 0.5);
        let text = summary.to_string();
        assert!(text.contains("Total: 4"));
        assert!(text.contains("Precise: 0.5"));

        let collapsed = EvaluationSummary::from_predictions_collapsed(&preds).unwrap();
        assert_eq!(collapsed.success, 2);
    }

    #[test]
    fn confusion_matrix_counts() {
        let preds = records(&[0, 0, 1, 3], &[0, 1, 1, 3]);
        let cm = ConfusionMatrix::from_predictions(&preds, 4).unwrap();
        assert_eq!(cm.count(0, 1), 1);
        assert_eq!(cm.total(), 4);
        assert_eq!(cm.correct(), 3);
        assert_eq!(cm.recall(0), Some(0.5));
        assert_eq!(cm.recall(2), None);
        assert!(ConfusionMatrix::from_predictions(&preds, 2).is_err());
    }
}
