use crate::config::TrainerConfig;
use crate::data_handling::{DataInstance, FeatureVector};
use crate::error::{ClassifierError, Result};
use crate::math::argmax;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::naive_bayes::{NaiveBayesModel, NaiveBayesTrainer};

/// Complement Naive Bayes classifier
pub struct ComplementNaiveBayesClassifier {
    model: Option<NaiveBayesModel>,
    trainer: NaiveBayesTrainer,
}

impl ComplementNaiveBayesClassifier {
    pub fn new(config: TrainerConfig) -> Self {
        ComplementNaiveBayesClassifier {
            model: None,
            trainer: NaiveBayesTrainer::new(config),
        }
    }

    /// Wrap an already trained model, e.g. one loaded from disk.
    pub fn from_model(model: NaiveBayesModel) -> Self {
        ComplementNaiveBayesClassifier {
            model: Some(model),
            trainer: NaiveBayesTrainer::default(),
        }
    }

    pub fn model(&self) -> Option<&NaiveBayesModel> {
        self.model.as_ref()
    }

    pub fn into_model(self) -> Option<NaiveBayesModel> {
        self.model
    }

    fn fitted(&self) -> Result<&NaiveBayesModel> {
        self.model.as_ref().ok_or(ClassifierError::NotFitted)
    }

    /// Scores for every instance, in order.
    pub fn classify_all(&self, instances: &[DataInstance]) -> Result<Vec<Vec<f64>>> {
        let model = self.fitted()?;
        Ok(instances
            .iter()
            .map(|instance| model.scores(&instance.features))
            .collect())
    }

    /// Predicted label for every instance, in order.
    pub fn predict_all(&self, instances: &[DataInstance]) -> Result<Vec<usize>> {
        instances
            .iter()
            .map(|instance| self.predict(&instance.features))
            .collect()
    }
}

impl ClassifierModel for ComplementNaiveBayesClassifier {
    fn fit(
        &mut self,
        instances: &[&DataInstance],
        num_labels: usize,
        num_features: usize,
    ) -> Result<()> {
        let model = self
            .trainer
            .train(instances.iter().copied(), num_labels, num_features)?;
        self.model = Some(model);
        Ok(())
    }

    fn classify(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        Ok(self.fitted()?.scores(features))
    }

    fn predict(&self, features: &FeatureVector) -> Result<usize> {
        let scores = self.classify(features)?;
        argmax(&scores).ok_or_else(|| {
            ClassifierError::InvalidValue("no comparable score to predict from".to_string())
        })
    }

    fn name(&self) -> &str {
        "complement_naive_bayes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(dense: &[f64], label: usize) -> DataInstance {
        DataInstance::new(FeatureVector::from_dense(dense).unwrap(), label)
    }

    fn fitted_classifier(data: &[DataInstance], num_labels: usize) -> ComplementNaiveBayesClassifier {
        let refs: Vec<&DataInstance> = data.iter().collect();
        let mut classifier = ComplementNaiveBayesClassifier::new(TrainerConfig::default());
        classifier
            .fit(&refs, num_labels, crate::data_handling::infer_num_features(data))
            .unwrap();
        classifier
    }

    #[test]
    fn unfitted_classifier_reports_not_fitted() {
        let classifier = ComplementNaiveBayesClassifier::new(TrainerConfig::default());
        let err = classifier.classify(&FeatureVector::default()).unwrap_err();
        assert_eq!(err, ClassifierError::NotFitted);
    }

    #[test]
    fn separable_data_is_predicted_correctly() {
        let data = vec![
            instance(&[5.0, 0.0], 0),
            instance(&[4.0, 0.0], 0),
            instance(&[0.0, 5.0], 1),
            instance(&[0.0, 6.0], 1),
        ];
        let classifier = fitted_classifier(&data, 2);
        assert_eq!(classifier.predict_all(&data).unwrap(), vec![0, 0, 1, 1]);
        assert_eq!(classifier.name(), "complement_naive_bayes");
    }

    #[test]
    fn label_zero_can_win() {
        let data = vec![
            instance(&[6.0, 0.0, 0.0], 0),
            instance(&[0.0, 6.0, 0.0], 1),
            instance(&[0.0, 0.0, 6.0], 2),
        ];
        let classifier = fitted_classifier(&data, 3);
        let input = FeatureVector::from_dense(&[3.0, 0.0, 0.0]).unwrap();
        assert_eq!(classifier.predict(&input).unwrap(), 0);
    }

    #[test]
    fn symmetric_data_ties_go_to_lowest_label() {
        let data = vec![instance(&[2.0, 0.0], 0), instance(&[0.0, 2.0], 1)];
        let classifier = fitted_classifier(&data, 2);
        let scores = classifier.classify(&FeatureVector::default()).unwrap();
        assert_eq!(scores[0], scores[1]);
        assert_eq!(classifier.predict(&FeatureVector::default()).unwrap(), 0);
    }

    #[test]
    fn score_length_matches_labels_and_unknown_features_are_ignored() {
        let data = vec![instance(&[1.0, 2.0], 0), instance(&[2.0, 1.0], 1)];
        let classifier = fitted_classifier(&data, 2);
        let known = FeatureVector::from_dense(&[1.0, 1.0]).unwrap();
        let with_unknown = FeatureVector::from_pairs(vec![(0, 1.0), (1, 1.0), (99, 7.0)]).unwrap();
        let scores = classifier.classify(&with_unknown).unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores.iter().all(|s| !s.is_nan()));
        assert_eq!(scores, classifier.classify(&known).unwrap());
    }

    #[test]
    fn classify_is_deterministic() {
        let data = vec![instance(&[1.0, 3.0], 0), instance(&[4.0, 1.0], 1)];
        let classifier = fitted_classifier(&data, 2);
        let input = FeatureVector::from_dense(&[2.0, 2.0]).unwrap();
        let first = classifier.classify(&input).unwrap();
        let second = classifier.classify(&input).unwrap();
        assert_eq!(first, second);
    }
}
