use crate::config::TrainerConfig;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::complement::ComplementNaiveBayesClassifier;

/// Build an untrained boxed classifier from a `TrainerConfig`.
pub fn build_model(config: &TrainerConfig) -> Box<dyn ClassifierModel> {
    Box::new(ComplementNaiveBayesClassifier::new(config.clone()))
}
