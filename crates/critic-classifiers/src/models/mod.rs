pub mod classifier_trait;
pub mod complement;
pub mod factory;
pub mod naive_bayes;

pub use classifier_trait::ClassifierModel;
pub use complement::ComplementNaiveBayesClassifier;
pub use naive_bayes::{NaiveBayesModel, NaiveBayesTrainer};
