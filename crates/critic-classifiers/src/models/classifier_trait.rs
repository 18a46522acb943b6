use crate::data_handling::{DataInstance, FeatureVector};
use crate::error::Result;

/// The contract the cross-validation harness relies on.
///
/// Implementations are trained once per fold and dropped afterwards, so they
/// never carry state from one fold into the next.
pub trait ClassifierModel: Send {
    /// Fit the model on borrowed instances with the given label and feature ranges.
    fn fit(
        &mut self,
        instances: &[&DataInstance],
        num_labels: usize,
        num_features: usize,
    ) -> Result<()>;

    /// Per-label scores, higher is more likely. Length equals the number of labels.
    fn classify(&self, features: &FeatureVector) -> Result<Vec<f64>>;

    /// Label with the highest score, lowest index on ties.
    fn predict(&self, features: &FeatureVector) -> Result<usize>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
