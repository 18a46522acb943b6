//! Labelled sparse feature vectors and the label sets they are drawn from.
//!
//! `FeatureVector` stores only the non-zero weights of a review vector, sorted
//! by feature index. `DataInstance` pairs a vector with its ordinal label and
//! is never relabelled in place; evaluation on the coarser polarity scale goes
//! through `LabelSet::collapsed` instead.
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

/// Sparse mapping from feature index to a non-negative weight.
///
/// Serialised as a list of `(index, weight)` pairs; deserialisation goes
/// through [`FeatureVector::from_pairs`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(usize, f64)>", into = "Vec<(usize, f64)>")]
pub struct FeatureVector {
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build a vector from `(index, weight)` pairs in any order.
    ///
    /// Repeated indices are summed and zero weights dropped. Negative or
    /// non-finite weights are rejected.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut entries: Vec<(usize, f64)> = Vec::new();
        for (index, weight) in pairs {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ClassifierError::InvalidValue(format!(
                    "feature {} has weight {}",
                    index, weight
                )));
            }
            entries.push((index, weight));
        }
        entries.sort_by_key(|&(index, _)| index);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, weight) in entries {
            if let Some(last) = merged.last_mut() {
                if last.0 == index {
                    last.1 += weight;
                    continue;
                }
            }
            merged.push((index, weight));
        }
        merged.retain(|&(_, weight)| weight != 0.0);

        Ok(Self { entries: merged })
    }

    /// Build a vector from a dense row, keeping the non-zero cells.
    pub fn from_dense(values: &[f64]) -> Result<Self> {
        Self::from_pairs(values.iter().copied().enumerate())
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Non-zero entries in increasing index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_index(&self) -> Option<usize> {
        self.entries.last().map(|&(index, _)| index)
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|&(_, weight)| weight).sum()
    }

    /// Dot product with a dense row. Indices past the end of `dense` count as zero.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(index, weight)| dense.get(index).map(|w| weight * w))
            .sum()
    }
}

impl TryFrom<Vec<(usize, f64)>> for FeatureVector {
    type Error = ClassifierError;

    fn try_from(pairs: Vec<(usize, f64)>) -> Result<Self> {
        Self::from_pairs(pairs)
    }
}

impl From<FeatureVector> for Vec<(usize, f64)> {
    fn from(vector: FeatureVector) -> Self {
        vector.entries
    }
}

/// One review: its feature vector and ordinal rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataInstance {
    pub features: FeatureVector,
    pub label: usize,
}

impl DataInstance {
    pub fn new(features: FeatureVector, label: usize) -> Self {
        Self { features, label }
    }
}

/// The label scale a dataset is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSet {
    /// Ordinal ratings 0, 1, 2, 3.
    #[default]
    FourClass,
    /// Polarity 0 (negative) and 1 (positive).
    Binary,
}

impl LabelSet {
    pub fn num_labels(&self) -> usize {
        match self {
            LabelSet::FourClass => 4,
            LabelSet::Binary => 2,
        }
    }

    pub fn contains(&self, label: usize) -> bool {
        label < self.num_labels()
    }

    pub fn labels(&self) -> std::ops::Range<usize> {
        0..self.num_labels()
    }

    /// The smallest label set holding every label in `instances`.
    pub fn smallest_containing(instances: &[DataInstance]) -> LabelSet {
        if instances.iter().all(|instance| LabelSet::Binary.contains(instance.label)) {
            LabelSet::Binary
        } else {
            LabelSet::FourClass
        }
    }

    /// Project an ordinal rating onto the polarity scale.
    pub fn collapsed(label: usize) -> usize {
        if label <= 1 {
            0
        } else {
            1
        }
    }
}

impl FromStr for LabelSet {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "four-class" | "four_class" | "4" => Ok(LabelSet::FourClass),
            "binary" | "2" => Ok(LabelSet::Binary),
            _ => Err(format!(
                "Unknown label set: {}. Expected 'four-class' or 'binary'",
                s
            )),
        }
    }
}

/// Largest feature index referenced by any instance, plus one.
pub fn infer_num_features(instances: &[DataInstance]) -> usize {
    instances
        .iter()
        .filter_map(|instance| instance.features.max_index())
        .max()
        .map(|index| index + 1)
        .unwrap_or(0)
}

/// Number of instances carrying each label in `0..num_labels`.
///
/// Labels outside the range are not counted.
pub fn label_counts(instances: &[DataInstance], num_labels: usize) -> Vec<usize> {
    let mut counts = vec![0usize; num_labels];
    for instance in instances {
        if let Some(count) = counts.get_mut(instance.label) {
            *count += 1;
        }
    }
    counts
}
