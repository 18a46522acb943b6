//! Reader for labelled feature tables.
//!
//! One header row, one integer label column, every other column a feature.
//! Feature indices follow the order of the feature columns in the header.
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::data_handling::{DataInstance, FeatureVector, LabelSet};
use crate::error::{ClassifierError, Result};

/// Parsed table ready for training or evaluation.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub instances: Vec<DataInstance>,
    pub feature_names: Vec<String>,
}

impl LoadedData {
    pub fn num_features(&self) -> usize {
        self.feature_names.len()
    }
}

/// Configuration for reading labelled CSV/TSV tables.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Column holding the integer rating.
    pub label_column: String,
    /// Columns skipped when selecting features (ids, raw text, ...).
    pub ignore_columns: Vec<String>,
    /// Field delimiter. `None` picks tab for `.tsv` paths and comma otherwise.
    pub delimiter: Option<char>,
    /// Labels outside this set are rejected.
    pub label_set: LabelSet,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            label_column: "label".to_string(),
            ignore_columns: vec!["id".to_string()],
            delimiter: None,
            label_set: LabelSet::FourClass,
        }
    }
}

/// Read a labelled table with the default configuration.
pub fn read_instances_csv<P: AsRef<Path>>(path: P) -> Result<LoadedData> {
    read_instances_csv_with_config(path, &LoaderConfig::default())
}

/// Read a labelled table from a file.
pub fn read_instances_csv_with_config<P: AsRef<Path>>(
    path: P,
    config: &LoaderConfig,
) -> Result<LoadedData> {
    let path = path.as_ref();
    let delimiter = config.delimiter.unwrap_or_else(|| {
        let is_tsv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("tsv"))
            .unwrap_or(false);
        if is_tsv {
            '\t'
        } else {
            ','
        }
    });
    let file = std::fs::File::open(path).map_err(|err| {
        ClassifierError::Io(format!("Failed to open {}: {}", path.display(), err))
    })?;
    let data = read_labeled_vectors(file, delimiter, config)?;
    log::info!(
        "Loaded {} instances with {} features from {}",
        data.instances.len(),
        data.num_features(),
        path.display()
    );
    Ok(data)
}

/// Read a labelled table from any reader.
pub fn read_labeled_vectors<R: Read>(
    input: R,
    delimiter: char,
    config: &LoaderConfig,
) -> Result<LoadedData> {
    if !delimiter.is_ascii() {
        return Err(ClassifierError::InvalidParameter {
            name: "delimiter".to_string(),
            value: delimiter.to_string(),
        });
    }
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let label_idx = find_column(&headers, &config.label_column).ok_or_else(|| {
        ClassifierError::ParseError {
            line: 1,
            message: format!("Missing label column '{}'", config.label_column),
        }
    })?;

    let feature_indices: Vec<usize> = (0..headers.len())
        .filter(|&idx| idx != label_idx)
        .filter(|&idx| {
            let name = headers.get(idx).unwrap_or_default();
            !config
                .ignore_columns
                .iter()
                .any(|ignored| ignored.eq_ignore_ascii_case(name))
        })
        .collect();
    let feature_names: Vec<String> = feature_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or_default().to_string())
        .collect();

    let mut instances = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(instances.len() + 2);
        instances.push(parse_record(&record, line, label_idx, &feature_indices, config)?);
    }

    Ok(LoadedData {
        instances,
        feature_names,
    })
}

fn parse_record(
    record: &StringRecord,
    line: usize,
    label_idx: usize,
    feature_indices: &[usize],
    config: &LoaderConfig,
) -> Result<DataInstance> {
    let parse_error = |message: String| ClassifierError::ParseError { line, message };

    let raw_label = record
        .get(label_idx)
        .ok_or_else(|| parse_error("missing label value".to_string()))?;
    let label = raw_label
        .parse::<usize>()
        .map_err(|_| parse_error(format!("invalid label '{}'", raw_label)))?;
    if !config.label_set.contains(label) {
        return Err(parse_error(format!(
            "label {} outside the {} label range",
            label,
            config.label_set.num_labels()
        )));
    }

    let mut pairs = Vec::with_capacity(feature_indices.len());
    for (feature, &column) in feature_indices.iter().enumerate() {
        let raw = record.get(column).unwrap_or_default();
        if raw.is_empty() {
            continue;
        }
        let value = raw
            .parse::<f64>()
            .map_err(|_| parse_error(format!("invalid value '{}' in column {}", raw, column + 1)))?;
        if !value.is_finite() || value < 0.0 {
            return Err(parse_error(format!(
                "feature value {} in column {} must be a non-negative number",
                value,
                column + 1
            )));
        }
        pairs.push((feature, value));
    }

    let features = FeatureVector::from_pairs(pairs).map_err(|err| parse_error(err.to_string()))?;
    Ok(DataInstance::new(features, label))
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Result<LoadedData> {
        read_labeled_vectors(text.as_bytes(), ',', &LoaderConfig::default())
    }

    #[test]
    fn reads_sparse_rows() {
        let data = read("id,good,bad,label\n1,2,0,3\n2,0,1.5,0\n").unwrap();
        assert_eq!(data.feature_names, vec!["good", "bad"]);
        assert_eq!(data.instances.len(), 2);
        assert_eq!(data.instances[0].label, 3);
        assert_eq!(data.instances[0].features.nnz(), 1);
        assert_eq!(data.instances[1].features.get(1), 1.5);
    }

    #[test]
    fn empty_cells_count_as_zero() {
        let data = read("a,b,label\n,4,1\n").unwrap();
        assert_eq!(data.instances[0].features.iter().collect::<Vec<_>>(), vec![(1, 4.0)]);
    }

    #[test]
    fn malformed_rows_are_parse_errors() {
        let bad_label = read("a,label\n1,x\n").unwrap_err();
        assert!(matches!(bad_label, ClassifierError::ParseError { line: 2, .. }));

        let negative = read("a,label\n1,0\n-1,0\n").unwrap_err();
        assert!(matches!(negative, ClassifierError::ParseError { line: 3, .. }));

        assert!(matches!(read("a,label\nz,1\n"), Err(ClassifierError::ParseError { .. })));
        assert!(matches!(read("a,label\n1,7\n"), Err(ClassifierError::ParseError { .. })));
        assert!(matches!(read("a,label\n1,2,3\n"), Err(ClassifierError::ParseError { .. })));
    }

    #[test]
    fn missing_label_column() {
        let err = read("a,b\n1,2\n").unwrap_err();
        assert!(matches!(err, ClassifierError::ParseError { line: 1, .. }));
    }

    #[test]
    fn binary_label_set_rejects_ordinal_ratings() {
        let config = LoaderConfig {
            label_set: LabelSet::Binary,
            ..LoaderConfig::default()
        };
        assert!(read_labeled_vectors("a,label\n1,2\n".as_bytes(), ',', &config).is_err());
        assert!(read_labeled_vectors("a,label\n1,1\n".as_bytes(), ',', &config).is_ok());
    }
}
