//! Input helpers that turn tabular files into `DataInstance`s.
pub mod labeled_csv;

pub use labeled_csv::{
    read_instances_csv, read_instances_csv_with_config, read_labeled_vectors, LoadedData,
    LoaderConfig,
};
