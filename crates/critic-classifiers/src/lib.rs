//! critic-classifiers: Complement Naive Bayes for ordinal review sentiment.
//!
//! This crate trains Complement Naive Bayes models on sparse, already-vectorised
//! reviews, scores new vectors, and measures accuracy with seeded k-fold
//! cross-validation. A small CSV loader and JSON model persistence are included
//! so the command line front end stays thin.
pub mod config;
pub mod cross_validation;
pub mod data_handling;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod math;
pub mod models;

pub use error::{ClassifierError, Result};
