//! Error types for input normalization and assumption loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning user input into a projection
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculatorError {
    /// Bill missing or non-positive, or the per-kWh tariff is non-positive.
    /// Callers render a cleared state; this is never fatal.
    #[error("missing or invalid input: {reason}")]
    MissingOrInvalidInput { reason: String },
}

impl CalculatorError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::MissingOrInvalidInput { reason: reason.into() }
    }
}

/// Errors raised while loading an assumptions directory
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("installation catalog is empty")]
    EmptyCatalog,

    #[error("installation catalog row {row} has a non-finite value")]
    NonFiniteCatalogRow { row: usize },

    #[error("installation catalog is not ascending at row {row} ({size_kw} kW)")]
    UnsortedCatalog { row: usize, size_kw: f64 },

    #[error("invalid coefficient {name}: {value}")]
    InvalidCoefficient { name: &'static str, value: f64 },
}
