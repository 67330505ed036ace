//! CSV/JSON assumption loader
//!
//! Loads calculator assumptions from files in data/assumptions/

use std::fs::File;
use std::path::Path;

use log::info;
use serde::de::DeserializeOwned;

use super::catalog::{InstallationRow, StorageOption};
use super::coefficients::Coefficients;
use crate::error::LoadError;

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

pub const COEFFICIENTS_FILE: &str = "coefficients.json";
pub const CATALOG_FILE: &str = "installation_catalog.csv";
pub const STORAGE_FILE: &str = "storage_options.csv";

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_csv_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(open(path)?);

    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Load coefficients from JSON; fields missing from the file keep their defaults
pub fn load_coefficients(path: &Path) -> Result<Coefficients, LoadError> {
    let file = path.join(COEFFICIENTS_FILE);
    let coefficients: Coefficients =
        serde_json::from_reader(open(&file)?).map_err(|source| LoadError::Json {
            path: file.clone(),
            source,
        })?;
    coefficients.validate()?;
    Ok(coefficients)
}

/// Load installation packages from CSV (`size_kw,cost,battery_kwh`)
pub fn load_installation_rows(path: &Path) -> Result<Vec<InstallationRow>, LoadError> {
    load_csv_rows(&path.join(CATALOG_FILE))
}

/// Load storage products from CSV (`storage_kwh,pv_match_kw`)
pub fn load_storage_options(path: &Path) -> Result<Vec<StorageOption>, LoadError> {
    load_csv_rows(&path.join(STORAGE_FILE))
}

/// Raw contents of an assumptions directory
pub struct LoadedAssumptions {
    pub coefficients: Coefficients,
    pub installation_rows: Vec<InstallationRow>,
    pub storage_options: Vec<StorageOption>,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self, LoadError> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self, LoadError> {
        let loaded = Self {
            coefficients: load_coefficients(path)?,
            installation_rows: load_installation_rows(path)?,
            storage_options: load_storage_options(path)?,
        };
        info!(
            "loaded assumptions from {}: {} packages, {} storage options",
            path.display(),
            loaded.installation_rows.len(),
            loaded.storage_options.len()
        );
        Ok(loaded)
    }
}
