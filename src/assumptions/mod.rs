//! Calculator assumptions: coefficients, installation catalog and storage products

mod coefficients;
mod catalog;
pub mod loader;

pub use coefficients::Coefficients;
pub use catalog::{
    CatalogMatch, InstallationCatalog, InstallationRow, StorageOption, StorageOptions,
    SIZE_TOLERANCE_KW,
};
pub use loader::LoadedAssumptions;

use std::path::Path;

use crate::error::LoadError;

/// Container for all calculator assumptions
#[derive(Debug, Clone, PartialEq)]
pub struct Assumptions {
    pub coefficients: Coefficients,
    pub catalog: InstallationCatalog,
    pub storage: StorageOptions,
}

impl Assumptions {
    /// Create assumptions with the values of the published calculator
    pub fn default_pricing() -> Self {
        Self {
            coefficients: Coefficients::default_pricing(),
            catalog: InstallationCatalog::default_pricing(),
            storage: StorageOptions::default_pricing(),
        }
    }

    /// Load assumptions from the default location (data/assumptions/)
    pub fn from_dir_default() -> Result<Self, LoadError> {
        Self::from_dir(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from a specific directory
    pub fn from_dir(path: &Path) -> Result<Self, LoadError> {
        let loaded = LoadedAssumptions::load_from(path)?;

        Ok(Self {
            coefficients: loaded.coefficients,
            catalog: InstallationCatalog::new(loaded.installation_rows)?,
            storage: StorageOptions::new(loaded.storage_options),
        })
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_pricing()
    }
}
