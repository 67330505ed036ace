//! Solar Calculator - sizing and savings projection for residential PV + battery installations
//!
//! This library provides:
//! - Normalization of user-typed tariff inputs
//! - Installation sizing against a priced catalog
//! - A 25-year projection of production, billing and savings under standard and dynamic tariffs
//! - Payback year and IRR per tariff
//! - A host layer that notifies subscribers of every recalculation

pub mod error;
pub mod tariff;
pub mod assumptions;
pub mod projection;
pub mod scenario;
pub mod host;
pub mod format;

// Re-export commonly used types
pub use error::{CalculatorError, LoadError};
pub use tariff::{normalize, PricingRegime, RawTariffInputs, TariffInputs};
pub use assumptions::{Assumptions, Coefficients, InstallationCatalog, StorageOptions};
pub use projection::{Headline, ProjectionEngine, SizingResult, YearProjection};
pub use scenario::ScenarioRunner;
pub use host::{CalculatorHost, CalculatorUpdate};
