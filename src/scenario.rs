//! Scenario runner for repeated and batch calculations
//!
//! Pre-loads assumptions once, then runs any number of calculations against
//! them. Sweeps over the bill slider run in parallel.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{CalculatorError, LoadError};
use crate::projection::{ProjectionEngine, SizingResult};
use crate::tariff::{normalize, BillRange, RawTariffInputs, TariffInputs};
use crate::Assumptions;

/// One bill of a sweep with the figures that drive the recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub monthly_bill: f64,
    pub pv_power_kw: f64,
    pub battery_kwh: f64,
    pub installation_cost: f64,
    pub net_cost: f64,
    pub first_year_savings: f64,
    pub payback_year: Option<u32>,
}

impl SweepPoint {
    fn from_result(result: &SizingResult) -> Self {
        let regime = result.regime(result.inputs.regime());
        Self {
            monthly_bill: result.inputs.monthly_bill,
            pv_power_kw: result.installation.pv_power_kw,
            battery_kwh: result.installation.battery_kwh,
            installation_cost: result.installation.installation_cost,
            net_cost: result.installation.net_cost,
            first_year_savings: regime.first_year_savings,
            payback_year: regime.payback_year,
        }
    }
}

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let result = runner.run_raw(&form)?;
/// let sweep = runner.sweep_bills(&inputs, &BillRange::default());
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with the built-in pricing
    pub fn new() -> Self {
        Self::with_assumptions(Assumptions::default_pricing())
    }

    /// Create runner from an assumptions directory
    pub fn from_dir(path: &Path) -> Result<Self, LoadError> {
        Ok(Self::with_assumptions(Assumptions::from_dir(path)?))
    }

    /// Create runner with pre-built assumptions
    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            engine: ProjectionEngine::new(assumptions),
        }
    }

    /// Run a single calculation
    pub fn run(&self, inputs: &TariffInputs) -> Result<SizingResult, CalculatorError> {
        self.engine.calculate(inputs)
    }

    /// Normalize raw form values, then run
    pub fn run_raw(&self, raw: &RawTariffInputs) -> Result<SizingResult, CalculatorError> {
        self.run(&normalize(raw)?)
    }

    /// Run many independent calculations, results in input order
    pub fn run_batch(&self, inputs: &[TariffInputs]) -> Vec<Result<SizingResult, CalculatorError>> {
        inputs.par_iter().map(|i| self.engine.calculate(i)).collect()
    }

    /// Evaluate every bill of `range`, keeping the other tariff values of `template`
    pub fn sweep_bills(&self, template: &TariffInputs, range: &BillRange) -> Vec<SweepPoint> {
        range
            .values()
            .par_iter()
            .filter_map(|&monthly_bill| {
                let inputs = TariffInputs {
                    monthly_bill,
                    ..template.clone()
                };
                self.engine.calculate(&inputs).ok()
            })
            .map(|result| SweepPoint::from_result(&result))
            .collect()
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    pub fn assumptions(&self) -> &Assumptions {
        self.engine.assumptions()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
