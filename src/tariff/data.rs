//! Household tariff and usage inputs

use serde::{Deserialize, Serialize};

use crate::error::CalculatorError;

/// Pricing regime whose figures are surfaced as the headline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingRegime {
    /// Flat tariff: savings from self-consumption and export only
    Standard,
    /// Dynamic tariff: adds a discount on energy still imported from the grid
    Dynamic,
}

impl PricingRegime {
    pub fn from_enabled(dynamic_pricing_enabled: bool) -> Self {
        if dynamic_pricing_enabled {
            PricingRegime::Dynamic
        } else {
            PricingRegime::Standard
        }
    }
}

/// Normalized inputs of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffInputs {
    /// Current average monthly electricity bill
    pub monthly_bill: f64,

    /// Known yearly consumption (kWh); derived from the bill when absent
    pub annual_demand_kwh: Option<f64>,

    /// Energy price per kWh
    pub active_energy_price: f64,

    /// Distribution price per kWh
    pub distribution_price: f64,

    /// Price received per exported kWh
    pub resale_price: f64,

    /// Bill component independent of consumption
    pub fixed_monthly_charge: f64,

    /// Yearly tariff inflation as a fraction (0.05 = 5%)
    pub annual_price_growth_rate: f64,

    pub dynamic_pricing_enabled: bool,
}

impl TariffInputs {
    /// Combined per-kWh price of grid energy
    pub fn unit_price(&self) -> f64 {
        self.active_energy_price + self.distribution_price
    }

    pub fn regime(&self) -> PricingRegime {
        PricingRegime::from_enabled(self.dynamic_pricing_enabled)
    }

    /// Check the inputs can be projected without producing NaN or infinite figures
    pub fn validate(&self) -> Result<(), CalculatorError> {
        if !self.monthly_bill.is_finite() || self.monthly_bill <= 0.0 {
            return Err(CalculatorError::invalid("monthly bill must be positive"));
        }
        if !self.unit_price().is_finite() || self.unit_price() <= 0.0 {
            return Err(CalculatorError::invalid(
                "active energy price plus distribution price must be positive",
            ));
        }

        let rates = [
            ("resale price", self.resale_price),
            ("fixed monthly charge", self.fixed_monthly_charge),
            ("annual price growth rate", self.annual_price_growth_rate),
        ];
        if let Some((name, _)) = rates.iter().find(|(_, value)| !value.is_finite()) {
            return Err(CalculatorError::invalid(format!("{} is not a number", name)));
        }

        if !(self.monthly_bill * 12.0).is_finite() {
            return Err(CalculatorError::invalid("yearly bill is out of range"));
        }

        match self.annual_demand_kwh {
            Some(demand) if !demand.is_finite() || demand < 0.0 => {
                Err(CalculatorError::invalid("annual demand must be non-negative"))
            }
            Some(_) => Ok(()),
            None => {
                let derived =
                    (self.monthly_bill - self.fixed_monthly_charge) / self.unit_price() * 12.0;
                if derived.is_finite() {
                    Ok(())
                } else {
                    Err(CalculatorError::invalid("yearly demand derived from the bill is out of range"))
                }
            }
        }
    }
}
