//! Physical and financial coefficients used by sizing and projection

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Fixed coefficients of the calculator
///
/// Every field can be overridden from `coefficients.json`; missing fields keep
/// the default pricing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coefficients {
    /// Share of yearly demand (kWh) to cover, per kW of installed power
    pub power_selection_coefficient: f64,

    /// Yearly production per installed watt
    pub production_coefficient: f64,

    /// Inverter and wiring losses
    pub system_loss_factor: f64,

    /// Fraction of production consumed on-site
    pub self_consumption_rate: f64,

    /// Yearly fractional loss of module output
    pub degradation_rate: f64,

    /// Installation sizes are multiples of this step (kW)
    pub power_step_kw: f64,

    /// Smallest installation offered (kW)
    pub min_pv_power_kw: f64,

    /// Number of simulated years
    pub simulation_years: u32,

    /// Government grant deducted from the installation cost
    pub grant_amount: f64,

    /// Tax relief applied to the cost after grant
    pub tax_relief_rate: f64,

    /// Discount on the active energy price under dynamic pricing
    pub dynamic_discount_rate: f64,
}

impl Coefficients {
    /// Coefficients of the published calculator
    pub fn default_pricing() -> Self {
        Self {
            power_selection_coefficient: 0.9,
            production_coefficient: 1.02,
            system_loss_factor: 0.99,
            self_consumption_rate: 0.7,
            degradation_rate: 0.004,
            power_step_kw: 0.45,
            min_pv_power_kw: 2.7,
            simulation_years: 25,
            grant_amount: 23_000.0,
            tax_relief_rate: 0.32,
            dynamic_discount_rate: 0.24,
        }
    }

    /// Reject coefficient sets the engine cannot run with
    pub fn validate(&self) -> Result<(), LoadError> {
        let non_negative = |value: f64| value >= 0.0;
        let fraction = |value: f64| (0.0..=1.0).contains(&value);

        let checks: [(&'static str, f64, bool); 11] = [
            (
                "power_selection_coefficient",
                self.power_selection_coefficient,
                non_negative(self.power_selection_coefficient),
            ),
            (
                "production_coefficient",
                self.production_coefficient,
                non_negative(self.production_coefficient),
            ),
            (
                "system_loss_factor",
                self.system_loss_factor,
                non_negative(self.system_loss_factor),
            ),
            (
                "self_consumption_rate",
                self.self_consumption_rate,
                fraction(self.self_consumption_rate),
            ),
            ("degradation_rate", self.degradation_rate, non_negative(self.degradation_rate)),
            ("power_step_kw", self.power_step_kw, self.power_step_kw > 0.0),
            ("min_pv_power_kw", self.min_pv_power_kw, non_negative(self.min_pv_power_kw)),
            (
                "simulation_years",
                self.simulation_years as f64,
                self.simulation_years > 0,
            ),
            ("grant_amount", self.grant_amount, non_negative(self.grant_amount)),
            ("tax_relief_rate", self.tax_relief_rate, fraction(self.tax_relief_rate)),
            (
                "dynamic_discount_rate",
                self.dynamic_discount_rate,
                fraction(self.dynamic_discount_rate),
            ),
        ];

        for (name, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(LoadError::InvalidCoefficient { name, value });
            }
        }
        Ok(())
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::default_pricing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pricing_is_valid() {
        let coefficients = Coefficients::default_pricing();
        assert!(coefficients.validate().is_ok());
        assert_eq!(coefficients.simulation_years, 25);
    }

    #[test]
    fn test_zero_step_rejected() {
        let coefficients = Coefficients {
            power_step_kw: 0.0,
            ..Default::default()
        };
        match coefficients.validate() {
            Err(LoadError::InvalidCoefficient { name, .. }) => assert_eq!(name, "power_step_kw"),
            other => panic!("expected invalid step, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_rates_rejected() {
        let cases = [
            ("degradation_rate", Coefficients { degradation_rate: -0.004, ..Default::default() }),
            (
                "production_coefficient",
                Coefficients { production_coefficient: -1.02, ..Default::default() },
            ),
            ("system_loss_factor", Coefficients { system_loss_factor: -0.99, ..Default::default() }),
            (
                "power_selection_coefficient",
                Coefficients { power_selection_coefficient: f64::NAN, ..Default::default() },
            ),
            (
                "dynamic_discount_rate",
                Coefficients { dynamic_discount_rate: -0.24, ..Default::default() },
            ),
        ];

        for (expected, coefficients) in cases {
            match coefficients.validate() {
                Err(LoadError::InvalidCoefficient { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected invalid {}, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let coefficients: Coefficients =
            serde_json::from_str(r#"{ "grant_amount": 16000, "simulation_years": 20 }"#).unwrap();
        assert_eq!(coefficients.grant_amount, 16_000.0);
        assert_eq!(coefficients.simulation_years, 20);
        assert_eq!(coefficients.power_step_kw, 0.45);
    }
}
