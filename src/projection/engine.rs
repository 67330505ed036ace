//! Core engine: installation sizing and the year-by-year savings projection

use log::debug;

use super::cashflows::{Installation, RegimeSummary, SizingResult, YearProjection};
use super::irr::investment_irr;
use super::state::ProjectionState;
use crate::assumptions::Assumptions;
use crate::error::CalculatorError;
use crate::tariff::{PricingRegime, TariffInputs};

/// Round `value` to the nearest multiple of `multiple`, halves away from zero
pub fn round_to_multiple(value: f64, multiple: f64) -> f64 {
    if multiple == 0.0 {
        return value;
    }
    (value / multiple).round() * multiple
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: Assumptions,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions
    pub fn new(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Size the installation, project every year and summarize both regimes
    pub fn calculate(&self, inputs: &TariffInputs) -> Result<SizingResult, CalculatorError> {
        inputs.validate()?;

        let installation = self.size_installation(inputs);
        let years = self.project_years(inputs, &installation);
        if let Some(row) = years.iter().find(|row| !row.is_finite()) {
            return Err(CalculatorError::invalid(format!(
                "figures overflow in year {} of the projection",
                row.year
            )));
        }

        let summarize = |regime: PricingRegime| {
            let irr = investment_irr(
                installation.net_cost,
                years.iter().map(|row| row.savings(regime)),
            );
            RegimeSummary::from_years(regime, &years, irr)
        };
        let standard = summarize(PricingRegime::Standard);
        let dynamic = summarize(PricingRegime::Dynamic);

        debug!(
            "{:.2} kW for {:.0} kWh/yr, payback {:?} (standard) / {:?} (dynamic)",
            installation.pv_power_kw,
            installation.yearly_demand_kwh,
            standard.payback_year,
            dynamic.payback_year
        );

        Ok(SizingResult {
            inputs: inputs.clone(),
            installation,
            years,
            standard,
            dynamic,
        })
    }

    /// Yearly consumption: the supplied demand, else what the bill buys at the unit price
    pub fn yearly_demand(&self, inputs: &TariffInputs) -> f64 {
        match inputs.annual_demand_kwh {
            Some(demand) => demand,
            None => {
                let variable_bill = inputs.monthly_bill - inputs.fixed_monthly_charge;
                (variable_bill / inputs.unit_price() * 12.0).max(0.0)
            }
        }
    }

    /// Recommended power for a yearly demand (kW)
    pub fn recommended_power(&self, yearly_demand_kwh: f64) -> (f64, f64) {
        let c = &self.assumptions.coefficients;
        let base_power_kw = yearly_demand_kwh * c.power_selection_coefficient / 1000.0;
        let pv_power_kw = round_to_multiple(base_power_kw, c.power_step_kw).max(c.min_pv_power_kw);
        (base_power_kw, pv_power_kw)
    }

    /// Pick the installation size, package and net cost
    pub fn size_installation(&self, inputs: &TariffInputs) -> Installation {
        let c = &self.assumptions.coefficients;

        let yearly_demand_kwh = self.yearly_demand(inputs);
        let (base_power_kw, pv_power_kw) = self.recommended_power(yearly_demand_kwh);

        let package = self.assumptions.catalog.lookup(pv_power_kw);
        let installation_cost = package.row.cost;
        let cost_after_grant = (installation_cost - c.grant_amount).max(0.0);
        let net_cost = cost_after_grant * (1.0 - c.tax_relief_rate);

        let base_production_kwh =
            pv_power_kw * 1000.0 * c.system_loss_factor * c.production_coefficient;

        debug!(
            "demand {:.1} kWh -> base {:.3} kW -> {:.3} kW, package {:.2} kW at {:.2}",
            yearly_demand_kwh, base_power_kw, pv_power_kw, package.row.size_kw, installation_cost
        );

        Installation {
            yearly_demand_kwh,
            base_power_kw,
            pv_power_kw,
            package_size_kw: package.row.size_kw,
            battery_kwh: package.row.battery_kwh,
            recommended_storage_kwh: self
                .assumptions
                .storage
                .nearest(pv_power_kw)
                .map(|option| option.storage_kwh),
            clamped_to_catalog: package.clamped,
            installation_cost,
            cost_after_grant,
            net_cost,
            base_production_kwh,
        }
    }

    /// Run the projection over the simulation horizon, one row per year in order
    pub fn project_years(&self, inputs: &TariffInputs, installation: &Installation) -> Vec<YearProjection> {
        let horizon = self.assumptions.coefficients.simulation_years;
        let mut state = ProjectionState::from_net_cost(installation.net_cost);
        let mut years = Vec::with_capacity(horizon as usize);

        for _year in 1..=horizon {
            state.advance_year();
            let row = self.calculate_year(inputs, installation, &mut state);
            state.carry_over(&row);
            years.push(row);
        }

        years
    }

    /// Calculate production, billing and savings for the state's current year
    fn calculate_year(
        &self,
        inputs: &TariffInputs,
        installation: &Installation,
        state: &mut ProjectionState,
    ) -> YearProjection {
        let c = &self.assumptions.coefficients;
        let year = state.year;

        // Year one uses base prices
        let growth = (1.0 + inputs.annual_price_growth_rate).powi(year as i32 - 1);
        let monthly_bill = inputs.monthly_bill * growth;
        let yearly_bill = monthly_bill * 12.0;
        let active_price = inputs.active_energy_price * growth;
        let distribution_price = inputs.distribution_price * growth;
        let resale_price = inputs.resale_price * growth;
        let dynamic_discount_per_kwh = active_price * c.dynamic_discount_rate;

        let degradation = if year == 1 {
            1.0
        } else {
            (1.0 - c.degradation_rate * year as f64).max(0.0)
        };
        let production_kwh = installation.base_production_kwh * degradation;
        let self_consumed_kwh = production_kwh * c.self_consumption_rate;
        let exported_kwh = (production_kwh - self_consumed_kwh).max(0.0);
        let imported_kwh =
            state.imported(installation.yearly_demand_kwh, self_consumed_kwh, exported_kwh);

        let savings_without_dynamic = self_consumed_kwh * (active_price + distribution_price)
            + exported_kwh * resale_price;
        let savings_with_dynamic = savings_without_dynamic + imported_kwh * dynamic_discount_per_kwh;

        state.accumulate(savings_without_dynamic, savings_with_dynamic);

        YearProjection {
            year,
            monthly_bill,
            yearly_bill,
            production_kwh,
            self_consumed_kwh,
            exported_kwh,
            imported_kwh,
            active_price,
            distribution_price,
            resale_price,
            dynamic_discount_per_kwh,
            savings_without_dynamic,
            savings_with_dynamic,
            cumulative_without_dynamic: state.cumulative_without_dynamic,
            cumulative_with_dynamic: state.cumulative_with_dynamic,
            pv_bill_without_dynamic: yearly_bill - savings_without_dynamic,
            pv_bill_with_dynamic: yearly_bill - savings_with_dynamic,
        }
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new(Assumptions::default_pricing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_inputs() -> TariffInputs {
        TariffInputs {
            monthly_bill: 500.0,
            annual_demand_kwh: None,
            active_energy_price: 0.62,
            distribution_price: 0.48,
            resale_price: 0.20,
            fixed_monthly_charge: 20.0,
            annual_price_growth_rate: 0.05,
            dynamic_pricing_enabled: false,
        }
    }

    #[test]
    fn test_round_to_multiple() {
        assert_relative_eq!(round_to_multiple(4.71, 0.45), 4.5);
        assert_relative_eq!(round_to_multiple(4.95, 0.45), 4.95);
        // Halves round away from zero
        assert_eq!(round_to_multiple(2.5, 1.0), 3.0);
        assert_eq!(round_to_multiple(-2.5, 1.0), -3.0);
        assert_eq!(round_to_multiple(3.0, 0.0), 3.0);
    }

    #[test]
    fn test_derived_demand_and_size() {
        let engine = ProjectionEngine::default();
        let installation = engine.size_installation(&test_inputs());

        assert_relative_eq!(installation.yearly_demand_kwh, 480.0 / 1.1 * 12.0, max_relative = 1e-12);
        assert_relative_eq!(installation.base_power_kw, 4.712727, epsilon = 1e-6);
        assert_relative_eq!(installation.pv_power_kw, 4.5, epsilon = 1e-9);
        assert_eq!(installation.package_size_kw, 4.5);
        assert_eq!(installation.installation_cost, 52_230.0);
        assert_eq!(installation.battery_kwh, 9.2);
        assert_eq!(installation.recommended_storage_kwh, Some(6.1));
        assert_relative_eq!(installation.cost_after_grant, 29_230.0);
        assert_relative_eq!(installation.net_cost, 19_876.4, epsilon = 1e-6);
        assert_relative_eq!(installation.base_production_kwh, 4544.1, epsilon = 1e-6);
    }

    #[test]
    fn test_minimum_size_applies() {
        let engine = ProjectionEngine::default();
        let inputs = TariffInputs {
            annual_demand_kwh: Some(500.0),
            ..test_inputs()
        };
        let installation = engine.size_installation(&inputs);
        assert_eq!(installation.pv_power_kw, 2.7);
        assert_eq!(installation.installation_cost, 42_990.0);
        assert_eq!(installation.battery_kwh, 5.8);
    }

    #[test]
    fn test_bill_below_fixed_charge_has_no_demand() {
        let engine = ProjectionEngine::default();
        let inputs = TariffInputs {
            monthly_bill: 10.0,
            ..test_inputs()
        };
        assert_eq!(engine.yearly_demand(&inputs), 0.0);
        assert_eq!(engine.size_installation(&inputs).pv_power_kw, 2.7);
    }

    #[test]
    fn test_first_year_row() {
        let engine = ProjectionEngine::default();
        let result = engine.calculate(&test_inputs()).unwrap();
        let first = &result.years[0];

        assert_eq!(first.year, 1);
        assert_relative_eq!(first.production_kwh, 4544.1, epsilon = 1e-6);
        assert_relative_eq!(first.self_consumed_kwh, 3180.87, epsilon = 1e-6);
        assert_relative_eq!(first.exported_kwh, 1363.23, epsilon = 1e-6);
        assert_relative_eq!(first.active_price, 0.62);
        assert_relative_eq!(first.yearly_bill, 6000.0);
        assert_relative_eq!(first.savings_without_dynamic, 3771.603, epsilon = 1e-6);
        assert_relative_eq!(
            first.cumulative_without_dynamic,
            -19_876.4 + 3771.603,
            epsilon = 1e-6
        );
        assert_relative_eq!(first.pv_bill_without_dynamic, 6000.0 - 3771.603, epsilon = 1e-6);
    }

    #[test]
    fn test_prices_compound_from_year_two() {
        let engine = ProjectionEngine::default();
        let result = engine.calculate(&test_inputs()).unwrap();
        assert_relative_eq!(result.years[1].active_price, 0.62 * 1.05, epsilon = 1e-12);
        assert_relative_eq!(result.years[2].monthly_bill, 500.0 * 1.05 * 1.05, epsilon = 1e-9);
    }

    #[test]
    fn test_degradation_from_year_two() {
        let engine = ProjectionEngine::default();
        let result = engine.calculate(&test_inputs()).unwrap();
        let base = result.installation.base_production_kwh;
        assert_relative_eq!(result.years[1].production_kwh, base * (1.0 - 0.004 * 2.0), epsilon = 1e-9);
        assert_relative_eq!(result.years[24].production_kwh, base * (1.0 - 0.004 * 25.0), epsilon = 1e-9);
    }

    #[test]
    fn test_payback_year() {
        let engine = ProjectionEngine::default();
        let result = engine.calculate(&test_inputs()).unwrap();
        assert_eq!(result.standard.payback_year, Some(5));
        assert_eq!(result.dynamic.payback_year, Some(5));
        assert!(result.years[3].cumulative_without_dynamic < 0.0);
        assert!(result.years[4].cumulative_without_dynamic >= 0.0);
        assert!(result.standard.irr.unwrap() > 0.0);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let engine = ProjectionEngine::default();
        let inputs = TariffInputs {
            monthly_bill: 0.0,
            ..test_inputs()
        };
        assert!(matches!(
            engine.calculate(&inputs),
            Err(CalculatorError::MissingOrInvalidInput { .. })
        ));
    }

    #[test]
    fn test_overflowing_inputs_rejected() {
        let engine = ProjectionEngine::default();
        for inputs in [
            TariffInputs { monthly_bill: 1e308, ..test_inputs() },
            TariffInputs { annual_price_growth_rate: 1e20, ..test_inputs() },
            TariffInputs { annual_demand_kwh: Some(1e308), ..test_inputs() },
        ] {
            assert!(matches!(
                engine.calculate(&inputs),
                Err(CalculatorError::MissingOrInvalidInput { .. })
            ));
        }
    }
}
