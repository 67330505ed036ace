//! Regime-specific figures picked from a finished projection
//!
//! Nothing here re-runs the simulation; every figure is read from the
//! `SizingResult` so a UI can switch regimes without recomputing.

use serde::{Deserialize, Serialize};

use super::cashflows::SizingResult;
use crate::tariff::PricingRegime;

/// Figures shown next to the calculator form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub regime: PricingRegime,
    pub pv_power_kw: f64,
    pub recommended_storage_kwh: Option<f64>,

    /// Current bill over a year, before any installation
    pub baseline_yearly_bill: f64,

    /// First-year bill with the installation
    pub yearly_bill: f64,
    pub monthly_bill: f64,

    /// `baseline_yearly_bill - yearly_bill`
    pub savings: f64,

    /// Payback of the dynamic-tariff cash position, whichever regime is shown.
    /// Per-regime paybacks stay on `SizingResult::standard` and `dynamic`.
    pub payback_year: Option<u32>,
}

/// Bars of the "bill now vs bill with installation" chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillComparison {
    pub current_yearly_bill: f64,
    pub yearly_bill_with_installation: f64,
}

/// One point of a multi-year bill chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillTrendPoint {
    pub year: u32,
    pub bill_without_installation: f64,
    pub bill_with_installation: f64,
    pub cumulative: f64,
}

/// Headline figures for `regime`
pub fn headline(result: &SizingResult, regime: PricingRegime) -> Headline {
    let baseline_yearly_bill = result.baseline_yearly_bill();
    let yearly_bill = result
        .first_year()
        .map(|row| row.pv_bill(regime))
        .unwrap_or(baseline_yearly_bill);

    Headline {
        regime,
        pv_power_kw: result.installation.pv_power_kw,
        recommended_storage_kwh: result.installation.recommended_storage_kwh,
        baseline_yearly_bill,
        yearly_bill,
        monthly_bill: yearly_bill / 12.0,
        savings: baseline_yearly_bill - yearly_bill,
        payback_year: result.dynamic.payback_year,
    }
}

/// Headline figures for the regime the inputs asked for
pub fn selected_headline(result: &SizingResult) -> Headline {
    headline(result, result.inputs.regime())
}

pub fn bill_comparison(result: &SizingResult, regime: PricingRegime) -> BillComparison {
    let current_yearly_bill = result.baseline_yearly_bill();
    BillComparison {
        current_yearly_bill,
        yearly_bill_with_installation: result
            .first_year()
            .map(|row| row.pv_bill(regime))
            .unwrap_or(current_yearly_bill),
    }
}

/// Yearly bills and cash position over the whole horizon
pub fn bill_trend(result: &SizingResult, regime: PricingRegime) -> Vec<BillTrendPoint> {
    result
        .years
        .iter()
        .map(|row| BillTrendPoint {
            year: row.year,
            bill_without_installation: row.yearly_bill,
            bill_with_installation: row.pv_bill(regime),
            cumulative: row.cumulative(regime),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionEngine;
    use crate::tariff::TariffInputs;
    use approx::assert_relative_eq;

    fn result(dynamic: bool) -> SizingResult {
        result_for_bill(500.0, dynamic)
    }

    fn result_for_bill(monthly_bill: f64, dynamic: bool) -> SizingResult {
        let inputs = TariffInputs {
            monthly_bill,
            annual_demand_kwh: None,
            active_energy_price: 0.62,
            distribution_price: 0.48,
            resale_price: 0.20,
            fixed_monthly_charge: 20.0,
            annual_price_growth_rate: 0.05,
            dynamic_pricing_enabled: dynamic,
        };
        ProjectionEngine::default().calculate(&inputs).unwrap()
    }

    #[test]
    fn test_headline_follows_inputs() {
        let standard = selected_headline(&result(false));
        let dynamic = selected_headline(&result(true));

        assert_eq!(standard.regime, PricingRegime::Standard);
        assert_eq!(dynamic.regime, PricingRegime::Dynamic);
        assert_relative_eq!(standard.baseline_yearly_bill, 6000.0);
        assert_relative_eq!(standard.savings, 3771.603, epsilon = 1e-6);
        assert!(dynamic.savings > standard.savings);
        assert_relative_eq!(standard.monthly_bill * 12.0, standard.yearly_bill, epsilon = 1e-9);
    }

    #[test]
    fn test_switching_regime_needs_no_recompute() {
        let computed = result(false);
        let dynamic = headline(&computed, PricingRegime::Dynamic);
        assert_eq!(dynamic, selected_headline(&result(true)));
    }

    #[test]
    fn test_bill_comparison_and_trend() {
        let computed = result(true);
        let bars = bill_comparison(&computed, PricingRegime::Dynamic);
        assert_relative_eq!(bars.current_yearly_bill, 6000.0);
        assert_relative_eq!(
            bars.yearly_bill_with_installation,
            computed.years[0].pv_bill_with_dynamic
        );

        let trend = bill_trend(&computed, PricingRegime::Dynamic);
        assert_eq!(trend.len(), computed.years.len());
        assert_eq!(trend[24].year, 25);
        assert!(trend[24].bill_without_installation > trend[0].bill_without_installation);
    }

    #[test]
    fn test_headline_payback_reads_dynamic_column() {
        let computed = result_for_bill(400.0, false);
        assert_eq!(computed.standard.payback_year, Some(6));
        assert_eq!(computed.dynamic.payback_year, Some(5));

        let standard = selected_headline(&computed);
        assert_eq!(standard.regime, PricingRegime::Standard);
        assert_eq!(standard.payback_year, Some(5));
        assert_eq!(headline(&computed, PricingRegime::Dynamic).payback_year, Some(5));
    }
}
