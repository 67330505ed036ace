//! Output structures for sizing and projections

use serde::{Deserialize, Serialize};

use crate::tariff::{PricingRegime, TariffInputs};

/// The recommended installation and its cost after subsidies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    /// Yearly consumption the installation is sized for (kWh)
    pub yearly_demand_kwh: f64,

    /// Power covering the demand before rounding (kW)
    pub base_power_kw: f64,

    /// Recommended power, rounded to the step and at least the minimum (kW)
    pub pv_power_kw: f64,

    /// Size of the catalog package used for pricing (kW)
    pub package_size_kw: f64,

    /// Battery bundled with the catalog package (kWh)
    pub battery_kwh: f64,

    /// Storage product whose matching PV size is nearest to `pv_power_kw`
    pub recommended_storage_kwh: Option<f64>,

    /// `pv_power_kw` exceeded the catalog and the largest package was priced
    pub clamped_to_catalog: bool,

    pub installation_cost: f64,
    pub cost_after_grant: f64,

    /// Cost after grant and tax relief
    pub net_cost: f64,

    /// First-year production before degradation (kWh)
    pub base_production_kwh: f64,
}

/// A single row of projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    pub year: u32,

    // Bill without the installation, inflated
    pub monthly_bill: f64,
    pub yearly_bill: f64,

    // Energy (kWh)
    pub production_kwh: f64,
    pub self_consumed_kwh: f64,
    pub exported_kwh: f64,
    pub imported_kwh: f64,

    // Unit prices, inflated
    pub active_price: f64,
    pub distribution_price: f64,
    pub resale_price: f64,
    pub dynamic_discount_per_kwh: f64,

    // Savings per regime
    pub savings_without_dynamic: f64,
    pub savings_with_dynamic: f64,

    // Cumulative net cash position per regime
    pub cumulative_without_dynamic: f64,
    pub cumulative_with_dynamic: f64,

    // Bill with the installation per regime
    pub pv_bill_without_dynamic: f64,
    pub pv_bill_with_dynamic: f64,
}

impl YearProjection {
    pub fn savings(&self, regime: PricingRegime) -> f64 {
        match regime {
            PricingRegime::Standard => self.savings_without_dynamic,
            PricingRegime::Dynamic => self.savings_with_dynamic,
        }
    }

    pub fn cumulative(&self, regime: PricingRegime) -> f64 {
        match regime {
            PricingRegime::Standard => self.cumulative_without_dynamic,
            PricingRegime::Dynamic => self.cumulative_with_dynamic,
        }
    }

    pub fn pv_bill(&self, regime: PricingRegime) -> f64 {
        match regime {
            PricingRegime::Standard => self.pv_bill_without_dynamic,
            PricingRegime::Dynamic => self.pv_bill_with_dynamic,
        }
    }

    /// No figure of the row overflowed or became NaN
    pub fn is_finite(&self) -> bool {
        [
            self.monthly_bill,
            self.yearly_bill,
            self.production_kwh,
            self.self_consumed_kwh,
            self.exported_kwh,
            self.imported_kwh,
            self.active_price,
            self.distribution_price,
            self.resale_price,
            self.dynamic_discount_per_kwh,
            self.savings_without_dynamic,
            self.savings_with_dynamic,
            self.cumulative_without_dynamic,
            self.cumulative_with_dynamic,
            self.pv_bill_without_dynamic,
            self.pv_bill_with_dynamic,
        ]
        .iter()
        .all(|value| value.is_finite())
    }
}

/// Summary figures of one pricing regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeSummary {
    pub regime: PricingRegime,
    pub first_year_savings: f64,
    pub first_year_pv_bill: f64,

    /// First year with a non-negative cumulative position; `None` if not within the horizon
    pub payback_year: Option<u32>,

    pub total_savings: f64,
    pub final_cumulative: f64,

    /// Annual internal rate of return of the investment
    pub irr: Option<f64>,
}

impl RegimeSummary {
    pub fn from_years(regime: PricingRegime, years: &[YearProjection], irr: Option<f64>) -> Self {
        let first = years.first();
        Self {
            regime,
            first_year_savings: first.map(|r| r.savings(regime)).unwrap_or(0.0),
            first_year_pv_bill: first.map(|r| r.pv_bill(regime)).unwrap_or(0.0),
            payback_year: years
                .iter()
                .find(|r| r.cumulative(regime) >= 0.0)
                .map(|r| r.year),
            total_savings: years.iter().map(|r| r.savings(regime)).sum(),
            final_cumulative: years.last().map(|r| r.cumulative(regime)).unwrap_or(0.0),
            irr,
        }
    }
}

/// Complete result of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    pub inputs: TariffInputs,
    pub installation: Installation,

    /// One row per simulated year, in order
    pub years: Vec<YearProjection>,

    pub standard: RegimeSummary,
    pub dynamic: RegimeSummary,
}

impl SizingResult {
    pub fn regime(&self, regime: PricingRegime) -> &RegimeSummary {
        match regime {
            PricingRegime::Standard => &self.standard,
            PricingRegime::Dynamic => &self.dynamic,
        }
    }

    pub fn first_year(&self) -> Option<&YearProjection> {
        self.years.first()
    }

    /// Bill without the installation in year one
    pub fn baseline_yearly_bill(&self) -> f64 {
        self.inputs.monthly_bill * 12.0
    }
}
