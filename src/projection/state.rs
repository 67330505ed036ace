//! Carry-over state between simulated years

use super::cashflows::YearProjection;

/// Values a year needs from the one before it
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Current year (1-indexed; 0 before the first year)
    pub year: u32,

    /// Prior year's export (kWh)
    pub previous_exported: f64,

    /// Prior year's grid import (kWh)
    pub previous_imported: f64,

    /// Running cash position, standard tariff
    pub cumulative_without_dynamic: f64,

    /// Running cash position, dynamic tariff
    pub cumulative_with_dynamic: f64,
}

impl ProjectionState {
    /// Initialize state at installation: both positions start at minus the net cost
    pub fn from_net_cost(net_cost: f64) -> Self {
        Self {
            year: 0,
            previous_exported: 0.0,
            previous_imported: 0.0,
            cumulative_without_dynamic: -net_cost,
            cumulative_with_dynamic: -net_cost,
        }
    }

    pub fn advance_year(&mut self) {
        self.year += 1;
    }

    /// Grid import for the current year
    ///
    /// Year one imports whatever self-consumption leaves uncovered. Later years
    /// shift the previous import by the change in export.
    pub fn imported(&self, yearly_demand_kwh: f64, self_consumed_kwh: f64, exported_kwh: f64) -> f64 {
        let imported = if self.year <= 1 {
            yearly_demand_kwh - self_consumed_kwh
        } else {
            self.previous_imported + (self.previous_exported - exported_kwh)
        };
        imported.max(0.0)
    }

    /// Add this year's savings to the running positions
    pub fn accumulate(&mut self, savings_without_dynamic: f64, savings_with_dynamic: f64) {
        self.cumulative_without_dynamic += savings_without_dynamic;
        self.cumulative_with_dynamic += savings_with_dynamic;
    }

    /// Remember the finished year's energy flows for the next year
    pub fn carry_over(&mut self, row: &YearProjection) {
        self.previous_exported = row.exported_kwh;
        self.previous_imported = row.imported_kwh;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_year_import_from_demand() {
        let mut state = ProjectionState::from_net_cost(1000.0);
        state.advance_year();
        assert_eq!(state.imported(5000.0, 3000.0, 1200.0), 2000.0);
        assert_eq!(state.imported(1000.0, 3000.0, 1200.0), 0.0);
    }

    #[test]
    fn test_later_import_shifts_with_export() {
        let mut state = ProjectionState::from_net_cost(1000.0);
        state.year = 2;
        state.previous_imported = 2000.0;
        state.previous_exported = 1200.0;
        assert_eq!(state.imported(5000.0, 2990.0, 1190.0), 2010.0);
    }

    #[test]
    fn test_accumulate_from_net_cost() {
        let mut state = ProjectionState::from_net_cost(1000.0);
        state.accumulate(400.0, 500.0);
        state.accumulate(400.0, 500.0);
        assert_eq!(state.cumulative_without_dynamic, -200.0);
        assert_eq!(state.cumulative_with_dynamic, 0.0);
    }
}
