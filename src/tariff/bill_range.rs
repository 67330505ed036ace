//! Range of the monthly bill slider

use serde::{Deserialize, Serialize};

use crate::error::CalculatorError;

/// Step counts within this distance of a whole number are treated as whole
const STEP_TOLERANCE: f64 = 1e-9;

/// Largest number of steps a range may span
pub const MAX_STEPS: usize = 100_000;

/// Bounds and granularity of the bill slider (currency per month)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default_value: f64,
}

impl Default for BillRange {
    fn default() -> Self {
        Self {
            min: 100.0,
            max: 2000.0,
            step: 10.0,
            default_value: 500.0,
        }
    }
}

impl BillRange {
    /// Reject ranges whose grid cannot be enumerated
    pub fn validate(&self) -> Result<(), CalculatorError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.max < self.min {
            return Err(CalculatorError::invalid("bill range bounds must be finite and ascending"));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(CalculatorError::invalid("bill range step must be positive"));
        }
        if self.step_ratio() > MAX_STEPS as f64 {
            return Err(CalculatorError::invalid(format!(
                "bill range spans more than {} steps",
                MAX_STEPS
            )));
        }
        Ok(())
    }

    fn step_ratio(&self) -> f64 {
        (self.max - self.min) / self.step
    }

    fn steps(&self) -> usize {
        if self.step <= 0.0 || self.max <= self.min {
            return 0;
        }
        // NaN casts to 0, the cap keeps the cast from saturating
        (self.step_ratio() + STEP_TOLERANCE)
            .floor()
            .min(MAX_STEPS as f64) as usize
    }

    /// Grid value at `index`; the step that lands on `max` returns `max` exactly
    fn value_at(&self, index: usize) -> f64 {
        let upper = self.max.max(self.min);
        if (self.step_ratio() - index as f64).abs() <= STEP_TOLERANCE {
            return upper;
        }
        (self.min + index as f64 * self.step).min(upper)
    }

    /// Clamp into the range and snap to the nearest step above `min`
    pub fn clamp_and_snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default_value;
        }
        let clamped = value.clamp(self.min, self.max.max(self.min));
        if self.step <= 0.0 {
            return clamped;
        }
        let index = ((clamped - self.min) / self.step).round().min(self.steps() as f64);
        self.value_at(index as usize)
    }

    /// Position of `value` on the slider track, 0.0 at `min` and 1.0 at `max`
    pub fn progress(&self, value: f64) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Every value the slider can take, ascending
    pub fn values(&self) -> Vec<f64> {
        (0..=self.steps()).map(|idx| self.value_at(idx)).collect()
    }
}
