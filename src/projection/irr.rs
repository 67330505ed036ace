//! Internal Rate of Return (IRR) of the installation
//!
//! Year 0 carries the net installation cost, years 1..N the yearly savings.

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 10.0;

/// Calculate the annual IRR of a series of yearly cash flows
/// using the Newton-Raphson method, falling back to bisection.
///
/// # Arguments
/// * `cashflows` - Cash flows per year, starting at year 0 (positive = inflow)
///
/// # Returns
/// * `Option<f64>` - IRR as a decimal (0.05 for 5%), or None if no solution found
pub fn calculate_irr(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    if cashflows.iter().all(|&cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }

    // A root requires at least one sign change
    let has_positive = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_negative = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_positive || !has_negative {
        return None;
    }

    let mut rate = 0.05;
    for _ in 0..MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv.abs() < 1e-20 {
            return calculate_irr_bisection(cashflows);
        }

        let new_rate = (rate - npv / dnpv).clamp(MIN_RATE, MAX_RATE);
        if (new_rate - rate).abs() < TOLERANCE {
            return Some(new_rate);
        }
        rate = new_rate;
    }

    calculate_irr_bisection(cashflows)
}

/// IRR of paying `net_cost` up front and receiving `savings` in years 1..N
pub fn investment_irr(net_cost: f64, savings: impl IntoIterator<Item = f64>) -> Option<f64> {
    let cashflows: Vec<f64> = std::iter::once(-net_cost).chain(savings).collect();
    calculate_irr(&cashflows)
}

/// NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        npv += cf / (1.0 + rate).powi(t as i32);
        if t > 0 {
            dnpv -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (npv, dnpv)
}

fn calculate_irr_bisection(cashflows: &[f64]) -> Option<f64> {
    let mut low = MIN_RATE;
    let mut high = MAX_RATE;

    let npv_low = npv_at_rate(cashflows, low);
    let npv_high = npv_at_rate(cashflows, high);
    if npv_low * npv_high > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);

        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }

        if npv_mid * npv_at_rate(cashflows, low) < 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    None
}

fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}
