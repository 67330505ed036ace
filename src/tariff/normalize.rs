//! Normalization of raw form values into `TariffInputs`
//!
//! Form fields arrive as text typed by the user ("1 234,50", "5", "tak").
//! Unparsable numbers fall back to zero; the record as a whole is rejected
//! only when the bill or the unit price is unusable.

use log::warn;
use serde::{Deserialize, Serialize};

use super::data::TariffInputs;
use crate::error::CalculatorError;

/// State of a toggle field: a checkbox or a text value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToggleInput {
    Checked(bool),
    Text(String),
}

impl ToggleInput {
    pub fn is_on(&self) -> bool {
        match self {
            ToggleInput::Checked(checked) => *checked,
            ToggleInput::Text(text) => parse_toggle(text),
        }
    }
}

/// Unparsed values of the calculator form; absent fields are `None`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTariffInputs {
    pub monthly_bill: Option<String>,
    pub annual_demand_kwh: Option<String>,
    pub active_energy_price: Option<String>,
    pub distribution_price: Option<String>,
    pub resale_price: Option<String>,
    pub fixed_monthly_charge: Option<String>,
    pub annual_price_growth_rate: Option<String>,
    pub dynamic_pricing: Option<ToggleInput>,
}

/// Parse a user-typed number
///
/// Whitespace (thousands separators) is dropped and `,` is read as the
/// decimal separator. Trailing text after a leading number ("500 zł") is
/// ignored. Returns `None` when no finite number can be read.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if let Ok(value) = cleaned.parse::<f64>() {
        return value.is_finite().then_some(value);
    }

    let prefix = numeric_prefix(&cleaned);
    if !prefix.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Longest leading `[+-]digits[.digits]` run
fn numeric_prefix(text: &str) -> &str {
    let mut seen_dot = false;
    let mut end = 0;
    for (idx, c) in text.char_indices() {
        let accepted = match c {
            '+' | '-' => idx == 0,
            '.' if !seen_dot => {
                seen_dot = true;
                true
            }
            '0'..='9' => true,
            _ => false,
        };
        if !accepted {
            break;
        }
        end = idx + c.len_utf8();
    }
    &text[..end]
}

/// Parse a text toggle value; anything unrecognised is off
pub fn parse_toggle(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "tak" | "on"
    )
}

/// Interpret a growth rate typed as a percentage (`5`) or a fraction (`0.05`)
pub fn normalize_growth_rate(value: f64) -> f64 {
    if value > 1.0 {
        value / 100.0
    } else {
        value
    }
}

fn number_or_zero(raw: &Option<String>) -> f64 {
    raw.as_deref().and_then(parse_number).unwrap_or(0.0)
}

/// Build validated `TariffInputs` from raw form values
pub fn normalize(raw: &RawTariffInputs) -> Result<TariffInputs, CalculatorError> {
    let inputs = TariffInputs {
        monthly_bill: number_or_zero(&raw.monthly_bill),
        annual_demand_kwh: raw
            .annual_demand_kwh
            .as_deref()
            .and_then(parse_number)
            .filter(|demand| *demand > 0.0),
        active_energy_price: number_or_zero(&raw.active_energy_price),
        distribution_price: number_or_zero(&raw.distribution_price),
        resale_price: number_or_zero(&raw.resale_price),
        fixed_monthly_charge: number_or_zero(&raw.fixed_monthly_charge),
        annual_price_growth_rate: normalize_growth_rate(number_or_zero(
            &raw.annual_price_growth_rate,
        )),
        dynamic_pricing_enabled: raw.dynamic_pricing.as_ref().is_some_and(ToggleInput::is_on),
    };

    if let Err(err) = inputs.validate() {
        warn!("rejecting calculator input: {}", err);
        return Err(err);
    }
    Ok(inputs)
}
