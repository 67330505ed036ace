//! Household tariff inputs, form normalization and the bill slider range

mod data;
mod normalize;
mod bill_range;

pub use data::{PricingRegime, TariffInputs};
pub use normalize::{
    normalize, normalize_growth_rate, parse_number, parse_toggle, RawTariffInputs, ToggleInput,
};
pub use bill_range::BillRange;
