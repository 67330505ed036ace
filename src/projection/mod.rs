//! Installation sizing and the 25-year savings projection

mod state;
mod engine;
mod cashflows;
mod irr;
pub mod selection;

pub use state::ProjectionState;
pub use engine::{round_to_multiple, ProjectionEngine};
pub use cashflows::{Installation, RegimeSummary, SizingResult, YearProjection};
pub use irr::{calculate_irr, investment_irr};
pub use selection::{bill_comparison, bill_trend, headline, selected_headline, Headline};
