//! Host boundary: recalculation, subscribers and the last-result cache
//!
//! Widgets that depend on the calculator (result fields, chart, sliders)
//! subscribe here. Every recalculation notifies them synchronously, either
//! with the full result or with an explicit "no result" so they can clear.

use std::sync::Arc;

use log::debug;

use crate::error::CalculatorError;
use crate::projection::{selected_headline, Headline, SizingResult};
use crate::scenario::ScenarioRunner;
use crate::tariff::{RawTariffInputs, TariffInputs};

/// A successful calculation and its headline for the selected regime
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub result: SizingResult,
    pub headline: Headline,
}

/// What subscribers receive after each recalculation
#[derive(Debug, Clone, PartialEq)]
pub enum CalculatorUpdate {
    Computed(Arc<Calculation>),
    /// Input was missing or invalid; there is no result to show
    Cleared(CalculatorError),
}

impl CalculatorUpdate {
    pub fn calculation(&self) -> Option<&Calculation> {
        match self {
            CalculatorUpdate::Computed(calculation) => Some(calculation),
            CalculatorUpdate::Cleared(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&CalculatorUpdate)>;

/// Owns the runner, the subscriber list and the latest update
pub struct CalculatorHost {
    runner: ScenarioRunner,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
    latest: Option<CalculatorUpdate>,
}

impl CalculatorHost {
    pub fn new(runner: ScenarioRunner) -> Self {
        Self {
            runner,
            subscribers: Vec::new(),
            next_id: 0,
            latest: None,
        }
    }

    /// Register a subscriber; if a result already exists it is delivered immediately
    pub fn subscribe<F>(&mut self, mut subscriber: F) -> SubscriptionId
    where
        F: FnMut(&CalculatorUpdate) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        if let Some(latest) = &self.latest {
            subscriber(latest);
        }
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Normalize the form, recalculate and notify every subscriber
    pub fn recalculate(&mut self, raw: &RawTariffInputs) -> CalculatorUpdate {
        let outcome = self.runner.run_raw(raw);
        self.publish(outcome)
    }

    /// Recalculate from already normalized inputs
    pub fn recalculate_inputs(&mut self, inputs: &TariffInputs) -> CalculatorUpdate {
        let outcome = self.runner.run(inputs);
        self.publish(outcome)
    }

    fn publish(&mut self, outcome: Result<SizingResult, CalculatorError>) -> CalculatorUpdate {
        let update = match outcome {
            Ok(result) => {
                let headline = selected_headline(&result);
                CalculatorUpdate::Computed(Arc::new(Calculation { result, headline }))
            }
            Err(err) => CalculatorUpdate::Cleared(err),
        };

        debug!(
            "publishing {} to {} subscriber(s)",
            if update.calculation().is_some() { "result" } else { "cleared state" },
            self.subscribers.len()
        );
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&update);
        }
        self.latest = Some(update.clone());
        update
    }

    /// Last published update, for widgets created after it
    pub fn latest(&self) -> Option<&CalculatorUpdate> {
        self.latest.as_ref()
    }

    pub fn runner(&self) -> &ScenarioRunner {
        &self.runner
    }
}

impl Default for CalculatorHost {
    fn default() -> Self {
        Self::new(ScenarioRunner::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn form(bill: &str) -> RawTariffInputs {
        RawTariffInputs {
            monthly_bill: Some(bill.to_string()),
            active_energy_price: Some("0,62".to_string()),
            distribution_price: Some("0,48".to_string()),
            resale_price: Some("0,20".to_string()),
            fixed_monthly_charge: Some("20".to_string()),
            annual_price_growth_rate: Some("5".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_subscribers_receive_results_and_clears() {
        let mut host = CalculatorHost::default();
        let seen: Rc<RefCell<Vec<bool>>> = Rc::default();

        let sink = Rc::clone(&seen);
        host.subscribe(move |update| sink.borrow_mut().push(update.calculation().is_some()));

        host.recalculate(&form("500"));
        host.recalculate(&form("0"));

        assert_eq!(*seen.borrow(), vec![true, false]);
        assert!(matches!(
            host.latest(),
            Some(CalculatorUpdate::Cleared(CalculatorError::MissingOrInvalidInput { .. }))
        ));
    }

    #[test]
    fn test_late_subscriber_gets_latest() {
        let mut host = CalculatorHost::default();
        host.recalculate(&form("500"));

        let payback = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&payback);
        host.subscribe(move |update| {
            *sink.borrow_mut() = update.calculation().and_then(|c| c.headline.payback_year);
        });

        assert_eq!(*payback.borrow(), Some(5));
    }

    #[test]
    fn test_unsubscribe() {
        let mut host = CalculatorHost::default();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = host.subscribe(move |_| *sink.borrow_mut() += 1);

        host.recalculate(&form("500"));
        assert!(host.unsubscribe(id));
        assert!(!host.unsubscribe(id));
        host.recalculate(&form("600"));

        assert_eq!(*count.borrow(), 1);
    }
}
