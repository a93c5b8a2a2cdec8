//! Two-screen simulation session.
//!
//! The session is either waiting for an amount or showing results for one.
//! Every confirm and reset starts a new generation; a rate fetch started in
//! an older generation can no longer update the session.

use tracing::debug;

use crate::error::SimulationError;
use crate::models::{MarketRateSet, PrincipalAmount, RateOrigin};
use crate::projection::{project_all, Projection};
use crate::utils::parse_currency_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    AwaitingInput,
    ShowingResults(PrincipalAmount),
}

/// Proof that a rate fetch was started for a given results view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: AppState,
    generation: u64,
    fallback: MarketRateSet,
    rates: MarketRateSet,
    origin: RateOrigin,
}

impl Session {
    pub fn new(fallback: MarketRateSet) -> Self {
        Self {
            state: AppState::AwaitingInput,
            generation: 0,
            fallback,
            rates: fallback,
            origin: RateOrigin::Fallback,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn rates(&self) -> (MarketRateSet, RateOrigin) {
        (self.rates, self.origin)
    }

    /// Parse the typed amount and move to the results screen.
    ///
    /// A non-positive amount leaves the session untouched. The returned
    /// ticket must accompany the rates fetched for this results view.
    pub fn confirm(&mut self, input: &str) -> Result<FetchTicket, SimulationError> {
        if let AppState::ShowingResults(_) = self.state {
            return Err(SimulationError::AlreadyShowingResults);
        }

        let principal = PrincipalAmount::positive(parse_currency_string(input))?;
        self.generation += 1;
        self.state = AppState::ShowingResults(principal);
        debug!(
            "Session generation {}: showing results for {}",
            self.generation,
            principal.value()
        );
        Ok(FetchTicket {
            generation: self.generation,
        })
    }

    /// Back to the input screen. Rates go back to the fallback set, fetched
    /// rates are not carried into the next simulation.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = AppState::AwaitingInput;
        self.rates = self.fallback;
        self.origin = RateOrigin::Fallback;
    }

    /// Install fetched rates if `ticket` still belongs to the visible
    /// results view. Returns whether the rates were applied.
    pub fn apply_rates(
        &mut self,
        ticket: FetchTicket,
        rates: MarketRateSet,
        origin: RateOrigin,
    ) -> bool {
        let current = ticket.generation == self.generation
            && matches!(self.state, AppState::ShowingResults(_));
        if !current {
            debug!(
                "Discarding rates for generation {} (current {})",
                ticket.generation, self.generation
            );
            return false;
        }
        self.rates = rates;
        self.origin = origin;
        true
    }

    /// Projections for the visible results view, if any
    pub fn projections(&self) -> Option<Vec<Projection>> {
        match self.state {
            AppState::AwaitingInput => None,
            AppState::ShowingResults(principal) => Some(project_all(principal, &self.rates)),
        }
    }
}
