//! Route Evaluator
//!
//! Composes two venue quotes into a round-trip estimate:
//!   Forward: router(loan, [A→B]) → direct pool(intermediate) → final
//!   Reverse: direct pool(loan) → router(intermediate, [B→A]) → final
//!
//! The second leg is always asked, even when the first leg is unavailable
//! (it then receives a zero input). Both directions stay structurally
//! identical and the `final > loan` check discards the dead case.
//!
//! Author: AI-Generated
//! Created: 2026-10-19

use super::quoter::QuoteSource;
use crate::types::{ProfitEstimate, Quote, Route, Venue};
use std::sync::Arc;
use tracing::debug;

/// Quotes of one round trip, before the profit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTrip {
    pub first: Quote,
    pub second: Quote,
}

impl RoundTrip {
    /// Some only when both legs quoted and the final amount beats the loan
    pub fn profit(&self, route: &Route<'_>) -> Option<ProfitEstimate> {
        let intermediate = self.first.value()?;
        let final_output = self.second.value()?;
        ProfitEstimate::new(route.loan_size, intermediate, final_output)
    }
}

/// Evaluates routes across the router venue and the direct-pool venue
pub struct RouteEvaluator {
    router: Arc<dyn QuoteSource>,
    direct: Arc<dyn QuoteSource>,
}

impl RouteEvaluator {
    pub fn new(router: Arc<dyn QuoteSource>, direct: Arc<dyn QuoteSource>) -> Self {
        Self { router, direct }
    }

    fn source(&self, venue: Venue) -> &Arc<dyn QuoteSource> {
        match venue {
            Venue::Router => &self.router,
            Venue::DirectPool => &self.direct,
        }
    }

    /// Quote both legs of the route
    pub async fn quote_round_trip(&self, route: &Route<'_>) -> RoundTrip {
        let (first_venue, second_venue) = route.direction.venues();
        let leg = route.leg();

        let first = self.source(first_venue).quote(&leg, route.loan_size).await;
        let second = self
            .source(second_venue)
            .quote(&leg, first.amount_or_zero())
            .await;

        RoundTrip { first, second }
    }

    /// Quote the route and return its profit estimate, if any
    pub async fn evaluate(&self, route: &Route<'_>) -> Option<ProfitEstimate> {
        let trip = self.quote_round_trip(route).await;
        let estimate = trip.profit(route);

        match &estimate {
            Some(est) => debug!(
                "{}: final {} > loan {} (+{})",
                route, est.final_output, est.loan_size, est.profit
            ),
            None => debug!(
                "{}: no gain (first={:?}, second={:?})",
                route, trip.first, trip.second
            ),
        }

        estimate
    }
}
