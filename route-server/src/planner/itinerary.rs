//! Itinerary planning and response normalization.
//!
//! The upstream does the pathfinding. This module builds the arrive-by
//! query and turns the raw itineraries into routes: every itinerary is
//! converted and checked independently, then the batch is split into
//! surviving routes and diagnostics. One bad itinerary never costs the
//! caller the good ones.

use chrono_tz::Tz;
use serde_json::Value;

use crate::digitransit::convert_raw_itinerary;
use crate::domain::{ArrivalConstraint, Route, StopMatch};

use super::backend::call_upstream;
use super::{
    DiagnosticReason, ItineraryQuery, ParsingDiagnostic, PlanError, PlannerBackend, PlannerConfig,
    QueryEcho, RouteResult,
};

/// Plans itineraries between resolved stops.
pub struct ItineraryPlanner<'a> {
    backend: &'a dyn PlannerBackend,
    config: &'a PlannerConfig,
}

impl<'a> ItineraryPlanner<'a> {
    pub fn new(backend: &'a dyn PlannerBackend, config: &'a PlannerConfig) -> Self {
        Self { backend, config }
    }

    /// Find routes from `start` to `end` arriving no later than `arrival`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if either stop is structurally invalid (no upstream
    ///   call is made)
    /// - `UpstreamUnavailable` if the search fails or times out
    ///
    /// Malformed or late itineraries are not errors; they are dropped and
    /// listed in `RouteResult::diagnostics`.
    pub async fn plan(
        &self,
        start: &StopMatch,
        end: &StopMatch,
        arrival: ArrivalConstraint,
    ) -> Result<RouteResult, PlanError> {
        start.validate()?;
        end.validate()?;

        let query = ItineraryQuery::new(start.id(), end.id(), arrival, self.config.max_itineraries);

        let raw = call_upstream(
            "itinerary search",
            self.config.request_timeout,
            self.backend.plan_itineraries(&query),
        )
        .await?;

        let raw = &raw[..raw.len().min(self.config.max_itineraries)];
        let (routes, diagnostics) = normalize_itineraries(raw, arrival, self.config.timezone);

        for diagnostic in &diagnostics {
            tracing::warn!(
                from = start.id(),
                to = end.id(),
                index = diagnostic.index,
                reason = %diagnostic.reason,
                "discarding itinerary"
            );
        }

        tracing::info!(
            from = start.id(),
            to = end.id(),
            arrival = %arrival,
            received = raw.len(),
            returned = routes.len(),
            "planned itineraries"
        );

        Ok(RouteResult {
            routes,
            query: QueryEcho {
                from: start.display_name().to_string(),
                to: end.display_name().to_string(),
                arrival_time: arrival,
            },
            diagnostics,
        })
    }
}

/// Convert and check every raw itinerary, keeping upstream order.
///
/// Returns the surviving routes and one diagnostic per dropped itinerary.
pub fn normalize_itineraries(
    raw: &[Value],
    arrival: ArrivalConstraint,
    tz: Tz,
) -> (Vec<Route>, Vec<ParsingDiagnostic>) {
    let mut routes = Vec::with_capacity(raw.len());
    let mut diagnostics = Vec::new();

    for outcome in raw
        .iter()
        .enumerate()
        .map(|(index, itinerary)| check_itinerary(index, itinerary, arrival, tz))
    {
        match outcome {
            Ok(route) => routes.push(route),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    (routes, diagnostics)
}

/// Convert one itinerary and enforce the arrival deadline.
fn check_itinerary(
    index: usize,
    itinerary: &Value,
    arrival: ArrivalConstraint,
    tz: Tz,
) -> Result<Route, ParsingDiagnostic> {
    let route =
        convert_raw_itinerary(itinerary, tz).map_err(|e| ParsingDiagnostic::new(index, e))?;

    if !arrival.admits(&route.arrival_time()) {
        return Err(ParsingDiagnostic::new(
            index,
            DiagnosticReason::ArrivesTooLate {
                arrival: route.arrival_time().format("%Y-%m-%d %H:%M:%S").to_string(),
                deadline: arrival,
            },
        ));
    }

    Ok(route)
}
