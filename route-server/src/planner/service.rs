//! The route planner: resolve both stops, then plan between them.

use std::sync::Arc;

use crate::domain::{ArrivalConstraint, StopMatch};

use super::itinerary::ItineraryPlanner;
use super::resolver::{StopResolver, required_name};
use super::{PlanError, PlannerBackend, PlannerConfig, QueryEcho, RouteResult};

/// Route planner over an upstream backend.
///
/// Holds no per-request state; one instance serves all requests
/// concurrently.
pub struct RoutePlanner {
    backend: Arc<dyn PlannerBackend>,
    config: PlannerConfig,
}

impl RoutePlanner {
    /// Create a planner using `backend` for all upstream calls.
    pub fn new(backend: Arc<dyn PlannerBackend>, config: PlannerConfig) -> Self {
        Self { backend, config }
    }

    /// The upstream backend.
    pub fn backend(&self) -> &Arc<dyn PlannerBackend> {
        &self.backend
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Resolve a stop name to a single stop.
    pub async fn resolve(&self, name: &str) -> Result<StopMatch, PlanError> {
        StopResolver::new(self.backend.as_ref(), &self.config)
            .resolve(name)
            .await
    }

    /// Plan between two already-resolved stops.
    ///
    /// The query echo carries the stops' display names.
    pub async fn plan(
        &self,
        start: &StopMatch,
        end: &StopMatch,
        arrival: ArrivalConstraint,
    ) -> Result<RouteResult, PlanError> {
        ItineraryPlanner::new(self.backend.as_ref(), &self.config)
            .plan(start, end, arrival)
            .await
    }

    /// Answer a route request from raw caller input.
    ///
    /// Every input is validated before any upstream call. The two stop
    /// resolutions run concurrently; the first failure wins and the other
    /// resolution is dropped. The query echo carries the caller's stop
    /// names, trimmed.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a malformed arrival time or a blank stop name
    /// - `StopNotFound` if either name resolves to nothing
    /// - `UpstreamUnavailable` if any upstream call fails or times out
    pub async fn query(
        &self,
        arrival_time: &str,
        start_stop: &str,
        end_stop: &str,
    ) -> Result<RouteResult, PlanError> {
        let arrival = ArrivalConstraint::parse(arrival_time)?;
        let start_name = required_name("start_stop", start_stop)?;
        let end_name = required_name("end_stop", end_stop)?;

        let (start, end) = tokio::try_join!(self.resolve(start_name), self.resolve(end_name))?;

        tracing::info!(
            start = %start,
            end = %end,
            arrival = %arrival,
            "resolved route request"
        );

        let result = self.plan(&start, &end, arrival).await?;

        Ok(result.with_query(QueryEcho {
            from: start_name.to_string(),
            to: end_name.to_string(),
            arrival_time: arrival,
        }))
    }
}
