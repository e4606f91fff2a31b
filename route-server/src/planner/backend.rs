//! The seam between the core and the upstream journey planner.

use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;

use serde_json::Value;

use crate::digitransit::{DigitransitError, StopDto};
use crate::domain::ArrivalConstraint;

use super::PlanError;

/// An arrival-constrained itinerary search between two resolved stops.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItineraryQuery {
    /// Upstream identifier of the origin stop.
    pub from_id: String,

    /// Upstream identifier of the destination stop.
    pub to_id: String,

    /// Latest acceptable arrival (region-local).
    pub arrival: ArrivalConstraint,

    /// How many itineraries to ask for.
    pub num_itineraries: usize,
}

impl ItineraryQuery {
    /// Create a query for itineraries arriving by `arrival`.
    pub fn new(
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        arrival: ArrivalConstraint,
        num_itineraries: usize,
    ) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            arrival,
            num_itineraries,
        }
    }
}

/// Trait for querying the upstream journey planner.
///
/// This abstraction allows the route planner to be tested with mock data
/// and wrapped with a response cache. Methods return boxed futures so
/// implementations can be shared as `Arc<dyn PlannerBackend>`.
pub trait PlannerBackend: Send + Sync {
    /// Search stops by name, returning at most `limit` candidates in the
    /// upstream's own relevance order.
    fn find_stops<'a>(
        &'a self,
        name: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<StopDto>, DigitransitError>>;

    /// Search itineraries arriving no later than the query's deadline.
    ///
    /// Itineraries are returned undecoded, in upstream ranking order; the
    /// planner decodes and validates each one separately.
    fn plan_itineraries<'a>(
        &'a self,
        query: &'a ItineraryQuery,
    ) -> BoxFuture<'a, Result<Vec<Value>, DigitransitError>>;
}

/// Await an upstream call, bounding it by `timeout`.
///
/// Both transport errors and expiry become `UpstreamUnavailable`. Dropping
/// the returned future drops the in-flight request.
pub(crate) async fn call_upstream<T, F>(
    operation: &str,
    timeout: Duration,
    call: F,
) -> Result<T, PlanError>
where
    F: Future<Output = Result<T, DigitransitError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::error!(operation, error = %e, "upstream call failed");
            Err(PlanError::UpstreamUnavailable(format!("{operation}: {e}")))
        }
        Err(_) => {
            tracing::error!(operation, timeout_secs = timeout.as_secs_f64(), "upstream call timed out");
            Err(PlanError::UpstreamUnavailable(format!(
                "{operation}: timed out after {:.1}s",
                timeout.as_secs_f64()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_success() {
        let result = call_upstream("stop search", Duration::from_secs(1), async {
            Ok::<_, DigitransitError>(7)
        })
        .await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn maps_errors_to_upstream_unavailable() {
        let result: Result<(), _> = call_upstream("stop search", Duration::from_secs(1), async {
            Err(DigitransitError::RateLimited)
        })
        .await;

        assert_eq!(
            result.unwrap_err(),
            PlanError::UpstreamUnavailable("stop search: rate limited by Digitransit API".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn maps_expiry_to_upstream_unavailable() {
        let result: Result<(), _> = call_upstream("itinerary search", Duration::from_secs(2), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;

        assert_eq!(
            result.unwrap_err(),
            PlanError::UpstreamUnavailable("itinerary search: timed out after 2.0s".into())
        );
    }
}
