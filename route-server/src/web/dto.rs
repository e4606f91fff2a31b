//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Leg, Route, TransportMode, format_time_of_day};
use crate::planner::{PlanError, QueryEcho, RouteResult};

/// Query parameters for a route request.
///
/// All fields are optional here so that a missing parameter is reported
/// as invalid input rather than as an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RoutesRequest {
    /// Deadline as `yyyyMMddHHmmss`
    pub arrival_time: Option<String>,

    /// Origin stop name
    pub start_stop: Option<String>,

    /// Destination stop name
    pub end_stop: Option<String>,
}

/// Response to a route request.
#[derive(Debug, Serialize)]
pub struct RouteResultResponse {
    pub routes: Vec<RouteSummary>,
    pub query: QueryResult,
}

/// One route in a response.
#[derive(Debug, Serialize)]
pub struct RouteSummary {
    /// Departure of the first leg, `HH:MM:SS`
    pub departure_time: String,

    /// Arrival of the last leg, `HH:MM:SS`
    pub arrival_time: String,

    /// Total duration in seconds
    pub duration: u64,

    pub legs: Vec<LegResult>,
}

/// One leg in a response.
#[derive(Debug, Serialize)]
pub struct LegResult {
    pub mode: TransportMode,

    /// Line label; absent for walks and unlabeled legs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    pub from: String,
    pub to: String,
    pub departure: String,
    pub arrival: String,

    /// Duration in seconds
    pub duration: u64,
}

/// Echo of the request a response answers.
#[derive(Debug, Serialize)]
pub struct QueryResult {
    pub from: String,
    pub to: String,

    /// Deadline as `yyyyMMddHHmmss`
    pub arrival_time: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Failure kind
    pub error: String,

    /// Human-readable detail
    pub details: String,
}

/// Service descriptor served at the root.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

/// Health of one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Dependency health.
#[derive(Debug, Serialize)]
pub struct HealthComponents {
    pub digitransit_api: ComponentStatus,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub status: ComponentStatus,
    pub components: HealthComponents,

    /// RFC 3339 time of the check
    pub timestamp: String,
}

impl RouteResultResponse {
    /// Create from a planner result. Diagnostics are not part of the response.
    pub fn from_result(result: &RouteResult) -> Self {
        Self {
            routes: result.routes.iter().map(RouteSummary::from_route).collect(),
            query: QueryResult::from_echo(&result.query),
        }
    }
}

impl RouteSummary {
    /// Create from a domain Route.
    pub fn from_route(route: &Route) -> Self {
        Self {
            departure_time: format_time_of_day(&route.departure_time()),
            arrival_time: format_time_of_day(&route.arrival_time()),
            duration: route.total_duration_seconds(),
            legs: route.legs().iter().map(LegResult::from_leg).collect(),
        }
    }
}

impl LegResult {
    /// Create from a domain Leg.
    pub fn from_leg(leg: &Leg) -> Self {
        Self {
            mode: leg.mode(),
            route: leg.route_label().map(str::to_string),
            from: leg.from().to_string(),
            to: leg.to().to_string(),
            departure: format_time_of_day(&leg.departure()),
            arrival: format_time_of_day(&leg.arrival()),
            duration: leg.duration_seconds(),
        }
    }
}

impl QueryResult {
    pub fn from_echo(echo: &QueryEcho) -> Self {
        Self {
            from: echo.from.clone(),
            to: echo.to.clone(),
            arrival_time: echo.arrival_time.to_string(),
        }
    }
}

impl ErrorResponse {
    /// Create from a planner error.
    pub fn from_error(error: &PlanError) -> Self {
        let kind = match error {
            PlanError::InvalidInput(_) => "invalid_input",
            PlanError::StopNotFound(_) => "stop_not_found",
            PlanError::UpstreamUnavailable(_) => "upstream_unavailable",
        };

        Self {
            error: kind.to_string(),
            details: error.to_string(),
        }
    }
}
