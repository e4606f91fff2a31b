//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::planner::{PlanError, call_upstream};

use super::dto::*;
use super::state::AppState;

/// Name reported by the descriptor and health endpoints.
const SERVICE_NAME: &str = "Transport Routing API";

/// Stop name searched upstream in health checks.
const HEALTH_CHECK_STOP: &str = "Aalto";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/routes", get(plan_routes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Service descriptor.
async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health check endpoint.
///
/// Checks the upstream with a one-result stop search. Always answers 200;
/// the body carries the verdict.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let planner = &state.planner;
    let check = call_upstream(
        "health check",
        planner.config().request_timeout,
        planner.backend().find_stops(HEALTH_CHECK_STOP, 1),
    )
    .await;

    let digitransit_api = match check {
        Ok(stops) if !stops.is_empty() => ComponentStatus::Healthy,
        Ok(_) => ComponentStatus::Degraded,
        Err(_) => ComponentStatus::Unhealthy,
    };

    Json(HealthResponse {
        service: SERVICE_NAME,
        status: digitransit_api,
        components: HealthComponents { digitransit_api },
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Find routes arriving by a deadline.
async fn plan_routes(
    State(state): State<AppState>,
    Query(req): Query<RoutesRequest>,
) -> Result<Json<RouteResultResponse>, AppError> {
    let arrival_time = required_param("arrival_time", req.arrival_time.as_deref())?;
    let start_stop = required_param("start_stop", req.start_stop.as_deref())?;
    let end_stop = required_param("end_stop", req.end_stop.as_deref())?;

    let result = state
        .planner
        .query(arrival_time, start_stop, end_stop)
        .await?;

    tracing::info!(
        from = %result.query.from,
        to = %result.query.to,
        routes = result.routes.len(),
        discarded = result.diagnostics.len(),
        "answered route request"
    );

    Ok(Json(RouteResultResponse::from_result(&result)))
}

fn required_param<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, AppError> {
    value.ok_or_else(|| {
        AppError(PlanError::InvalidInput(format!(
            "missing query parameter {name}"
        )))
    })
}

/// Application error type.
#[derive(Debug)]
pub struct AppError(pub PlanError);

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self.0 {
            PlanError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlanError::StopNotFound(_) => StatusCode::NOT_FOUND,
            PlanError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        AppError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(%status, error = %self.0, "route request failed");
        } else {
            tracing::info!(%status, error = %self.0, "route request rejected");
        }

        let body = Json(ErrorResponse::from_error(&self.0));
        (status, body).into_response()
    }
}
