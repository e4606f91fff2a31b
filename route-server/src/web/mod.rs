//! Web layer for the route planner.
//!
//! Provides the HTTP endpoints for route queries and health checks.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
