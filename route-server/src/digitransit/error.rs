//! Digitransit client error types.

use std::sync::Arc;

/// Errors from the Digitransit HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum DigitransitError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", .body.as_deref().map(|b| format!(" (body: {b})")).unwrap_or_default())]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The GraphQL layer reported errors
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// Rate limited by the API
    #[error("rate limited by Digitransit API")]
    RateLimited,

    /// Invalid subscription key or unauthorized
    #[error("unauthorized (check DIGITRANSIT_SUBSCRIPTION_KEY)")]
    Unauthorized,

    /// Backend unavailable for a reason other than HTTP (mock failures, fixtures)
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// An error produced by a coalesced call another request made
    #[error("{0}")]
    Shared(Arc<DigitransitError>),
}
