//! Digitransit routing API HTTP client.
//!
//! Provides async methods for the stop search and itinerary search
//! GraphQL queries. Handles authentication, concurrency limiting and the
//! GraphQL error envelope.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Semaphore;

use crate::planner::{ItineraryQuery, PlannerBackend};

use super::error::DigitransitError;
use super::query::{FIND_STOPS_QUERY, PLAN_QUERY, plan_variables, stop_variables};
use super::types::{GraphQlResponse, PlanData, StopDto, StopsData};

/// Default GraphQL endpoint for the Helsinki region (HSL) router.
pub const DEFAULT_BASE_URL: &str = "https://api.digitransit.fi/routing/v2/hsl/gtfs/v1";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Header carrying the Digitransit API subscription key.
const SUBSCRIPTION_KEY_HEADER: &str = "digitransit-subscription-key";

/// How much of an unparseable body to keep for diagnostics.
const BODY_PREVIEW_CHARS: usize = 500;

/// Configuration for the Digitransit client.
#[derive(Debug, Clone)]
pub struct DigitransitConfig {
    /// GraphQL endpoint URL
    pub base_url: String,
    /// Subscription key, if the endpoint requires one
    pub subscription_key: Option<String>,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DigitransitConfig {
    /// Create a new config pointing at the production endpoint.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            subscription_key: None,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom endpoint URL (for testing or another region's router).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the subscription key.
    pub fn with_subscription_key(mut self, key: impl Into<String>) -> Self {
        self.subscription_key = Some(key.into());
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DigitransitConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Digitransit routing API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct DigitransitClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl DigitransitClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DigitransitConfig) -> Result<Self, DigitransitError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("route-server/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(key) = &config.subscription_key {
            let value = HeaderValue::from_str(key).map_err(|_| DigitransitError::Api {
                status: 0,
                message: "Invalid subscription key format".to_string(),
            })?;
            headers.insert(HeaderName::from_static(SUBSCRIPTION_KEY_HEADER), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Search stops by name.
    ///
    /// Returns at most `limit` candidates, in upstream order.
    pub async fn search_stops(
        &self,
        name: &str,
        limit: usize,
    ) -> Result<Vec<StopDto>, DigitransitError> {
        tracing::debug!(name, limit, "searching stops");

        let data: StopsData = self.execute(FIND_STOPS_QUERY, stop_variables(name)).await?;

        let mut stops = data.stops.unwrap_or_default();
        stops.truncate(limit);
        Ok(stops)
    }

    /// Search itineraries arriving by the query's deadline.
    ///
    /// A missing `plan` or `itineraries` object is an empty result, not an
    /// error.
    pub async fn plan(&self, query: &ItineraryQuery) -> Result<Vec<Value>, DigitransitError> {
        tracing::debug!(
            from = %query.from_id,
            to = %query.to_id,
            arrival = %query.arrival,
            "planning itineraries"
        );

        let data: PlanData = self.execute(PLAN_QUERY, plan_variables(query)).await?;

        Ok(data
            .plan
            .and_then(|plan| plan.itineraries)
            .unwrap_or_default())
    }

    /// Execute a GraphQL query and return its `data`.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, DigitransitError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DigitransitError::Unavailable("semaphore closed".to_string()))?;

        let payload = json!({ "query": query, "variables": variables });

        let response = self.http.post(&self.base_url).json(&payload).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DigitransitError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DigitransitError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DigitransitError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_envelope(&body)
    }
}

/// Unwrap a GraphQL response body into its `data`.
fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, DigitransitError> {
    let envelope: GraphQlResponse<T> =
        serde_json::from_str(body).map_err(|e| DigitransitError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_PREVIEW_CHARS).collect()),
        })?;

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        return Err(DigitransitError::GraphQl(
            errors.into_iter().map(|e| e.message).collect(),
        ));
    }

    envelope.data.ok_or_else(|| DigitransitError::Json {
        message: "response has no data".to_string(),
        body: Some(body.chars().take(BODY_PREVIEW_CHARS).collect()),
    })
}

impl PlannerBackend for DigitransitClient {
    fn find_stops<'a>(
        &'a self,
        name: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<StopDto>, DigitransitError>> {
        self.search_stops(name, limit).boxed()
    }

    fn plan_itineraries<'a>(
        &'a self,
        query: &'a ItineraryQuery,
    ) -> BoxFuture<'a, Result<Vec<Value>, DigitransitError>> {
        self.plan(query).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = DigitransitConfig::new()
            .with_base_url("http://localhost:8080/graphql")
            .with_subscription_key("test-key")
            .with_max_concurrent(3)
            .with_timeout(60);

        assert_eq!(config.base_url, "http://localhost:8080/graphql");
        assert_eq!(config.subscription_key.as_deref(), Some("test-key"));
        assert_eq!(config.max_concurrent, 3);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = DigitransitConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.subscription_key, None);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn client_creation() {
        let client = DigitransitClient::new(DigitransitConfig::new().with_subscription_key("k"));
        assert!(client.is_ok());
    }

    #[test]
    fn client_rejects_unprintable_key() {
        let client = DigitransitClient::new(DigitransitConfig::new().with_subscription_key("bad\nkey"));
        assert!(client.is_err());
    }

    #[test]
    fn envelope_with_data() {
        let body = r#"{ "data": { "stops": [ { "gtfsId": "HSL:1", "name": "Keilaniemi" } ] } }"#;
        let data: StopsData = parse_envelope(body).unwrap();
        assert_eq!(data.stops.unwrap().len(), 1);
    }

    #[test]
    fn envelope_with_errors() {
        let body = r#"{ "data": null, "errors": [ { "message": "bad stop id" } ] }"#;
        let err = parse_envelope::<PlanData>(body).unwrap_err();
        assert!(matches!(err, DigitransitError::GraphQl(ref m) if m == &["bad stop id"]));
    }

    #[test]
    fn envelope_with_empty_errors_list() {
        let body = r#"{ "data": { "plan": null }, "errors": [] }"#;
        let data: PlanData = parse_envelope(body).unwrap();
        assert!(data.plan.is_none());
    }

    #[test]
    fn envelope_keeps_badly_typed_itinerary() {
        let body = r#"{
            "data": {
                "plan": {
                    "itineraries": [
                        { "duration": "n/a", "legs": [ { "mode": 7, "from": "A" } ] },
                        { "legs": [ { "mode": "BUS" } ] }
                    ]
                }
            }
        }"#;

        let data: PlanData = parse_envelope(body).unwrap();
        assert_eq!(data.plan.unwrap().itineraries.unwrap().len(), 2);
    }

    #[test]
    fn envelope_without_data() {
        let err = parse_envelope::<PlanData>("{}").unwrap_err();
        assert!(err.to_string().contains("response has no data"));
    }

    #[test]
    fn envelope_not_json() {
        let err = parse_envelope::<PlanData>("<html>502</html>").unwrap_err();
        assert!(matches!(err, DigitransitError::Json { body: Some(ref b), .. } if b == "<html>502</html>"));
    }

    // Requests against the live API need a subscription key and network
    // access, so they are left to manual runs.
}
