//! Mock Digitransit client for testing without API access.
//!
//! Serves canned stop searches and itinerary searches from memory or from
//! JSON fixture files, and can simulate outages and slow responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::normalize_name;
use crate::planner::{ItineraryQuery, PlannerBackend};

use super::error::DigitransitError;
use super::types::StopDto;

/// Fixture file holding stop searches: `{ "<name>": [StopDto, ...] }`.
const STOPS_FIXTURE: &str = "stops.json";

/// Fixture file holding itinerary searches: `[PlanFixture, ...]`.
const PLANS_FIXTURE: &str = "plans.json";

/// One canned itinerary search.
#[derive(Debug, Deserialize)]
struct PlanFixture {
    from: String,
    to: String,
    itineraries: Vec<Value>,
}

/// Mock Digitransit client.
///
/// Stop searches match on the normalized query name. Unknown names and
/// unknown stop pairs produce empty results, as the real API does.
#[derive(Clone, Default)]
pub struct MockDigitransitClient {
    stops: HashMap<String, Vec<StopDto>>,
    plans: HashMap<(String, String), Vec<Value>>,
    fail_stops: bool,
    fail_plans: bool,
    latency: Option<Duration>,
    stop_calls: Arc<AtomicUsize>,
    plan_calls: Arc<AtomicUsize>,
    plan_queries: Arc<Mutex<Vec<ItineraryQuery>>>,
}

impl MockDigitransitClient {
    /// Create an empty mock: every search returns nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a directory containing `stops.json` and/or
    /// `plans.json`.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, DigitransitError> {
        let data_dir = data_dir.as_ref();
        let mut mock = Self::new();
        let mut loaded = false;

        let stops_path = data_dir.join(STOPS_FIXTURE);
        if stops_path.is_file() {
            let stops: HashMap<String, Vec<StopDto>> = read_fixture(&stops_path)?;
            for (name, candidates) in stops {
                mock = mock.with_stops(&name, candidates);
            }
            loaded = true;
        }

        let plans_path = data_dir.join(PLANS_FIXTURE);
        if plans_path.is_file() {
            let plans: Vec<PlanFixture> = read_fixture(&plans_path)?;
            for plan in plans {
                mock = mock.with_itineraries(&plan.from, &plan.to, plan.itineraries);
            }
            loaded = true;
        }

        if !loaded {
            return Err(DigitransitError::Unavailable(format!(
                "no {STOPS_FIXTURE} or {PLANS_FIXTURE} found in {}",
                data_dir.display()
            )));
        }

        tracing::info!(
            stops = mock.stops.len(),
            plans = mock.plans.len(),
            dir = %data_dir.display(),
            "loaded mock Digitransit fixtures"
        );

        Ok(mock)
    }

    /// Serve `candidates` for searches matching `name`.
    pub fn with_stops(mut self, name: &str, candidates: Vec<StopDto>) -> Self {
        self.stops.insert(normalize_name(name), candidates);
        self
    }

    /// Serve `itineraries` for searches from `from_id` to `to_id`.
    pub fn with_itineraries(mut self, from_id: &str, to_id: &str, itineraries: Vec<Value>) -> Self {
        self.plans
            .insert((from_id.to_string(), to_id.to_string()), itineraries);
        self
    }

    /// Make every stop search fail.
    pub fn failing_stop_search(mut self) -> Self {
        self.fail_stops = true;
        self
    }

    /// Make every itinerary search fail.
    pub fn failing_plan_search(mut self) -> Self {
        self.fail_plans = true;
        self
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of stop searches received.
    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    /// Number of itinerary searches received.
    pub fn plan_calls(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }

    /// Total upstream calls received.
    pub fn total_calls(&self) -> usize {
        self.stop_calls() + self.plan_calls()
    }

    /// Itinerary queries received, in order.
    pub fn plan_queries(&self) -> Vec<ItineraryQuery> {
        self.plan_queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl PlannerBackend for MockDigitransitClient {
    fn find_stops<'a>(
        &'a self,
        name: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<StopDto>, DigitransitError>> {
        async move {
            self.stop_calls.fetch_add(1, Ordering::SeqCst);
            self.delay().await;

            if self.fail_stops {
                return Err(DigitransitError::Unavailable("mock stop search failure".into()));
            }

            let mut stops = self
                .stops
                .get(&normalize_name(name))
                .cloned()
                .unwrap_or_default();
            stops.truncate(limit);
            Ok(stops)
        }
        .boxed()
    }

    fn plan_itineraries<'a>(
        &'a self,
        query: &'a ItineraryQuery,
    ) -> BoxFuture<'a, Result<Vec<Value>, DigitransitError>> {
        async move {
            self.plan_calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut queries) = self.plan_queries.lock() {
                queries.push(query.clone());
            }
            self.delay().await;

            if self.fail_plans {
                return Err(DigitransitError::Unavailable("mock plan search failure".into()));
            }

            let mut itineraries = self
                .plans
                .get(&(query.from_id.clone(), query.to_id.clone()))
                .cloned()
                .unwrap_or_default();
            itineraries.truncate(query.num_itineraries);
            Ok(itineraries)
        }
        .boxed()
    }
}

/// Read and parse one JSON fixture.
fn read_fixture<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DigitransitError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        DigitransitError::Unavailable(format!("failed to read {}: {e}", path.display()))
    })?;

    serde_json::from_str(&json).map_err(|e| DigitransitError::Json {
        message: format!("failed to parse {}: {e}", path.display()),
        body: None,
    })
}
