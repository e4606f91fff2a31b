//! Caching layer for upstream planner responses.
//!
//! Stop searches and itinerary searches are cached for a short TTL. Stop
//! names resolve to the same candidates for hours, and an arrive-by search
//! for a fixed deadline changes only with realtime updates, so a few minutes
//! of staleness is acceptable.
//!
//! Concurrent identical lookups are coalesced: only one upstream call is in
//! flight per key and the other callers wait for its result. Failures are
//! never cached.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use moka::future::Cache as MokaCache;

use serde_json::Value;

use crate::digitransit::{DigitransitError, StopDto};
use crate::domain::normalize_name;
use crate::planner::{ItineraryQuery, PlannerBackend};

/// Cache key for stop searches: (normalized name, result limit).
type StopKey = (String, usize);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Whether responses are cached at all.
    pub enabled: bool,

    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// A configuration that caches nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Planner backend with caching.
///
/// Wraps another backend and caches its successful responses.
pub struct CachedBackend {
    inner: Arc<dyn PlannerBackend>,
    stops: MokaCache<StopKey, Arc<Vec<StopDto>>>,
    plans: MokaCache<ItineraryQuery, Arc<Vec<Value>>>,
}

impl CachedBackend {
    /// Create a new cached backend around `inner`.
    pub fn new(inner: Arc<dyn PlannerBackend>, config: &CacheConfig) -> Self {
        let stops = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let plans = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            stops,
            plans,
        }
    }

    /// Wrap `inner` in a cache if `config` enables one.
    pub fn wrap(inner: Arc<dyn PlannerBackend>, config: &CacheConfig) -> Arc<dyn PlannerBackend> {
        if config.enabled {
            Arc::new(Self::new(inner, config))
        } else {
            inner
        }
    }
}

impl PlannerBackend for CachedBackend {
    fn find_stops<'a>(
        &'a self,
        name: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<StopDto>, DigitransitError>> {
        async move {
            let key = (normalize_name(name), limit);
            let stops = self
                .stops
                .try_get_with(key, async {
                    self.inner.find_stops(name, limit).await.map(Arc::new)
                })
                .await
                .map_err(DigitransitError::Shared)?;
            Ok(stops.as_ref().clone())
        }
        .boxed()
    }

    fn plan_itineraries<'a>(
        &'a self,
        query: &'a ItineraryQuery,
    ) -> BoxFuture<'a, Result<Vec<Value>, DigitransitError>> {
        async move {
            let itineraries = self
                .plans
                .try_get_with(query.clone(), async {
                    self.inner.plan_itineraries(query).await.map(Arc::new)
                })
                .await
                .map_err(DigitransitError::Shared)?;
            Ok(itineraries.as_ref().clone())
        }
        .boxed()
    }
}
