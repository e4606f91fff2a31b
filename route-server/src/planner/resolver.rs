//! Stop resolution.
//!
//! Turns a free-text stop name into one upstream stop identifier. The
//! upstream's relevance ranking is authoritative; the resolver only ever
//! promotes an exact name match over it.

use crate::digitransit::convert_stop;
use crate::domain::{StopMatch, names_match};

use super::backend::call_upstream;
use super::{PlanError, PlannerBackend, PlannerConfig, StopSelection};

/// Resolves stop names against the upstream planner.
pub struct StopResolver<'a> {
    backend: &'a dyn PlannerBackend,
    config: &'a PlannerConfig,
}

impl<'a> StopResolver<'a> {
    pub fn new(backend: &'a dyn PlannerBackend, config: &'a PlannerConfig) -> Self {
        Self { backend, config }
    }

    /// Resolve `name` to a single stop.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `name` is blank (no upstream call is made)
    /// - `StopNotFound` if upstream returns no usable candidate
    /// - `UpstreamUnavailable` if the search fails or times out
    pub async fn resolve(&self, name: &str) -> Result<StopMatch, PlanError> {
        let name = required_name("stop name", name)?;

        let raw = call_upstream(
            "stop search",
            self.config.request_timeout,
            self.backend.find_stops(name, self.config.stop_search_limit),
        )
        .await?;

        let candidates: Vec<StopMatch> = raw.iter().filter_map(convert_stop).collect();
        if candidates.len() < raw.len() {
            tracing::warn!(
                name,
                dropped = raw.len() - candidates.len(),
                "ignoring stop candidates without id or name"
            );
        }

        let chosen = select_stop(name, candidates, self.config.stop_selection)
            .ok_or_else(|| PlanError::StopNotFound(name.to_string()))?;

        tracing::debug!(name, stop = %chosen, "resolved stop");
        Ok(chosen)
    }
}

/// Trim `value`, rejecting it if nothing is left.
pub fn required_name<'v>(field: &str, value: &'v str) -> Result<&'v str, PlanError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlanError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}

/// Pick one candidate for `query`.
///
/// Candidates are in upstream order. Returns `None` only when there are no
/// candidates.
pub fn select_stop(
    query: &str,
    candidates: Vec<StopMatch>,
    selection: StopSelection,
) -> Option<StopMatch> {
    let index = match selection {
        StopSelection::PreferExact => candidates
            .iter()
            .position(|c| names_match(c.display_name(), query))
            .unwrap_or(0),
        StopSelection::First => 0,
    };

    candidates.into_iter().nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digitransit::{MockDigitransitClient, StopDto};

    fn stop(id: &str, name: &str) -> StopMatch {
        StopMatch::new(id, name).unwrap()
    }

    fn dto(id: &str, name: &str) -> StopDto {
        StopDto {
            gtfs_id: Some(id.into()),
            name: Some(name.into()),
            lat: Some(60.18),
            lon: Some(24.83),
        }
    }

    #[test]
    fn exact_match_beats_ranking() {
        let candidates = vec![
            stop("HSL:1", "Aalto-yliopiston metroasema"),
            stop("HSL:2", "Aalto Yliopisto"),
        ];
        let chosen = select_stop("aalto  yliopisto", candidates, StopSelection::PreferExact);
        assert_eq!(chosen.unwrap().id(), "HSL:2");
    }

    #[test]
    fn first_candidate_without_exact_match() {
        let candidates = vec![stop("HSL:1", "Keilaniemi (M)"), stop("HSL:2", "Keilaniementie")];
        let chosen = select_stop("Keilan", candidates, StopSelection::PreferExact);
        assert_eq!(chosen.unwrap().id(), "HSL:1");
    }

    #[test]
    fn first_exact_match_wins_among_duplicates() {
        // Platforms on either side of the road share a name
        let candidates = vec![
            stop("HSL:9", "Tapiolan uimahalli"),
            stop("HSL:1", "Tapiola"),
            stop("HSL:2", "Tapiola"),
        ];
        let chosen = select_stop("Tapiola", candidates, StopSelection::PreferExact);
        assert_eq!(chosen.unwrap().id(), "HSL:1");
    }

    #[test]
    fn first_policy_ignores_exact_match() {
        let candidates = vec![
            stop("HSL:1", "Aalto-yliopiston metroasema"),
            stop("HSL:2", "Aalto Yliopisto"),
        ];
        let chosen = select_stop("Aalto Yliopisto", candidates, StopSelection::First);
        assert_eq!(chosen.unwrap().id(), "HSL:1");
    }

    #[test]
    fn no_candidates() {
        assert!(select_stop("x", vec![], StopSelection::PreferExact).is_none());
    }

    #[test]
    fn required_name_trims() {
        assert_eq!(required_name("start_stop", "  Keilaniemi ").unwrap(), "Keilaniemi");
        assert_eq!(
            required_name("start_stop", " \t ").unwrap_err(),
            PlanError::InvalidInput("start_stop must not be empty".into())
        );
    }

    #[tokio::test]
    async fn resolve_through_backend() {
        let mock = MockDigitransitClient::new().with_stops(
            "Aalto Yliopisto",
            vec![dto("HSL:1", "Aalto-yliopiston metroasema"), dto("HSL:2", "Aalto Yliopisto")],
        );
        let config = PlannerConfig::default();

        let stop = StopResolver::new(&mock, &config)
            .resolve(" Aalto Yliopisto ")
            .await
            .unwrap();
        assert_eq!(stop.id(), "HSL:2");
    }

    #[tokio::test]
    async fn blank_name_makes_no_call() {
        let mock = MockDigitransitClient::new();
        let config = PlannerConfig::default();

        let err = StopResolver::new(&mock, &config).resolve("   ").await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(_)));
        assert_eq!(mock.stop_calls(), 0);
    }

    #[tokio::test]
    async fn unusable_candidates_are_not_found() {
        let broken = StopDto {
            gtfs_id: None,
            name: Some("Keilaniemi".into()),
            lat: None,
            lon: None,
        };
        let mock = MockDigitransitClient::new().with_stops("Keilaniemi", vec![broken]);
        let config = PlannerConfig::default();

        let err = StopResolver::new(&mock, &config)
            .resolve("Keilaniemi")
            .await
            .unwrap_err();
        assert_eq!(err, PlanError::StopNotFound("Keilaniemi".into()));
    }

    #[tokio::test]
    async fn upstream_failure_is_unavailable() {
        let mock = MockDigitransitClient::new().failing_stop_search();
        let config = PlannerConfig::default();

        let err = StopResolver::new(&mock, &config)
            .resolve("Keilaniemi")
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
