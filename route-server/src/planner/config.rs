//! Configuration for the route planner.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

/// How to choose among several stop candidates for one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopSelection {
    /// Take the candidate whose name equals the query after normalization,
    /// else the first candidate.
    #[default]
    PreferExact,
    /// Always take the first candidate.
    First,
}

impl FromStr for StopSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefer-exact" | "exact" => Ok(StopSelection::PreferExact),
            "first" => Ok(StopSelection::First),
            other => Err(format!(
                "unknown stop selection {other:?} (expected prefer-exact or first)"
            )),
        }
    }
}

impl fmt::Display for StopSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopSelection::PreferExact => f.write_str("prefer-exact"),
            StopSelection::First => f.write_str("first"),
        }
    }
}

/// Configuration parameters for route planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Time zone of the transit region. Arrival constraints are read and
    /// leg times reported in this zone.
    pub timezone: Tz,

    /// Maximum number of itineraries to request.
    pub max_itineraries: usize,

    /// Maximum stop candidates to consider per name.
    pub stop_search_limit: usize,

    /// Bound on each upstream call.
    pub request_timeout: Duration,

    /// Policy for picking among several stop candidates.
    pub stop_selection: StopSelection,
}

impl PlannerConfig {
    /// Set the transit region's time zone.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Set the maximum number of itineraries.
    pub fn with_max_itineraries(mut self, n: usize) -> Self {
        self.max_itineraries = n;
        self
    }

    /// Set the per-call upstream timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the stop selection policy.
    pub fn with_stop_selection(mut self, selection: StopSelection) -> Self {
        self.stop_selection = selection;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Helsinki,
            max_itineraries: 5,
            stop_search_limit: 10,
            request_timeout: Duration::from_secs(30),
            stop_selection: StopSelection::PreferExact,
        }
    }
}
