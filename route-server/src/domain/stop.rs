//! Stop identity types.

use std::fmt;

/// Error returned when a stop match is structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop: {reason}")]
pub struct InvalidStop {
    reason: &'static str,
}

/// A stop resolved against the upstream planner.
///
/// `id` is the planner's stable identifier (a GTFS id such as
/// `HSL:2222234`); `display_name` is what the planner calls the stop.
/// Both are non-empty by construction.
///
/// # Examples
///
/// ```
/// use route_server::domain::StopMatch;
///
/// let stop = StopMatch::new("HSL:2222234", "Aalto Yliopisto").unwrap();
/// assert_eq!(stop.id(), "HSL:2222234");
///
/// assert!(StopMatch::new("", "Aalto Yliopisto").is_err());
/// assert!(StopMatch::new("HSL:2222234", "  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StopMatch {
    id: String,
    display_name: String,
}

impl StopMatch {
    /// Construct a stop match, rejecting blank identifiers or names.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Result<Self, InvalidStop> {
        let id = id.into();
        let display_name = display_name.into();

        if id.trim().is_empty() {
            return Err(InvalidStop {
                reason: "identifier must not be empty",
            });
        }

        if display_name.trim().is_empty() {
            return Err(InvalidStop {
                reason: "display name must not be empty",
            });
        }

        Ok(Self { id, display_name })
    }

    /// The upstream stop identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The upstream stop name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Re-check the construction invariants.
    ///
    /// Values built through [`StopMatch::new`] always pass; this guards the
    /// planner entry point against values assembled some other way.
    pub fn validate(&self) -> Result<(), InvalidStop> {
        Self::new(self.id.as_str(), self.display_name.as_str()).map(|_| ())
    }
}

impl fmt::Display for StopMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}

/// Normalize a stop name for comparison.
///
/// Trims, collapses internal whitespace runs to a single space and
/// lowercases, so `" Aalto   YLIOPISTO"` and `"aalto yliopisto"` compare equal.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Returns true if two stop names are equal after normalization.
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}
