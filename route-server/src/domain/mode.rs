//! Transport modes.

use std::fmt;

use serde::Serialize;

/// The kind of travel a leg represents.
///
/// Upstream mode labels are an open vocabulary. They are folded into this
/// closed set, with anything unrecognised becoming `Other`, so the response
/// contract stays fixed when upstream adds new modes.
///
/// # Examples
///
/// ```
/// use route_server::domain::TransportMode;
///
/// assert_eq!(TransportMode::from_upstream("BUS"), TransportMode::Bus);
/// assert_eq!(TransportMode::from_upstream("rail"), TransportMode::Train);
/// assert_eq!(TransportMode::from_upstream("AIRSHIP"), TransportMode::Other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    Walk,
    Bus,
    Tram,
    Subway,
    Train,
    Ferry,
    Other,
}

impl TransportMode {
    /// Map an upstream mode label to a mode.
    ///
    /// Matching ignores case and surrounding whitespace. Never fails.
    pub fn from_upstream(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "WALK" => TransportMode::Walk,
            "BUS" | "COACH" | "TROLLEYBUS" => TransportMode::Bus,
            "TRAM" => TransportMode::Tram,
            "SUBWAY" | "METRO" => TransportMode::Subway,
            "TRAIN" | "RAIL" => TransportMode::Train,
            "FERRY" => TransportMode::Ferry,
            _ => TransportMode::Other,
        }
    }

    /// The label used in responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Walk => "WALK",
            TransportMode::Bus => "BUS",
            TransportMode::Tram => "TRAM",
            TransportMode::Subway => "SUBWAY",
            TransportMode::Train => "TRAIN",
            TransportMode::Ferry => "FERRY",
            TransportMode::Other => "OTHER",
        }
    }

    /// Walking legs never carry a route label.
    pub fn is_walk(&self) -> bool {
        matches!(self, TransportMode::Walk)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels() {
        assert_eq!(TransportMode::from_upstream("WALK"), TransportMode::Walk);
        assert_eq!(TransportMode::from_upstream("BUS"), TransportMode::Bus);
        assert_eq!(TransportMode::from_upstream("TRAM"), TransportMode::Tram);
        assert_eq!(TransportMode::from_upstream("SUBWAY"), TransportMode::Subway);
        assert_eq!(TransportMode::from_upstream("RAIL"), TransportMode::Train);
        assert_eq!(TransportMode::from_upstream("TRAIN"), TransportMode::Train);
        assert_eq!(TransportMode::from_upstream("FERRY"), TransportMode::Ferry);
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        assert_eq!(TransportMode::from_upstream(" bus "), TransportMode::Bus);
        assert_eq!(TransportMode::from_upstream("Tram"), TransportMode::Tram);
    }

    #[test]
    fn unknown_labels_fall_back_to_other() {
        assert_eq!(TransportMode::from_upstream("BICYCLE"), TransportMode::Other);
        assert_eq!(TransportMode::from_upstream("AIRPLANE"), TransportMode::Other);
        assert_eq!(TransportMode::from_upstream(""), TransportMode::Other);
    }

    #[test]
    fn serializes_as_upper_case_label() {
        let json = serde_json::to_string(&TransportMode::Subway).unwrap();
        assert_eq!(json, "\"SUBWAY\"");
        assert_eq!(TransportMode::Other.to_string(), "OTHER");
    }
}
