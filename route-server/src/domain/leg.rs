//! Leg type.
//!
//! A `Leg` is one unbroken segment of travel: a ride on a single vehicle,
//! or a walk. Times are region-local instants so durations stay exact
//! across daylight-saving changes.

use chrono::DateTime;
use chrono_tz::Tz;

use super::{DomainError, TransportMode, format_time_of_day};

/// One segment of a route.
///
/// # Invariants
///
/// - `arrival >= departure`
/// - Walking legs carry no route label
/// - Endpoint names are non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    mode: TransportMode,
    route_label: Option<String>,
    from: String,
    to: String,
    departure: DateTime<Tz>,
    arrival: DateTime<Tz>,
}

impl Leg {
    /// Construct a leg, validating its timing and endpoints.
    ///
    /// A route label on a walking leg is dropped, as are blank labels.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the leg arrives before it departs or either endpoint
    /// name is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_server::domain::{Leg, TransportMode};
    /// use chrono::TimeZone;
    /// use chrono_tz::Europe::Helsinki;
    ///
    /// let dep = Helsinki.with_ymd_and_hms(2024, 12, 1, 8, 20, 0).unwrap();
    /// let arr = Helsinki.with_ymd_and_hms(2024, 12, 1, 8, 42, 0).unwrap();
    ///
    /// let leg = Leg::new(
    ///     TransportMode::Bus,
    ///     Some("550".into()),
    ///     "Aalto Yliopisto".into(),
    ///     "Keilaniemi".into(),
    ///     dep,
    ///     arr,
    /// )
    /// .unwrap();
    /// assert_eq!(leg.duration_seconds(), 1320);
    ///
    /// // Arriving before departing is rejected
    /// assert!(Leg::new(TransportMode::Bus, None, "A".into(), "B".into(), arr, dep).is_err());
    /// ```
    pub fn new(
        mode: TransportMode,
        route_label: Option<String>,
        from: String,
        to: String,
        departure: DateTime<Tz>,
        arrival: DateTime<Tz>,
    ) -> Result<Self, DomainError> {
        if arrival < departure {
            return Err(DomainError::ArrivesBeforeDeparture {
                departure: format_time_of_day(&departure),
                arrival: format_time_of_day(&arrival),
            });
        }

        if from.trim().is_empty() || to.trim().is_empty() {
            return Err(DomainError::InvalidLeg("endpoint names must not be empty"));
        }

        let route_label = if mode.is_walk() {
            None
        } else {
            route_label.filter(|label| !label.trim().is_empty())
        };

        Ok(Self {
            mode,
            route_label,
            from,
            to,
            departure,
            arrival,
        })
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    /// Line number or name, absent for walks and unlabelled vehicles.
    pub fn route_label(&self) -> Option<&str> {
        self.route_label.as_deref()
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn departure(&self) -> DateTime<Tz> {
        self.departure
    }

    pub fn arrival(&self) -> DateTime<Tz> {
        self.arrival
    }

    /// Whole seconds between departure and arrival (never negative).
    pub fn duration_seconds(&self) -> u64 {
        self.arrival
            .signed_duration_since(self.departure)
            .num_seconds()
            .max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Helsinki;

    fn at(h: u32, m: u32) -> DateTime<Tz> {
        Helsinki.with_ymd_and_hms(2024, 12, 1, h, m, 0).unwrap()
    }

    #[test]
    fn valid_leg() {
        let leg = Leg::new(
            TransportMode::Tram,
            Some("15".into()),
            "Keilaniemi".into(),
            "Otaniemi".into(),
            at(8, 0),
            at(8, 12),
        )
        .unwrap();

        assert_eq!(leg.mode(), TransportMode::Tram);
        assert_eq!(leg.route_label(), Some("15"));
        assert_eq!(leg.from(), "Keilaniemi");
        assert_eq!(leg.to(), "Otaniemi");
        assert_eq!(leg.duration_seconds(), 720);
    }

    #[test]
    fn zero_length_leg_allowed() {
        let leg = Leg::new(
            TransportMode::Walk,
            None,
            "A".into(),
            "B".into(),
            at(8, 0),
            at(8, 0),
        )
        .unwrap();
        assert_eq!(leg.duration_seconds(), 0);
    }

    #[test]
    fn reject_arrival_before_departure() {
        let err = Leg::new(
            TransportMode::Bus,
            Some("550".into()),
            "A".into(),
            "B".into(),
            at(8, 30),
            at(8, 10),
        )
        .unwrap_err();

        assert_eq!(
            err,
            DomainError::ArrivesBeforeDeparture {
                departure: "08:30:00".into(),
                arrival: "08:10:00".into(),
            }
        );
    }

    #[test]
    fn reject_blank_endpoint() {
        assert!(
            Leg::new(TransportMode::Bus, None, " ".into(), "B".into(), at(8, 0), at(8, 5))
                .is_err()
        );
    }

    #[test]
    fn walk_drops_route_label() {
        let leg = Leg::new(
            TransportMode::Walk,
            Some("550".into()),
            "A".into(),
            "B".into(),
            at(8, 0),
            at(8, 5),
        )
        .unwrap();
        assert_eq!(leg.route_label(), None);
    }

    #[test]
    fn blank_label_dropped() {
        let leg = Leg::new(
            TransportMode::Bus,
            Some("".into()),
            "A".into(),
            "B".into(),
            at(8, 0),
            at(8, 5),
        )
        .unwrap();
        assert_eq!(leg.route_label(), None);
    }

    #[test]
    fn duration_across_dst_change() {
        // Clocks go back at 04:00 on 2024-10-27 in Helsinki
        let dep = Helsinki.with_ymd_and_hms(2024, 10, 27, 2, 30, 0).unwrap();
        let arr = Helsinki.with_ymd_and_hms(2024, 10, 27, 5, 0, 0).unwrap();
        let leg = Leg::new(TransportMode::Bus, None, "A".into(), "B".into(), dep, arr).unwrap();
        assert_eq!(leg.duration_seconds(), 3 * 3600 + 30 * 60);
    }
}
