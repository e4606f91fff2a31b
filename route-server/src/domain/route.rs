//! Route types.
//!
//! A `Route` is one complete itinerary: an ordered, contiguous run of legs
//! from the origin stop to the destination stop.

use chrono::DateTime;
use chrono_tz::Tz;

use super::{DomainError, Leg, names_match};

/// A complete itinerary.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect: `legs[i].to()` matches `legs[i + 1].from()`
///   after name normalization
/// - Departure and arrival are the first leg's departure and the last leg's
///   arrival
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    legs: Vec<Leg>,
    departure: DateTime<Tz>,
    arrival: DateTime<Tz>,
}

impl Route {
    /// Constructs a route from validated legs.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - The legs list is empty
    /// - A leg ends somewhere other than where the next one starts
    /// - The route would finish before it starts
    ///
    /// # Examples
    ///
    /// ```
    /// use route_server::domain::{Leg, Route, TransportMode};
    /// use chrono::TimeZone;
    /// use chrono_tz::Europe::Helsinki;
    ///
    /// let t = |h, m| Helsinki.with_ymd_and_hms(2024, 12, 1, h, m, 0).unwrap();
    ///
    /// let walk = Leg::new(TransportMode::Walk, None, "Otaniemi".into(), "Aalto Yliopisto".into(), t(8, 10), t(8, 15)).unwrap();
    /// let metro = Leg::new(TransportMode::Subway, Some("M1".into()), "Aalto Yliopisto".into(), "Keilaniemi".into(), t(8, 17), t(8, 19)).unwrap();
    ///
    /// let route = Route::new(vec![walk, metro]).unwrap();
    /// assert_eq!(route.total_duration_seconds(), 540);
    /// assert_eq!(route.leg_count(), 2);
    /// ```
    pub fn new(legs: Vec<Leg>) -> Result<Self, DomainError> {
        let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
            return Err(DomainError::EmptyRoute);
        };
        let departure = first.departure();
        let arrival = last.arrival();

        for window in legs.windows(2) {
            let prev = &window[0];
            let next = &window[1];
            if !names_match(prev.to(), next.from()) {
                return Err(DomainError::LegsNotContiguous {
                    to: prev.to().to_string(),
                    from: next.from().to_string(),
                });
            }
        }

        if arrival < departure {
            return Err(DomainError::InvalidLeg("route arrives before it departs"));
        }

        Ok(Self {
            legs,
            departure,
            arrival,
        })
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Departure from the origin (first leg).
    pub fn departure_time(&self) -> DateTime<Tz> {
        self.departure
    }

    /// Arrival at the destination (last leg).
    pub fn arrival_time(&self) -> DateTime<Tz> {
        self.arrival
    }

    /// Seconds from first departure to final arrival, waits included.
    pub fn total_duration_seconds(&self) -> u64 {
        self.arrival
            .signed_duration_since(self.departure)
            .num_seconds()
            .max(0) as u64
    }

    /// Origin stop name.
    pub fn origin(&self) -> &str {
        self.legs[0].from()
    }

    /// Destination stop name.
    pub fn destination(&self) -> &str {
        self.legs[self.legs.len() - 1].to()
    }
}
