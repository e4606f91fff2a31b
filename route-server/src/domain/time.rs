//! Arrival-time handling.
//!
//! Callers supply the deadline as a fixed 14-character `yyyyMMddHHmmss`
//! string. It is always a wall-clock time in the service's transit region;
//! the region is configuration, never derived from the input.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::fmt;

/// Length of the `yyyyMMddHHmmss` format.
const ARRIVAL_FORMAT_LEN: usize = 14;

/// Error returned when parsing an invalid arrival time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid arrival time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// The caller's deadline: every returned route must arrive no later than this.
///
/// # Examples
///
/// ```
/// use route_server::domain::ArrivalConstraint;
///
/// let arrival = ArrivalConstraint::parse("20241201084500").unwrap();
/// assert_eq!(arrival.to_string(), "20241201084500");
/// assert_eq!(arrival.date_param(), "2024-12-01");
/// assert_eq!(arrival.time_param(), "08:45:00");
///
/// assert!(ArrivalConstraint::parse("2024120108450").is_err());
/// assert!(ArrivalConstraint::parse("20241301084500").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrivalConstraint(NaiveDateTime);

impl ArrivalConstraint {
    /// Parse from `yyyyMMddHHmmss`.
    ///
    /// The input must be exactly 14 ASCII digits forming a valid calendar
    /// date and time of day.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();

        if bytes.len() != ARRIVAL_FORMAT_LEN {
            return Err(TimeError::new("expected yyyyMMddHHmmss (14 digits)"));
        }

        if !bytes.iter().all(u8::is_ascii_digit) {
            return Err(TimeError::new("expected digits only"));
        }

        let year = parse_digits(&bytes[0..4]) as i32;
        let month = parse_digits(&bytes[4..6]);
        let day = parse_digits(&bytes[6..8]);
        let hour = parse_digits(&bytes[8..10]);
        let minute = parse_digits(&bytes[10..12]);
        let second = parse_digits(&bytes[12..14]);

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| TimeError::new("not a calendar date"))?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or_else(|| TimeError::new("not a time of day"))?;

        Ok(Self(date.and_time(time)))
    }

    /// The region-local wall-clock deadline.
    pub fn local(&self) -> NaiveDateTime {
        self.0
    }

    /// Date in the `YYYY-MM-DD` form the upstream planner expects.
    pub fn date_param(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Time in the `HH:MM:SS` form the upstream planner expects.
    pub fn time_param(&self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }

    /// Returns true if `instant`, viewed in the deadline's region, is not later
    /// than the deadline.
    pub fn admits<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        instant.naive_local() <= self.0
    }
}

impl fmt::Display for ArrivalConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d%H%M%S"))
    }
}

/// Format the time-of-day part of a region-local instant as `HH:MM:SS`.
pub fn format_time_of_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    instant.format("%H:%M:%S").to_string()
}

/// Parse a run of ASCII digits already checked by the caller.
fn parse_digits(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}
