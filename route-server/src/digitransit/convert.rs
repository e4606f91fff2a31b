//! Conversion from Digitransit DTOs to domain types.
//!
//! Each itinerary converts independently: a bad itinerary yields a
//! `ConversionError` for the caller to record, never a failure of the whole
//! response.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{DomainError, Leg, Route, StopMatch, TransportMode};

use super::types::{ItineraryDto, LegDto, PlaceDto, StopDto, Timestamp};

/// Largest magnitude of float epoch millis accepted; beyond this `f64` no
/// longer holds every integer exactly.
const MAX_FLOAT_MILLIS: f64 = 9_007_199_254_740_992.0;

/// Naive ISO-8601 layouts accepted when a timestamp carries no offset.
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Itinerary has no legs
    #[error("itinerary has no legs")]
    NoLegs,

    /// Missing required field
    #[error("leg {leg}: missing required field: {field}")]
    MissingField { leg: usize, field: &'static str },

    /// Failed to interpret a timestamp
    #[error("leg {leg}: invalid {field} timestamp: {value}")]
    InvalidTimestamp {
        leg: usize,
        field: &'static str,
        value: String,
    },

    /// The itinerary JSON does not have the expected shape
    #[error("itinerary is not well-formed: {0}")]
    Undecodable(String),

    /// A leg or the assembled route broke a domain invariant
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Convert a stop candidate, dropping candidates without an id or name.
pub fn convert_stop(dto: &StopDto) -> Option<StopMatch> {
    let id = dto.gtfs_id.as_deref()?;
    let name = dto.name.as_deref()?;
    StopMatch::new(id, name).ok()
}

/// Decode and convert one raw upstream itinerary.
///
/// A shape mismatch anywhere in the itinerary, such as a number where a
/// mode label belongs, is an `Undecodable` error for this itinerary only.
pub fn convert_raw_itinerary(raw: &Value, tz: Tz) -> Result<Route, ConversionError> {
    let dto = ItineraryDto::deserialize(raw)
        .map_err(|e| ConversionError::Undecodable(e.to_string()))?;
    convert_itinerary(&dto, tz)
}

/// Convert one upstream itinerary to a route.
///
/// Legs keep upstream order. Timing and contiguity are validated by the
/// domain constructors.
pub fn convert_itinerary(dto: &ItineraryDto, tz: Tz) -> Result<Route, ConversionError> {
    let raw_legs = dto.legs.as_deref().unwrap_or(&[]);
    if raw_legs.is_empty() {
        return Err(ConversionError::NoLegs);
    }

    let legs = raw_legs
        .iter()
        .enumerate()
        .map(|(i, leg)| convert_leg(i, leg, tz))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route::new(legs)?)
}

/// Convert a single leg.
fn convert_leg(index: usize, dto: &LegDto, tz: Tz) -> Result<Leg, ConversionError> {
    let mode = dto
        .mode
        .as_deref()
        .map(TransportMode::from_upstream)
        .unwrap_or(TransportMode::Other);

    let departure = required_time(index, "startTime", dto.start_time.as_ref(), tz)?;
    let arrival = required_time(index, "endTime", dto.end_time.as_ref(), tz)?;

    let from = place_name(dto.from.as_ref()).ok_or(ConversionError::MissingField {
        leg: index,
        field: "from.name",
    })?;
    let to = place_name(dto.to.as_ref()).ok_or(ConversionError::MissingField {
        leg: index,
        field: "to.name",
    })?;

    Ok(Leg::new(
        mode,
        route_label(dto),
        from,
        to,
        departure,
        arrival,
    )?)
}

/// Parse a required leg timestamp.
fn required_time(
    leg: usize,
    field: &'static str,
    value: Option<&Timestamp>,
    tz: Tz,
) -> Result<DateTime<Tz>, ConversionError> {
    let value = value.ok_or(ConversionError::MissingField { leg, field })?;
    parse_timestamp(value, tz).ok_or_else(|| ConversionError::InvalidTimestamp {
        leg,
        field,
        value: describe(value),
    })
}

/// Normalize an upstream timestamp into the transit region's time zone.
///
/// Accepts epoch milliseconds (an integer, a whole-valued float, or a
/// string of digits), RFC 3339 text with an offset, and naive ISO-8601 text.
/// Naive text is read as region-local time, taking the earlier instant if
/// the wall-clock time is ambiguous.
pub fn parse_timestamp(value: &Timestamp, tz: Tz) -> Option<DateTime<Tz>> {
    match value {
        Timestamp::EpochMillis(ms) => tz.timestamp_millis_opt(*ms).single(),
        Timestamp::EpochMillisFloat(ms) => {
            if ms.fract() != 0.0 || ms.abs() > MAX_FLOAT_MILLIS {
                return None;
            }
            tz.timestamp_millis_opt(*ms as i64).single()
        }
        Timestamp::Text(text) => {
            let text = text.trim();

            if let Ok(ms) = text.parse::<i64>() {
                return tz.timestamp_millis_opt(ms).single();
            }

            if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                return Some(dt.with_timezone(&tz));
            }

            NAIVE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
                .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        }
        Timestamp::Unrecognized(_) => None,
    }
}

/// Endpoint name: the stop's name, else the place's name.
fn place_name(place: Option<&PlaceDto>) -> Option<String> {
    let place = place?;
    place
        .stop
        .as_ref()
        .and_then(|stop| non_blank(stop.name.as_deref()))
        .or_else(|| non_blank(place.name.as_deref()))
        .map(str::to_string)
}

/// Route label: route short name, else the trip's route short name, else
/// the route's long name.
fn route_label(dto: &LegDto) -> Option<String> {
    let route = dto.route.as_ref();
    let trip_route = dto.trip.as_ref().and_then(|trip| trip.route.as_ref());

    route
        .and_then(|r| non_blank(r.short_name.as_deref()))
        .or_else(|| trip_route.and_then(|r| non_blank(r.short_name.as_deref())))
        .or_else(|| route.and_then(|r| non_blank(r.long_name.as_deref())))
        .map(str::to_string)
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn describe(value: &Timestamp) -> String {
    match value {
        Timestamp::EpochMillis(ms) => ms.to_string(),
        Timestamp::EpochMillisFloat(ms) => ms.to_string(),
        Timestamp::Text(text) => text.clone(),
        Timestamp::Unrecognized(raw) => raw.to_string(),
    }
}
