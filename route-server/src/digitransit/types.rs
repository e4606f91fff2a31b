//! Digitransit GraphQL response DTOs.
//!
//! These types map directly to the JSON the routing API returns. They use
//! `Option` liberally because Digitransit sends `null` for absent objects
//! (walking legs have no route, places off the stop network have no stop)
//! and older and newer API versions differ in which fields they fill.

use serde::Deserialize;
use serde_json::Value;

/// GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    /// Query result (absent when the whole query failed).
    pub data: Option<T>,

    /// Query errors; a non-empty list means the call failed.
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

/// A single GraphQL error.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// `data` of the stop search query.
#[derive(Debug, Clone, Deserialize)]
pub struct StopsData {
    pub stops: Option<Vec<StopDto>>,
}

/// A stop candidate from the stop search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDto {
    /// GTFS identifier, e.g. `HSL:2222234`.
    pub gtfs_id: Option<String>,

    /// Stop name.
    pub name: Option<String>,

    /// Latitude (WGS84).
    pub lat: Option<f64>,

    /// Longitude (WGS84).
    pub lon: Option<f64>,
}

/// `data` of the itinerary search query.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanData {
    pub plan: Option<PlanDto>,
}

/// The itinerary search result.
///
/// Itineraries stay undecoded here. Each one is decoded into an
/// [`ItineraryDto`] on its own during normalization, so a badly shaped
/// entry is dropped without losing the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanDto {
    /// Candidate itineraries in upstream ranking order.
    #[serde(default)]
    pub itineraries: Option<Vec<Value>>,
}

/// One candidate itinerary.
///
/// Only the legs are read; itinerary-level times are derived from them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItineraryDto {
    /// Legs in travel order.
    #[serde(default)]
    pub legs: Option<Vec<LegDto>>,
}

/// One leg of an itinerary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDto {
    /// Mode label, e.g. `BUS`, `RAIL`, `WALK`. Open vocabulary.
    pub mode: Option<String>,

    /// Departure time.
    pub start_time: Option<Timestamp>,

    /// Arrival time.
    pub end_time: Option<Timestamp>,

    /// Where the leg starts.
    pub from: Option<PlaceDto>,

    /// Where the leg ends.
    pub to: Option<PlaceDto>,

    /// The transit route ridden (absent for walks).
    pub route: Option<RouteDto>,

    /// The trip ridden (absent for walks).
    pub trip: Option<TripDto>,
}

/// A leg endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaceDto {
    /// Place name (present for both stops and free-standing places).
    pub name: Option<String>,

    /// The stop, if the place is on the stop network.
    pub stop: Option<PlaceStopDto>,
}

/// A stop referenced from a leg endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceStopDto {
    pub gtfs_id: Option<String>,
    pub name: Option<String>,
}

/// A transit route (line).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    /// Line number, e.g. `550`.
    pub short_name: Option<String>,

    /// Descriptive name, e.g. `Itäkeskus - Westendinasema`.
    pub long_name: Option<String>,
}

/// A trip on a route.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TripDto {
    pub route: Option<RouteDto>,
}

/// A point in time as sent upstream.
///
/// The v1 API sends epoch milliseconds; newer schemas send ISO-8601 strings.
/// Both are accepted and normalized during conversion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// Milliseconds since the Unix epoch, sent as a JSON float.
    EpochMillisFloat(f64),
    /// ISO-8601 text, with or without an offset.
    Text(String),
    /// Anything else; rejected during conversion rather than failing the
    /// whole response.
    Unrecognized(Value),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_stops_response() {
        let json = r#"{
            "data": {
                "stops": [
                    { "gtfsId": "HSL:1010101", "name": "Aalto Yliopisto", "lat": 60.18456, "lon": 24.82928 },
                    { "gtfsId": "HSL:1010102", "name": "Aalto-yliopiston metroasema", "lat": null, "lon": null }
                ]
            }
        }"#;

        let response: GraphQlResponse<StopsData> = serde_json::from_str(json).unwrap();
        let stops = response.data.unwrap().stops.unwrap();

        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].gtfs_id.as_deref(), Some("HSL:1010101"));
        assert_eq!(stops[0].name.as_deref(), Some("Aalto Yliopisto"));
        assert_eq!(stops[1].lat, None);
        assert!(response.errors.is_none());
    }

    #[test]
    fn deserialize_plan_response() {
        let json = r#"{
            "data": {
                "plan": {
                    "itineraries": [
                        {
                            "startTime": 1701410400000,
                            "endTime": 1701411720000,
                            "duration": 1320,
                            "legs": [
                                {
                                    "mode": "BUS",
                                    "startTime": 1701410400000,
                                    "endTime": 1701411720000,
                                    "duration": 1320.0,
                                    "from": { "name": "Aalto Yliopisto", "stop": { "gtfsId": "HSL:1010101", "name": "Aalto Yliopisto" } },
                                    "to": { "name": "Keilaniemi", "stop": { "gtfsId": "HSL:2020201", "name": "Keilaniemi" } },
                                    "route": { "shortName": "550", "longName": "Bus 550" },
                                    "trip": { "route": { "shortName": "550" } }
                                }
                            ]
                        }
                    ]
                }
            }
        }"#;

        let response: GraphQlResponse<PlanData> = serde_json::from_str(json).unwrap();
        let itineraries = response.data.unwrap().plan.unwrap().itineraries.unwrap();

        assert_eq!(itineraries.len(), 1);
        let itinerary = ItineraryDto::deserialize(&itineraries[0]).unwrap();
        let leg = &itinerary.legs.as_ref().unwrap()[0];
        assert_eq!(leg.mode.as_deref(), Some("BUS"));
        assert_eq!(leg.start_time, Some(Timestamp::EpochMillis(1701410400000)));
        assert_eq!(
            leg.route.as_ref().unwrap().short_name.as_deref(),
            Some("550")
        );
    }

    #[test]
    fn deserialize_walk_leg_with_nulls() {
        let json = r#"{
            "mode": "WALK",
            "startTime": "2024-12-01T08:10:00+02:00",
            "endTime": "2024-12-01T08:15:00+02:00",
            "duration": 300.0,
            "from": { "name": "Origin", "stop": null },
            "to": { "name": "Aalto Yliopisto", "stop": { "gtfsId": "HSL:1", "name": "Aalto Yliopisto" } },
            "route": null,
            "trip": null
        }"#;

        let leg: LegDto = serde_json::from_str(json).unwrap();
        assert_eq!(
            leg.start_time,
            Some(Timestamp::Text("2024-12-01T08:10:00+02:00".to_string()))
        );
        assert!(leg.route.is_none());
        assert!(leg.from.unwrap().stop.is_none());
    }

    #[test]
    fn deserialize_errors_envelope() {
        let json = r#"{ "data": null, "errors": [ { "message": "Validation error" } ] }"#;
        let response: GraphQlResponse<PlanData> = serde_json::from_str(json).unwrap();

        assert!(response.data.is_none());
        assert_eq!(response.errors.unwrap()[0].message, "Validation error");
    }

    #[test]
    fn missing_optional_fields_tolerated() {
        let json = r#"{ "legs": [ {} ] }"#;
        let itinerary: ItineraryDto = serde_json::from_str(json).unwrap();
        let legs = itinerary.legs.unwrap();

        assert_eq!(legs.len(), 1);
        assert!(legs[0].mode.is_none());
        assert!(legs[0].start_time.is_none());
    }

    #[test]
    fn odd_timestamp_does_not_fail_leg() {
        let json = r#"{ "mode": "BUS", "startTime": 1.5, "endTime": true }"#;
        let leg: LegDto = serde_json::from_str(json).unwrap();

        assert_eq!(leg.start_time, Some(Timestamp::EpochMillisFloat(1.5)));
        assert!(matches!(leg.end_time, Some(Timestamp::Unrecognized(_))));
    }

    #[test]
    fn float_epoch_millis() {
        let json = r#"{ "startTime": 1733034000000.0, "endTime": 1733035020000 }"#;
        let leg: LegDto = serde_json::from_str(json).unwrap();

        assert_eq!(leg.start_time, Some(Timestamp::EpochMillisFloat(1733034000000.0)));
        assert_eq!(leg.end_time, Some(Timestamp::EpochMillis(1733035020000)));
    }

    #[test]
    fn badly_typed_itinerary_does_not_fail_response() {
        let json = r#"{
            "data": {
                "plan": {
                    "itineraries": [
                        { "legs": [ { "mode": 7, "from": "A" } ] },
                        { "legs": [ { "mode": "BUS" } ] }
                    ]
                }
            }
        }"#;

        let response: GraphQlResponse<PlanData> = serde_json::from_str(json).unwrap();
        let itineraries = response.data.unwrap().plan.unwrap().itineraries.unwrap();

        assert_eq!(itineraries.len(), 2);
        assert!(ItineraryDto::deserialize(&itineraries[0]).is_err());
        assert!(ItineraryDto::deserialize(&itineraries[1]).is_ok());
    }
}
