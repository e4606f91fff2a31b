//! GraphQL documents and variables for the routing API.

use serde_json::{Value, json};

use crate::planner::ItineraryQuery;

/// Stop search by (partial) name.
pub const FIND_STOPS_QUERY: &str = r#"
query FindStops($name: String!) {
  stops(name: $name) {
    gtfsId
    name
    lat
    lon
  }
}
"#;

/// Arrive-by itinerary search between two stops.
pub const PLAN_QUERY: &str = r#"
query PlanRoute($from: String!, $to: String!, $date: String!, $time: String!, $arriveBy: Boolean!, $numItineraries: Int!) {
  plan(
    from: {stop: $from}
    to: {stop: $to}
    date: $date
    time: $time
    arriveBy: $arriveBy
    numItineraries: $numItineraries
    transportModes: [
      {mode: BUS}
      {mode: RAIL}
      {mode: TRAM}
      {mode: SUBWAY}
      {mode: FERRY}
      {mode: WALK}
    ]
  ) {
    itineraries {
      startTime
      endTime
      duration
      legs {
        mode
        startTime
        endTime
        duration
        from {
          name
          stop {
            gtfsId
            name
          }
        }
        to {
          name
          stop {
            gtfsId
            name
          }
        }
        route {
          shortName
          longName
        }
        trip {
          route {
            shortName
          }
        }
      }
    }
  }
}
"#;

/// Variables for [`FIND_STOPS_QUERY`].
pub fn stop_variables(name: &str) -> Value {
    json!({ "name": name })
}

/// Variables for [`PLAN_QUERY`].
///
/// The deadline is sent as region-local date and time with `arriveBy` set,
/// so the upstream searches backwards from the arrival.
pub fn plan_variables(query: &ItineraryQuery) -> Value {
    json!({
        "from": query.from_id,
        "to": query.to_id,
        "date": query.arrival.date_param(),
        "time": query.arrival.time_param(),
        "arriveBy": true,
        "numItineraries": query.num_itineraries,
    })
}
