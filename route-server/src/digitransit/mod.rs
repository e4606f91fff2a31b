//! Digitransit routing API client.
//!
//! This module provides an HTTP client for the Digitransit journey
//! planner, the upstream service that owns all pathfinding.
//!
//! Key characteristics of Digitransit:
//! - A single GraphQL endpoint per region; all calls are `POST`s
//! - Stops are identified by GTFS ids such as `HSL:2222234`
//! - Times arrive as epoch milliseconds in the v1 schema and as ISO-8601
//!   strings in newer ones
//! - Mode labels are an open vocabulary (`BUS`, `RAIL`, `SUBWAY`, ...)

mod client;
mod convert;
mod error;
mod mock;
mod query;
mod types;

pub use client::{DEFAULT_BASE_URL, DigitransitClient, DigitransitConfig};
pub use convert::{
    ConversionError, convert_itinerary, convert_raw_itinerary, convert_stop, parse_timestamp,
};
pub use error::DigitransitError;
pub use mock::MockDigitransitClient;
pub use query::{FIND_STOPS_QUERY, PLAN_QUERY, plan_variables, stop_variables};
pub use types::{
    GraphQlError, GraphQlResponse, ItineraryDto, LegDto, PlaceDto, PlaceStopDto, PlanData,
    PlanDto, RouteDto, StopDto, StopsData, TripDto, Timestamp,
};
