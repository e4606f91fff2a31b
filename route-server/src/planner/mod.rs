//! Route planning over an upstream journey planner.
//!
//! This module answers: "which stops do these names mean, and how do I get
//! from one to the other by this time?" The upstream does the pathfinding;
//! this layer validates input, resolves stops, builds the arrive-by query
//! and normalizes what comes back into routes that are guaranteed
//! well-formed.

mod backend;
mod config;
mod diagnostic;
mod error;
mod itinerary;
mod resolver;
mod result;
mod service;


pub(crate) use backend::call_upstream;
pub use backend::{ItineraryQuery, PlannerBackend};
pub use config::{PlannerConfig, StopSelection};
pub use diagnostic::{DiagnosticReason, ParsingDiagnostic};
pub use error::PlanError;
pub use itinerary::{ItineraryPlanner, normalize_itineraries};
pub use resolver::{StopResolver, select_stop};
pub use result::{QueryEcho, RouteResult};
pub use service::RoutePlanner;
