//! Domain types for the route planner.
//!
//! This module contains the core domain model types that represent
//! validated itinerary data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod error;
mod leg;
mod mode;
mod route;
mod stop;
mod time;

pub use error::DomainError;
pub use leg::Leg;
pub use mode::TransportMode;
pub use route::Route;
pub use stop::{InvalidStop, StopMatch, names_match, normalize_name};
pub use time::{ArrivalConstraint, TimeError, format_time_of_day};
