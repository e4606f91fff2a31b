//! Route planning server.
//!
//! An HTTP service that answers: "how do I get from this stop to that one,
//! arriving no later than this time?" Pathfinding is delegated to the
//! Digitransit journey planner; this crate resolves stop names, builds the
//! arrive-by query and returns only well-formed routes that meet the
//! deadline.

pub mod cache;
pub mod config;
pub mod digitransit;
pub mod domain;
pub mod planner;
pub mod web;
