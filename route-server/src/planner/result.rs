//! Route query results.

use crate::domain::{ArrivalConstraint, Route};

use super::ParsingDiagnostic;

/// Echo of the normalized request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEcho {
    /// Origin stop name.
    pub from: String,
    /// Destination stop name.
    pub to: String,
    /// The requested deadline.
    pub arrival_time: ArrivalConstraint,
}

/// Result of a route query.
///
/// `routes` keeps upstream ranking order and may be empty; an empty list is
/// the "no itineraries found" outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResult {
    /// Surviving routes.
    pub routes: Vec<Route>,

    /// The request this result answers.
    pub query: QueryEcho,

    /// Itineraries that were dropped, and why. Not part of the response
    /// contract.
    pub diagnostics: Vec<ParsingDiagnostic>,
}

impl RouteResult {
    /// Replace the query echo.
    pub fn with_query(mut self, query: QueryEcho) -> Self {
        self.query = query;
        self
    }

    /// Returns true if no route survived.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
