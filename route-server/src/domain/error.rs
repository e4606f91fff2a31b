//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from API/IO errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A leg's timing runs backwards
    #[error("leg arrives ({arrival}) before it departs ({departure})")]
    ArrivesBeforeDeparture { departure: String, arrival: String },

    /// Invalid leg or route construction
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Consecutive legs don't meet at the same stop
    #[error("legs are not contiguous: one ends at {to:?}, the next starts at {from:?}")]
    LegsNotContiguous { to: String, from: String },

    /// Route has no legs
    #[error("route must have at least one leg")]
    EmptyRoute,
}
