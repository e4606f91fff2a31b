//! Per-itinerary data-quality findings.
//!
//! A diagnostic records why one upstream itinerary was dropped. It never
//! fails the request; the rest of the batch is still returned.

use crate::digitransit::ConversionError;
use crate::domain::ArrivalConstraint;

/// Why an itinerary was discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosticReason {
    /// The itinerary could not be turned into a valid route
    #[error(transparent)]
    Malformed(#[from] ConversionError),

    /// The itinerary arrives after the requested deadline
    #[error("arrives at {arrival}, after the requested {deadline}")]
    ArrivesTooLate {
        arrival: String,
        deadline: ArrivalConstraint,
    },
}

/// A discarded itinerary and the reason it was discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("itinerary {index} discarded: {reason}")]
pub struct ParsingDiagnostic {
    /// Position of the itinerary in the upstream response.
    pub index: usize,
    pub reason: DiagnosticReason,
}

impl ParsingDiagnostic {
    pub fn new(index: usize, reason: impl Into<DiagnosticReason>) -> Self {
        Self {
            index,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let diag = ParsingDiagnostic::new(2, ConversionError::NoLegs);
        assert_eq!(diag.to_string(), "itinerary 2 discarded: itinerary has no legs");

        let diag = ParsingDiagnostic::new(
            0,
            DiagnosticReason::ArrivesTooLate {
                arrival: "2024-12-01 08:50:00".into(),
                deadline: ArrivalConstraint::parse("20241201084500").unwrap(),
            },
        );
        assert_eq!(
            diag.to_string(),
            "itinerary 0 discarded: arrives at 2024-12-01 08:50:00, after the requested 20241201084500"
        );
    }
}
