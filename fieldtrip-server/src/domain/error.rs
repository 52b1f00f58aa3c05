//! Domain error types.
//!
//! These errors represent validation failures in planner or datastore
//! data. They are distinct from API/IO errors.

use super::{InvalidTripId, Mode};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Invalid leg construction (e.g., ends before it starts)
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Transit leg without a trip to ride
    #[error("{0} leg has no transit trip")]
    MissingTrip(Mode),

    /// Itinerary has no legs
    #[error("itinerary must have at least one leg")]
    EmptyItinerary,

    /// Leg starts before the previous one ends
    #[error("legs {0} and {1} overlap in time")]
    OverlappingLegs(usize, usize),

    #[error(transparent)]
    InvalidTripId(#[from] InvalidTripId),
}
