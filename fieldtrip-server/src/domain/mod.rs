//! Domain types for the field trip planner.
//!
//! This module contains the validated model of itineraries, the transit
//! segments they ride, and group plans built from them. Types enforce their
//! invariants at construction, so code that receives them can trust their
//! validity.

mod banned;
mod error;
mod group_plan;
pub(crate) mod itinerary;
mod leg;
mod mode;
mod query;
mod trip_id;

pub use banned::{BanScope, BannedSegment, BannedSegments};
pub use error::DomainError;
pub use group_plan::{GroupItinerary, GroupPlan};
pub use itinerary::Itinerary;
pub use leg::{Leg, Place, TransitLeg, TransitRide};
pub use mode::{Mode, ModeCapacities, UnknownMode};
pub use query::PlanQuery;
pub use trip_id::{InvalidTripId, TripId};
