//! Field trip planning service.
//!
//! Ties the group planner to the datastore: plans avoid vehicles already
//! booked by other trips that day, finished plans are saved as trips, and
//! school requests are turned into planning queries.

mod error;
mod service;

pub use error::FieldTripError;
pub use service::{DEFAULT_GROUP_SIZE, FieldTripService, request_query};
