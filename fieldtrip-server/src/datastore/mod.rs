//! Field trip datastore client.
//!
//! The datastore keeps saved field trips (a group plan's query plus its
//! itineraries and the transit trips they ride) and schools' field trip
//! requests. Itinerary bodies are stored compressed; see [`codec`].

pub mod codec;
mod client;
mod convert;
mod error;
mod types;

pub use client::{DatastoreClient, DatastoreConfig, TripDirection};
pub use codec::CodecError;
pub use convert::{banned_segments, stored_plan};
pub use error::DatastoreError;
pub use types::{FieldTripDto, FieldTripRequestDto, GroupItineraryDto, GtfsTripDto};
