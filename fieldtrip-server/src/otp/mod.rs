//! Trip planner client.
//!
//! This module provides an HTTP client for an OpenTripPlanner-style `/plan`
//! endpoint, which returns itineraries as JSON.
//!
//! Key characteristics of the planner:
//! - Times are epoch milliseconds
//! - Transit legs carry `agencyId`, `tripId` and the stop indices of the
//!   boarding and alighting stops within the trip
//! - `bannedTrips` takes comma-separated `agency_trip` ids, optionally
//!   followed by `:`-separated stop indices

mod client;
mod convert;
mod error;
mod types;

pub use client::{OtpClient, OtpConfig};
pub use convert::{ConversionError, convert_itinerary, itinerary_to_dto};
pub use error::OtpError;
pub use types::{ItineraryDto, LegDto, PlaceDto, PlanResponse, StopIdDto, TripPlanDto};

#[cfg(test)]
pub(crate) mod fixtures {
    /// A planner response with one walk/bus/walk itinerary.
    pub const SAMPLE_PLAN: &str = r#"{
        "plan": {
            "date": 1715702400000,
            "itineraries": [{
                "duration": 2400,
                "startTime": 1715702400000,
                "endTime": 1715704800000,
                "walkDistance": 512.5,
                "transfers": 0,
                "legs": [
                    {
                        "mode": "WALK",
                        "startTime": 1715702400000,
                        "endTime": 1715702700000,
                        "distance": 412.5,
                        "from": {"name": "Origin", "lat": 45.52, "lon": -122.68},
                        "to": {"name": "SW 5th & Oak", "lat": 45.521, "lon": -122.676,
                               "stopId": {"agencyId": "TriMet", "id": "7777"}, "stopIndex": 4}
                    },
                    {
                        "mode": "BUS",
                        "startTime": 1715702700000,
                        "endTime": 1715704500000,
                        "distance": 6100.0,
                        "routeShortName": "63",
                        "agencyId": "TriMet",
                        "tripId": "9044187",
                        "from": {"name": "SW 5th & Oak", "lat": 45.521, "lon": -122.676,
                                 "stopId": {"agencyId": "TriMet", "id": "7777"}, "stopIndex": 4},
                        "to": {"name": "Zoo", "lat": 45.51, "lon": -122.71,
                               "stopId": {"agencyId": "TriMet", "id": "9999"}, "stopIndex": 19}
                    },
                    {
                        "mode": "WALK",
                        "startTime": 1715704500000,
                        "endTime": 1715704800000,
                        "distance": 100.0,
                        "from": {"name": "Zoo", "lat": 45.51, "lon": -122.71},
                        "to": {"name": "Destination", "lat": 45.509, "lon": -122.712}
                    }
                ]
            }]
        }
    }"#;
}
