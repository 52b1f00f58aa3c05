//! Trip planner API response DTOs.
//!
//! These types map directly to the planner's `/plan` JSON response. They
//! use `Option` liberally because the planner omits fields that do not
//! apply (walk legs have no trip, origins have no stop index).
//!
//! Itinerary DTOs are also what gets stored in the datastore, so they
//! serialize back to the same shape.

use serde::{Deserialize, Serialize};

/// Response from `GET /plan`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    /// The plan, absent when the planner reports an error.
    pub plan: Option<TripPlanDto>,

    /// Planner-reported error (e.g. no path found).
    pub error: Option<PlannerErrorDto>,
}

/// Planner error body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerErrorDto {
    pub id: Option<i32>,
    pub msg: Option<String>,
}

/// A trip plan with candidate itineraries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanDto {
    /// Request time (epoch millis).
    pub date: Option<i64>,

    #[serde(default)]
    pub itineraries: Vec<ItineraryDto>,
}

/// One itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDto {
    /// Duration in seconds.
    pub duration: Option<i64>,

    /// Start time (epoch millis).
    pub start_time: i64,

    /// End time (epoch millis).
    pub end_time: i64,

    /// Walking distance in meters.
    pub walk_distance: Option<f64>,

    /// Number of transfers.
    pub transfers: Option<u32>,

    pub legs: Vec<LegDto>,
}

/// One leg of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDto {
    /// Mode name (e.g. "WALK", "BUS").
    pub mode: String,

    /// Start time (epoch millis).
    pub start_time: i64,

    /// End time (epoch millis).
    pub end_time: i64,

    /// Distance in meters.
    pub distance: Option<f64>,

    /// Route short name (e.g. "15").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_short_name: Option<String>,

    /// Agency running the trip. Transit legs only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<String>,

    /// Agency-local trip id. Transit legs only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,

    /// Passenger capacity of the vehicle, when the planner knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_capacity: Option<u32>,

    pub from: PlaceDto,

    pub to: PlaceDto,
}

/// A place at one end of a leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDto {
    pub name: Option<String>,

    pub lat: f64,

    pub lon: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_id: Option<StopIdDto>,

    /// Position of this stop in the trip's stop sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_index: Option<usize>,
}

/// Agency-qualified stop id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopIdDto {
    pub agency_id: String,
    pub id: String,
}
