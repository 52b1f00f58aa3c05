//! Data transfer objects for web requests and responses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::datastore::FieldTripDto;
use crate::domain::{GroupItinerary, GroupPlan, Leg, ModeCapacities, PlanQuery};

/// Request to plan a group trip.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(flatten)]
    pub query: PlanQuery,

    /// Number of people (defaults to the server's configured size)
    pub group_size: Option<i64>,
}

/// Filter for the trip list.
#[derive(Debug, Deserialize)]
pub struct TripsQuery {
    pub date: Option<NaiveDate>,
}

/// A group plan.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPlanView {
    pub query: PlanQuery,
    pub group_size: u32,
    pub assigned: u32,
    pub itineraries: Vec<GroupItineraryView>,
}

/// One itinerary and the part of the group on it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupItineraryView {
    pub group_size: u32,

    /// Most the itinerary could carry
    pub capacity: Option<u32>,

    /// Departure time, "HH:MM"
    pub start_time: String,

    /// Arrival time, "HH:MM"
    pub end_time: String,

    pub duration_minutes: i64,

    /// Walking distance in meters
    pub walk_distance: f64,

    pub legs: Vec<LegView>,
}

/// One leg of an itinerary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegView {
    pub mode: String,
    pub from: String,
    pub to: String,
    pub start_time: String,
    pub end_time: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    /// `agency_trip` of the vehicle ridden
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_stop_index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_stop_index: Option<usize>,
}

/// Response after saving a plan.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub trip_id: i64,
}

/// A saved trip in the trip list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub id: i64,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub created_by: Option<String>,
    pub passengers: Option<u32>,
    pub departure: Option<String>,
    pub itineraries: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Itineraries planned before the failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_plan: Option<GroupPlanView>,
}

// Conversion implementations

impl GroupPlanView {
    /// Create from a domain GroupPlan.
    pub fn from_plan(plan: &GroupPlan, capacities: &ModeCapacities) -> Self {
        Self {
            query: plan.query().clone(),
            group_size: plan.group_size(),
            assigned: plan.assigned(),
            itineraries: plan
                .itineraries()
                .iter()
                .map(|i| GroupItineraryView::from_group_itinerary(i, capacities))
                .collect(),
        }
    }
}

impl GroupItineraryView {
    pub fn from_group_itinerary(group: &GroupItinerary, capacities: &ModeCapacities) -> Self {
        let itin = &group.itinerary;
        Self {
            group_size: group.group_size,
            capacity: itin.group_trip_capacity(capacities),
            start_time: format_time(itin.start_time()),
            end_time: format_time(itin.end_time()),
            duration_minutes: itin.duration().num_minutes(),
            walk_distance: itin.walk_distance(),
            legs: itin.legs().iter().map(LegView::from_leg).collect(),
        }
    }
}

impl LegView {
    pub fn from_leg(leg: &Leg) -> Self {
        let ride = leg.ride();
        Self {
            mode: leg.mode().to_string(),
            from: leg.from().name.clone(),
            to: leg.to().name.clone(),
            start_time: format_time(leg.start_time()),
            end_time: format_time(leg.end_time()),
            route: ride.and_then(|r| r.route.clone()),
            trip_id: ride.map(|r| r.trip_id.to_string()),
            from_stop_index: ride.map(|r| r.from_stop_index),
            to_stop_index: ride.map(|r| r.to_stop_index),
        }
    }
}

impl From<&FieldTripDto> for TripSummary {
    fn from(trip: &FieldTripDto) -> Self {
        Self {
            id: trip.id,
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            created_by: trip.created_by.clone(),
            passengers: trip.passengers,
            departure: trip.departure.clone(),
            itineraries: trip.group_itineraries.len(),
        }
    }
}

/// Format a timestamp as "HH:MM".
fn format_time(time: DateTime<Utc>) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::itinerary::fixtures::bus_itinerary;
    use chrono::NaiveTime;

    fn plan() -> GroupPlan {
        let query = PlanQuery::new(
            "School::45.52,-122.68",
            "Museum::45.50,-122.60",
            NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
            NaiveTime::from_hms_opt(8, 50, 0).unwrap(),
        );
        let mut plan = GroupPlan::new(query, 60);
        plan.push(bus_itinerary("TriMet_15"), 40);
        plan
    }

    #[test]
    fn plan_view_formats_itineraries() {
        let view = GroupPlanView::from_plan(&plan(), &ModeCapacities::default());

        assert_eq!(view.group_size, 60);
        assert_eq!(view.assigned, 40);
        let itin = &view.itineraries[0];
        assert_eq!(itin.capacity, Some(40));
        assert_eq!(itin.start_time, "08:50");
        assert_eq!(itin.end_time, "09:40");
        assert_eq!(itin.duration_minutes, 50);

        let bus = &itin.legs[1];
        assert_eq!(bus.mode, "BUS");
        assert_eq!(bus.trip_id.as_deref(), Some("TriMet_15"));
        assert_eq!(bus.from_stop_index, Some(3));
        assert!(itin.legs[0].trip_id.is_none());
    }

    #[test]
    fn plan_view_json_shape() {
        let view = GroupPlanView::from_plan(&plan(), &ModeCapacities::default());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["groupSize"], 60);
        assert_eq!(json["query"]["fromPlace"], "School::45.52,-122.68");
        assert_eq!(json["itineraries"][0]["legs"][1]["tripId"], "TriMet_15");
        assert!(json["itineraries"][0]["legs"][0].get("tripId").is_none());
    }

    #[test]
    fn plan_request_flattens_query() {
        let req: PlanRequest = serde_json::from_str(
            r#"{"fromPlace": "A::1,2", "toPlace": "B::3,4", "date": "2024-05-14",
                "time": "09:00:00", "arriveBy": true, "groupSize": 120}"#,
        )
        .unwrap();
        assert_eq!(req.group_size, Some(120));
        assert!(req.query.arrive_by);
        assert!(req.query.show_intermediate_stops);
    }
}
