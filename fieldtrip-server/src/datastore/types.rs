//! Datastore DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A saved field trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTripDto {
    pub id: i64,

    #[serde(default)]
    pub origin: Option<String>,

    #[serde(default)]
    pub destination: Option<String>,

    #[serde(default)]
    pub created_by: Option<String>,

    /// Total passengers across all itineraries
    #[serde(default)]
    pub passengers: Option<u32>,

    /// Departure as `YYYY-MM-DDTHH:MM:SS`
    #[serde(default)]
    pub departure: Option<String>,

    /// The plan query, as JSON text
    #[serde(default)]
    pub query_params: Option<String>,

    #[serde(default)]
    pub group_itineraries: Vec<GroupItineraryDto>,
}

/// One stored itinerary of a field trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupItineraryDto {
    #[serde(default)]
    pub id: Option<i64>,

    pub passengers: u32,

    /// Compressed itinerary JSON
    pub itin_data: String,

    /// Transit trips the itinerary rides
    #[serde(default)]
    pub trips: Vec<GtfsTripDto>,
}

/// A transit trip used by a stored itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtfsTripDto {
    /// `agency_trip`
    pub agency_and_id: String,

    /// Departure time `HH:MM:SS`
    #[serde(default)]
    pub depart: Option<String>,

    /// Arrival time `HH:MM:SS`
    #[serde(default)]
    pub arrive: Option<String>,

    #[serde(default)]
    pub from_stop_index: Option<usize>,

    #[serde(default)]
    pub to_stop_index: Option<usize>,

    /// Single stop index written by older datastores
    #[serde(default)]
    pub stop_index: Option<usize>,
}

/// A school's request for a field trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTripRequestDto {
    pub id: i64,

    #[serde(default)]
    pub school_name: Option<String>,

    #[serde(default)]
    pub teacher_name: Option<String>,

    /// Where the group starts, in planner place format
    pub start_location: String,

    /// Where the group is going, in planner place format
    pub end_location: String,

    pub travel_date: NaiveDate,

    /// Time the group must reach the destination
    #[serde(default)]
    pub arrive_destination_time: Option<NaiveTime>,

    /// Time the group leaves the destination to return
    #[serde(default)]
    pub leave_destination_time: Option<NaiveTime>,

    #[serde(default)]
    pub num_students: Option<u32>,

    #[serde(default)]
    pub outbound_trip_id: Option<i64>,

    #[serde(default)]
    pub inbound_trip_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_trip() {
        let json = r#"{
            "id": 12,
            "origin": "School::45.52,-122.68",
            "destination": "Zoo::45.51,-122.71",
            "createdBy": "dispatcher",
            "passengers": 60,
            "departure": "2024-05-14T09:00:00",
            "queryParams": "{}",
            "groupItineraries": [{
                "id": 3,
                "passengers": 40,
                "itinData": "AHsAfQ==",
                "trips": [{"agencyAndId": "TriMet_9044187", "depart": "09:05:00",
                           "arrive": "09:30:00", "fromStopIndex": 4, "toStopIndex": 19}]
            }]
        }"#;
        let trip: FieldTripDto = serde_json::from_str(json).unwrap();
        assert_eq!(trip.id, 12);
        assert_eq!(trip.passengers, Some(60));
        let trips = &trip.group_itineraries[0].trips;
        assert_eq!(trips[0].agency_and_id, "TriMet_9044187");
        assert_eq!(trips[0].from_stop_index, Some(4));
        assert_eq!(trips[0].stop_index, None);
    }

    #[test]
    fn parse_minimal_request() {
        let json = r#"{
            "id": 7,
            "startLocation": "School::45.52,-122.68",
            "endLocation": "Zoo::45.51,-122.71",
            "travelDate": "2024-05-14",
            "arriveDestinationTime": "09:30:00",
            "numStudents": 85
        }"#;
        let request: FieldTripRequestDto = serde_json::from_str(json).unwrap();
        assert_eq!(request.travel_date, NaiveDate::from_ymd_opt(2024, 5, 14).unwrap());
        assert_eq!(
            request.arrive_destination_time,
            NaiveTime::from_hms_opt(9, 30, 0)
        );
        assert_eq!(request.leave_destination_time, None);
        assert_eq!(request.num_students, Some(85));
    }
}
