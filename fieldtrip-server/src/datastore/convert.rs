//! Conversion between group plans and the datastore's records.
//!
//! Saving flattens a plan into form fields; loading rebuilds a plan from a
//! stored trip. Stored trips also tell a new planning session which
//! vehicles are already taken.

use chrono::NaiveDateTime;
use tracing::warn;

use crate::domain::{BannedSegment, BannedSegments, GroupItinerary, GroupPlan, PlanQuery, TripId};
use crate::otp::{ItineraryDto, convert_itinerary, itinerary_to_dto};

use super::codec;
use super::error::DatastoreError;
use super::types::FieldTripDto;

/// Form fields as posted to the datastore.
pub type Form = Vec<(String, String)>;

fn field(name: impl Into<String>, value: impl ToString) -> (String, String) {
    (name.into(), value.to_string())
}

/// Fields for `newTrip`.
pub fn new_trip_form(plan: &GroupPlan, created_by: &str) -> Result<Form, DatastoreError> {
    let query = plan.query();
    let query_params = serde_json::to_string(query).map_err(|e| DatastoreError::json(e, ""))?;
    let departure = NaiveDateTime::new(query.date, query.time);

    Ok(vec![
        field("trip.origin", &query.from_place),
        field("trip.destination", &query.to_place),
        field("trip.createdBy", created_by),
        field("trip.passengers", plan.group_size()),
        field("trip.departure", departure.format("%Y-%m-%dT%H:%M:%S")),
        field("trip.queryParams", query_params),
    ])
}

/// Fields for `addItinerary`, including one `trips[n]` block per transit leg.
pub fn itinerary_form(trip_id: i64, itin: &GroupItinerary) -> Result<Form, DatastoreError> {
    let json = serde_json::to_string(&itinerary_to_dto(&itin.itinerary))
        .map_err(|e| DatastoreError::json(e, ""))?;

    let mut form = vec![
        field("fieldTripId", trip_id),
        field("itinerary.passengers", itin.group_size),
        field("itinerary.itinData", codec::encode(&json)),
    ];
    for (n, leg) in itin.itinerary.transit_legs().enumerate() {
        form.push(field(format!("trips[{n}].depart"), leg.start_time().format("%H:%M:%S")));
        form.push(field(format!("trips[{n}].arrive"), leg.end_time().format("%H:%M:%S")));
        form.push(field(format!("trips[{n}].agencyAndId"), leg.trip_id()));
        form.push(field(format!("trips[{n}].fromStopIndex"), leg.from_stop_index()));
        form.push(field(format!("trips[{n}].toStopIndex"), leg.to_stop_index()));
    }
    Ok(form)
}

/// Rebuild the plan a trip was saved from.
pub fn stored_plan(trip: &FieldTripDto) -> Result<GroupPlan, DatastoreError> {
    let params = trip.query_params.as_deref().ok_or_else(|| DatastoreError::Json {
        message: format!("trip {} has no queryParams", trip.id),
        body: None,
    })?;
    let query: PlanQuery =
        serde_json::from_str(params).map_err(|e| DatastoreError::json(e, params))?;

    let assigned = trip
        .group_itineraries
        .iter()
        .try_fold(0u32, |total, g| total.checked_add(g.passengers))
        .ok_or_else(|| DatastoreError::Json {
            message: format!("trip {} assigns more passengers than fit in a u32", trip.id),
            body: None,
        })?;
    let group_size = trip.passengers.unwrap_or(assigned);
    let mut plan = GroupPlan::new(query, group_size);

    for stored in &trip.group_itineraries {
        let json = codec::decode(&stored.itin_data)?;
        let dto: ItineraryDto =
            serde_json::from_str(&json).map_err(|e| DatastoreError::json(e, &json))?;
        plan.push(convert_itinerary(&dto)?, stored.passengers);
    }
    Ok(plan)
}

/// Segments already used by saved trips.
///
/// Trips with malformed ids are skipped with a warning rather than failing
/// the whole planning session.
pub fn banned_segments(trips: &[FieldTripDto]) -> BannedSegments {
    let mut banned = BannedSegments::new();
    for gtfs in trips
        .iter()
        .flat_map(|t| &t.group_itineraries)
        .flat_map(|g| &g.trips)
    {
        let trip_id = match TripId::parse(&gtfs.agency_and_id) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "skipping saved trip with invalid id");
                continue;
            }
        };
        let from = match gtfs.from_stop_index.or(gtfs.stop_index) {
            Some(index) => index,
            None => {
                warn!(trip = %trip_id, "saved trip has no stop index, banning from stop 0");
                0
            }
        };
        let to = gtfs.to_stop_index.or(gtfs.stop_index).unwrap_or(from);
        banned.push(BannedSegment::new(trip_id, from, to));
    }
    banned
}
