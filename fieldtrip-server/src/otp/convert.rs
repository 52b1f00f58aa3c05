//! Conversion between planner DTOs and domain types.

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, Itinerary, Leg, Mode, Place, TransitRide, TripId, UnknownMode};

use super::types::{ItineraryDto, LegDto, PlaceDto, StopIdDto};

/// Error converting a planner response to domain types.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    #[error("timestamp {0} out of range")]
    InvalidTimestamp(i64),

    #[error(transparent)]
    UnknownMode(#[from] UnknownMode),

    #[error("transit leg {leg} is missing {field}")]
    MissingTransitField { leg: usize, field: &'static str },

    #[error("leg {leg}: {source}")]
    InvalidLeg {
        leg: usize,
        #[source]
        source: DomainError,
    },

    #[error(transparent)]
    InvalidItinerary(#[from] DomainError),
}

fn timestamp(ms: i64) -> Result<DateTime<Utc>, ConversionError> {
    DateTime::from_timestamp_millis(ms).ok_or(ConversionError::InvalidTimestamp(ms))
}

fn convert_place(dto: &PlaceDto) -> Place {
    let mut place = Place::new(dto.name.clone().unwrap_or_default(), dto.lat, dto.lon);
    match &dto.stop_id {
        Some(stop) if stop.agency_id.is_empty() => place = place.with_stop_id(stop.id.clone()),
        Some(stop) => place = place.with_stop_id(format!("{}_{}", stop.agency_id, stop.id)),
        None => {}
    }
    place
}

fn convert_leg(idx: usize, dto: &LegDto) -> Result<Leg, ConversionError> {
    let mode: Mode = dto.mode.parse()?;
    let start = timestamp(dto.start_time)?;
    let end = timestamp(dto.end_time)?;

    let ride = if mode.is_transit() {
        let missing = |field| ConversionError::MissingTransitField { leg: idx, field };
        let agency = dto.agency_id.as_deref().ok_or_else(|| missing("agencyId"))?;
        let trip = dto.trip_id.as_deref().ok_or_else(|| missing("tripId"))?;
        let from_idx = dto.from.stop_index.ok_or_else(|| missing("from.stopIndex"))?;
        let to_idx = dto.to.stop_index.ok_or_else(|| missing("to.stopIndex"))?;

        let invalid = |source: DomainError| ConversionError::InvalidLeg { leg: idx, source };
        let trip_id = TripId::new(agency, trip).map_err(|e| invalid(e.into()))?;
        let mut ride = TransitRide::new(trip_id, from_idx, to_idx).map_err(invalid)?;
        if let Some(route) = &dto.route_short_name {
            ride = ride.with_route(route.clone());
        }
        if let Some(capacity) = dto.vehicle_capacity {
            ride = ride.with_capacity(capacity);
        }
        Some(ride)
    } else {
        None
    };

    let leg = Leg::new(
        mode,
        convert_place(&dto.from),
        convert_place(&dto.to),
        start,
        end,
        ride,
    )
    .map_err(|source| ConversionError::InvalidLeg { leg: idx, source })?;

    Ok(leg.with_distance(dto.distance.unwrap_or(0.0)))
}

/// Convert a planner itinerary to a validated domain itinerary.
pub fn convert_itinerary(dto: &ItineraryDto) -> Result<Itinerary, ConversionError> {
    let legs = dto
        .legs
        .iter()
        .enumerate()
        .map(|(idx, leg)| convert_leg(idx, leg))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Itinerary::new(legs)?)
}

fn place_to_dto(place: &Place, stop_index: Option<usize>) -> PlaceDto {
    let stop_id = place.stop_id.as_ref().map(|id| match id.split_once('_') {
        Some((agency, id)) => StopIdDto {
            agency_id: agency.to_string(),
            id: id.to_string(),
        },
        None => StopIdDto {
            agency_id: String::new(),
            id: id.clone(),
        },
    });
    PlaceDto {
        name: Some(place.name.clone()),
        lat: place.lat,
        lon: place.lon,
        stop_id,
        stop_index,
    }
}

fn leg_to_dto(leg: &Leg) -> LegDto {
    let ride = leg.ride();
    LegDto {
        mode: leg.mode().as_str().to_string(),
        start_time: leg.start_time().timestamp_millis(),
        end_time: leg.end_time().timestamp_millis(),
        distance: Some(leg.distance_meters()),
        route_short_name: ride.and_then(|r| r.route.clone()),
        agency_id: ride.map(|r| r.trip_id.agency().to_string()),
        trip_id: ride.map(|r| r.trip_id.trip().to_string()),
        vehicle_capacity: ride.and_then(|r| r.capacity),
        from: place_to_dto(leg.from(), ride.map(|r| r.from_stop_index)),
        to: place_to_dto(leg.to(), ride.map(|r| r.to_stop_index)),
    }
}

/// Convert a domain itinerary back to the planner's JSON shape.
pub fn itinerary_to_dto(itinerary: &Itinerary) -> ItineraryDto {
    ItineraryDto {
        duration: Some(itinerary.duration().num_seconds()),
        start_time: itinerary.start_time().timestamp_millis(),
        end_time: itinerary.end_time().timestamp_millis(),
        walk_distance: Some(itinerary.walk_distance()),
        transfers: Some(itinerary.transit_legs().count().saturating_sub(1) as u32),
        legs: itinerary.legs().iter().map(leg_to_dto).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otp::fixtures::SAMPLE_PLAN;
    use crate::otp::types::PlanResponse;

    fn sample_dto() -> ItineraryDto {
        let response: PlanResponse = serde_json::from_str(SAMPLE_PLAN).unwrap();
        response.plan.unwrap().itineraries.remove(0)
    }

    #[test]
    fn converts_transit_leg() {
        let itin = convert_itinerary(&sample_dto()).unwrap();
        assert_eq!(itin.legs().len(), 3);

        let transit: Vec<_> = itin.transit_legs().collect();
        assert_eq!(transit.len(), 1);
        assert_eq!(transit[0].trip_id().to_string(), "TriMet_9044187");
        assert_eq!(transit[0].from_stop_index(), 4);
        assert_eq!(transit[0].to_stop_index(), 19);
        assert_eq!(transit[0].mode(), Mode::Bus);
        assert_eq!(
            transit[0].leg().ride().unwrap().route.as_deref(),
            Some("63")
        );
        assert_eq!(itin.walk_distance(), 512.5);
    }

    #[test]
    fn domain_roundtrip_preserves_ride_data() {
        let dto = sample_dto();
        let itin = convert_itinerary(&dto).unwrap();
        let back = itinerary_to_dto(&itin);

        assert_eq!(back.start_time, dto.start_time);
        assert_eq!(back.end_time, dto.end_time);
        assert_eq!(back.legs[1].agency_id.as_deref(), Some("TriMet"));
        assert_eq!(back.legs[1].trip_id.as_deref(), Some("9044187"));
        assert_eq!(back.legs[1].from.stop_index, Some(4));
        assert_eq!(back.legs[1].to.stop_id, dto.legs[1].to.stop_id);
        assert_eq!(back.legs[0].from.stop_index, None);
        assert_eq!(convert_itinerary(&back).unwrap(), itin);
    }

    #[test]
    fn transit_leg_without_trip_is_rejected() {
        let mut dto = sample_dto();
        dto.legs[1].trip_id = None;
        let err = convert_itinerary(&dto).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::MissingTransitField { leg: 1, field: "tripId" }
        ));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let mut dto = sample_dto();
        dto.legs[0].mode = "HOVERCRAFT".into();
        assert!(matches!(
            convert_itinerary(&dto),
            Err(ConversionError::UnknownMode(_))
        ));
    }

    #[test]
    fn backwards_stop_indices_are_rejected() {
        let mut dto = sample_dto();
        dto.legs[1].to.stop_index = Some(2);
        assert!(matches!(
            convert_itinerary(&dto),
            Err(ConversionError::InvalidLeg { leg: 1, .. })
        ));
    }
}
