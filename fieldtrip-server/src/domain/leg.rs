//! Itinerary leg types.
//!
//! A `Leg` is one segment of an itinerary: a walk, or a ride on a transit
//! trip between two stops. Transit legs are reached through the borrowed
//! [`TransitLeg`] view, which guarantees the trip and stop indices exist.

use chrono::{DateTime, Duration, Utc};

use super::{DomainError, Mode, ModeCapacities, TripId};

/// One end of a leg.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Display name
    pub name: String,
    /// Stop id, for places that are transit stops
    pub stop_id: Option<String>,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl Place {
    /// Create a place that is not a transit stop.
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            stop_id: None,
            lat,
            lon,
        }
    }

    /// Mark this place as a transit stop.
    pub fn with_stop_id(mut self, stop_id: impl Into<String>) -> Self {
        self.stop_id = Some(stop_id.into());
        self
    }
}

/// The transit trip a leg rides, and where on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitRide {
    /// Trip being ridden
    pub trip_id: TripId,
    /// Index of the boarding stop in the trip's stop sequence
    pub from_stop_index: usize,
    /// Index of the alighting stop in the trip's stop sequence
    pub to_stop_index: usize,
    /// Public route name, if the planner supplied one
    pub route: Option<String>,
    /// Capacity of this particular vehicle, overriding the per-mode value
    pub capacity: Option<u32>,
}

impl TransitRide {
    /// Create a ride, validating that it travels forward along the trip.
    pub fn new(
        trip_id: TripId,
        from_stop_index: usize,
        to_stop_index: usize,
    ) -> Result<Self, DomainError> {
        if to_stop_index <= from_stop_index {
            return Err(DomainError::InvalidLeg(
                "alighting stop must come after boarding stop",
            ));
        }
        Ok(Self {
            trip_id,
            from_stop_index,
            to_stop_index,
            route: None,
            capacity: None,
        })
    }

    /// Attach a route name.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Record the capacity of the vehicle running this trip.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }
}

/// A leg of an itinerary.
///
/// # Invariants
///
/// - `end_time >= start_time`
/// - A ride is present exactly when the mode is a transit mode
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    mode: Mode,
    from: Place,
    to: Place,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    distance_meters: f64,
    ride: Option<TransitRide>,
}

impl Leg {
    /// Construct a leg, validating times and the mode/ride pairing.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the leg ends before it starts, if a transit mode
    /// has no ride, or if a non-transit mode has one.
    pub fn new(
        mode: Mode,
        from: Place,
        to: Place,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        ride: Option<TransitRide>,
    ) -> Result<Self, DomainError> {
        if end_time < start_time {
            return Err(DomainError::InvalidLeg("leg ends before it starts"));
        }
        match (mode.is_transit(), &ride) {
            (true, None) => return Err(DomainError::MissingTrip(mode)),
            (false, Some(_)) => {
                return Err(DomainError::InvalidLeg(
                    "only transit legs can ride a trip",
                ));
            }
            _ => {}
        }

        Ok(Self {
            mode,
            from,
            to,
            start_time,
            end_time,
            distance_meters: 0.0,
            ride,
        })
    }

    /// Set the travelled distance.
    pub fn with_distance(mut self, meters: f64) -> Self {
        self.distance_meters = meters;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn from(&self) -> &Place {
        &self.from
    }

    pub fn to(&self) -> &Place {
        &self.to
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Returns the leg duration.
    pub fn duration(&self) -> Duration {
        self.end_time.signed_duration_since(self.start_time)
    }

    /// Returns the ride, if this is a transit leg.
    pub fn ride(&self) -> Option<&TransitRide> {
        self.ride.as_ref()
    }

    /// Returns a transit view of this leg, if it rides a trip.
    pub fn as_transit(&self) -> Option<TransitLeg<'_>> {
        self.ride.as_ref().map(|ride| TransitLeg { leg: self, ride })
    }
}

/// A leg known to ride a transit trip.
#[derive(Debug, Clone, Copy)]
pub struct TransitLeg<'a> {
    leg: &'a Leg,
    ride: &'a TransitRide,
}

impl<'a> TransitLeg<'a> {
    pub fn leg(&self) -> &'a Leg {
        self.leg
    }

    pub fn trip_id(&self) -> &'a TripId {
        &self.ride.trip_id
    }

    pub fn from_stop_index(&self) -> usize {
        self.ride.from_stop_index
    }

    pub fn to_stop_index(&self) -> usize {
        self.ride.to_stop_index
    }

    pub fn mode(&self) -> Mode {
        self.leg.mode
    }

    /// Passengers this leg's vehicle can take.
    pub fn capacity(&self, capacities: &ModeCapacities) -> u32 {
        self.ride
            .capacity
            .unwrap_or_else(|| capacities.get(self.leg.mode))
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.leg.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.leg.end_time
    }
}
