//! Itinerary type.

use chrono::{DateTime, Duration, Utc};

use super::{DomainError, Leg, ModeCapacities, TransitLeg};

/// One complete planned trip: an ordered sequence of legs.
///
/// # Invariants
///
/// - At least one leg
/// - Legs are in time order (each starts no earlier than the previous ends)
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    legs: Vec<Leg>,
}

impl Itinerary {
    /// Construct an itinerary from its legs.
    ///
    /// # Errors
    ///
    /// Returns `Err` if there are no legs or if a leg starts before the
    /// previous one ends.
    pub fn new(legs: Vec<Leg>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        for (i, pair) in legs.windows(2).enumerate() {
            if pair[1].start_time() < pair[0].end_time() {
                return Err(DomainError::OverlappingLegs(i, i + 1));
            }
        }

        Ok(Self { legs })
    }

    /// Returns all legs.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns the legs that ride a transit trip, in order.
    pub fn transit_legs(&self) -> impl Iterator<Item = TransitLeg<'_>> {
        self.legs.iter().filter_map(Leg::as_transit)
    }

    /// Maximum number of passengers this itinerary can carry.
    ///
    /// This is the capacity of the most constrained transit leg, using the
    /// vehicle's own capacity where known and the mode's otherwise. Returns
    /// `None` when the itinerary has no transit legs, since a walk-only
    /// itinerary puts no bound on group size.
    pub fn group_trip_capacity(&self, capacities: &ModeCapacities) -> Option<u32> {
        self.transit_legs().map(|t| t.capacity(capacities)).min()
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        // Safe: non-empty by construction
        self.legs[0].start_time()
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.legs[self.legs.len() - 1].end_time()
    }

    pub fn duration(&self) -> Duration {
        self.end_time().signed_duration_since(self.start_time())
    }

    /// Total walking distance in meters.
    pub fn walk_distance(&self) -> f64 {
        self.legs
            .iter()
            .filter(|l| !l.mode().is_transit())
            .map(Leg::distance_meters)
            .sum()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::domain::Mode;

    #[test]
    fn capacity_is_most_constrained_transit_leg() {
        let itin = Itinerary::new(vec![
            ride(Mode::Rail, "TriMet_MAX1", (0, 4), (9, 0), (9, 20)),
            ride(Mode::Bus, "TriMet_15", (2, 6), (9, 25), (9, 40)),
        ])
        .unwrap();
        assert_eq!(itin.group_trip_capacity(&ModeCapacities::default()), Some(40));
    }

    #[test]
    fn walk_only_has_no_capacity() {
        let itin = Itinerary::new(vec![walk("A", "B", (9, 0), (9, 15))]).unwrap();
        assert_eq!(itin.transit_legs().count(), 0);
        assert_eq!(itin.group_trip_capacity(&ModeCapacities::default()), None);
    }

    #[test]
    fn unconfigured_mode_has_zero_capacity() {
        let itin = bus_itinerary("TriMet_15");
        assert_eq!(itin.group_trip_capacity(&ModeCapacities::empty()), Some(0));
    }

    #[test]
    fn transit_legs_are_filtered_in_order() {
        let itin = Itinerary::new(vec![
            walk("A", "B", (8, 50), (9, 0)),
            ride(Mode::Bus, "TriMet_15", (2, 6), (9, 0), (9, 10)),
            walk("B", "C", (9, 10), (9, 15)),
            ride(Mode::Tram, "Streetcar_7", (1, 3), (9, 15), (9, 30)),
        ])
        .unwrap();
        let trips: Vec<String> = itin.transit_legs().map(|t| t.trip_id().to_string()).collect();
        assert_eq!(trips, vec!["TriMet_15", "Streetcar_7"]);
    }

    #[test]
    fn times_and_walk_distance() {
        let itin = bus_itinerary("TriMet_15");
        assert_eq!(itin.start_time(), at(8, 50));
        assert_eq!(itin.end_time(), at(9, 40));
        assert_eq!(itin.duration(), Duration::minutes(50));
        assert_eq!(itin.walk_distance(), 800.0);
    }

    #[test]
    fn reject_empty() {
        assert!(matches!(Itinerary::new(vec![]), Err(DomainError::EmptyItinerary)));
    }

    #[test]
    fn reject_overlapping_legs() {
        let err = Itinerary::new(vec![
            walk("A", "B", (9, 0), (9, 15)),
            walk("B", "C", (9, 10), (9, 20)),
        ]);
        assert!(matches!(err, Err(DomainError::OverlappingLegs(0, 1))));
    }
}
