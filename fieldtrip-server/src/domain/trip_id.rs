//! Transit trip identifier types.

use std::fmt;

/// Error returned when parsing an invalid trip identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid trip id {input:?}: {reason}")]
pub struct InvalidTripId {
    input: String,
    reason: &'static str,
}

/// A transit trip, qualified by the agency that runs it.
///
/// The planner and datastore both render this as `agency_trip`, splitting
/// on the first underscore when parsing. The agency part therefore cannot
/// contain an underscore, while the trip part may.
///
/// # Examples
///
/// ```
/// use fieldtrip_server::domain::TripId;
///
/// let trip = TripId::parse("TriMet_9044187").unwrap();
/// assert_eq!(trip.agency(), "TriMet");
/// assert_eq!(trip.trip(), "9044187");
/// assert_eq!(trip.to_string(), "TriMet_9044187");
///
/// assert!(TripId::parse("9044187").is_err());
/// assert!(TripId::parse("_9044187").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripId {
    agency: String,
    trip: String,
}

impl TripId {
    /// Create a trip id from its parts.
    pub fn new(agency: impl Into<String>, trip: impl Into<String>) -> Result<Self, InvalidTripId> {
        let agency = agency.into();
        let trip = trip.into();

        if agency.is_empty() {
            return Err(InvalidTripId {
                input: format!("{agency}_{trip}"),
                reason: "agency must not be empty",
            });
        }
        if agency.contains('_') {
            return Err(InvalidTripId {
                input: format!("{agency}_{trip}"),
                reason: "agency must not contain '_'",
            });
        }
        if trip.is_empty() {
            return Err(InvalidTripId {
                input: format!("{agency}_{trip}"),
                reason: "trip must not be empty",
            });
        }

        Ok(Self { agency, trip })
    }

    /// Parse an `agency_trip` string.
    pub fn parse(s: &str) -> Result<Self, InvalidTripId> {
        let (agency, trip) = s.split_once('_').ok_or_else(|| InvalidTripId {
            input: s.to_string(),
            reason: "expected agency_trip",
        })?;
        Self::new(agency, trip)
    }

    /// Returns the agency id.
    pub fn agency(&self) -> &str {
        &self.agency
    }

    /// Returns the agency-local trip id.
    pub fn trip(&self) -> &str {
        &self.trip
    }
}

impl fmt::Debug for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripId({}_{})", self.agency, self.trip)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.agency, self.trip)
    }
}
