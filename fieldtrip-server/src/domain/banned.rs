//! Banned transit segments.
//!
//! Once part of a group has been put on a trip between two stops, later
//! planning calls must not put anyone else on that segment. The ban set
//! only grows during a planning session.

use std::collections::{BTreeSet, HashMap};

use super::{Itinerary, TransitLeg, TripId};

/// A stretch of a transit trip excluded from planning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BannedSegment {
    pub trip_id: TripId,
    pub from_stop_index: usize,
    pub to_stop_index: usize,
}

impl BannedSegment {
    pub fn new(trip_id: TripId, from_stop_index: usize, to_stop_index: usize) -> Self {
        Self {
            trip_id,
            from_stop_index,
            to_stop_index,
        }
    }

    /// Ban the segment a transit leg rides.
    pub fn from_leg(leg: &TransitLeg<'_>) -> Self {
        Self::new(
            leg.trip_id().clone(),
            leg.from_stop_index(),
            leg.to_stop_index(),
        )
    }

    /// Stop indices covered by this segment, inclusive of both ends.
    ///
    /// Tolerates reversed indices from stored data.
    pub fn stop_indices(&self) -> std::ops::RangeInclusive<usize> {
        let lo = self.from_stop_index.min(self.to_stop_index);
        let hi = self.from_stop_index.max(self.to_stop_index);
        lo..=hi
    }
}

/// How banned segments are expressed to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BanScope {
    /// Ban the whole trip (`agency_trip`).
    #[default]
    Trip,
    /// Ban only the used stops (`agency_trip:3:4:5`).
    StopRange,
}

/// Ordered, append-only collection of banned segments.
///
/// Duplicates are kept; they only repeat an exclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannedSegments {
    segments: Vec<BannedSegment>,
}

impl BannedSegments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: BannedSegment) {
        self.segments.push(segment);
    }

    /// Ban every transit segment an itinerary uses. Returns how many were added.
    pub fn ban_itinerary(&mut self, itinerary: &Itinerary) -> usize {
        let before = self.segments.len();
        self.segments
            .extend(itinerary.transit_legs().map(|t| BannedSegment::from_leg(&t)));
        self.segments.len() - before
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BannedSegment> {
        self.segments.iter()
    }

    /// Returns true if every segment in `other` is also banned here.
    pub fn contains_all(&self, other: &BannedSegments) -> bool {
        other.iter().all(|s| self.segments.contains(s))
    }

    /// Render as the planner's `bannedTrips` parameter.
    ///
    /// Returns `None` when nothing is banned. Trips appear once each, in
    /// the order they were first banned.
    pub fn to_query_param(&self, scope: BanScope) -> Option<String> {
        if self.segments.is_empty() {
            return None;
        }

        let mut order: Vec<&TripId> = Vec::new();
        let mut stops: HashMap<&TripId, BTreeSet<usize>> = HashMap::new();
        for segment in &self.segments {
            let entry = stops.entry(&segment.trip_id).or_insert_with(|| {
                order.push(&segment.trip_id);
                BTreeSet::new()
            });
            entry.extend(segment.stop_indices());
        }

        let entries: Vec<String> = order
            .into_iter()
            .map(|trip| match scope {
                BanScope::Trip => trip.to_string(),
                BanScope::StopRange => {
                    let mut entry = trip.to_string();
                    for idx in &stops[trip] {
                        entry.push(':');
                        entry.push_str(&idx.to_string());
                    }
                    entry
                }
            })
            .collect();

        Some(entries.join(","))
    }
}

impl FromIterator<BannedSegment> for BannedSegments {
    fn from_iter<I: IntoIterator<Item = BannedSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl Extend<BannedSegment> for BannedSegments {
    fn extend<I: IntoIterator<Item = BannedSegment>>(&mut self, iter: I) {
        self.segments.extend(iter);
    }
}
