//! Group plan: itineraries that together carry a whole group.

use super::{Itinerary, PlanQuery};

/// An itinerary together with the number of group members assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupItinerary {
    pub itinerary: Itinerary,
    pub group_size: u32,
}

/// The result of a planning session.
///
/// Every itinerary shares the same query. Once planning has finished the
/// assigned group sizes sum to `group_size`; a plan returned alongside an
/// error may fall short.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPlan {
    query: PlanQuery,
    group_size: u32,
    itineraries: Vec<GroupItinerary>,
}

impl GroupPlan {
    /// Start an empty plan for a group.
    pub fn new(query: PlanQuery, group_size: u32) -> Self {
        Self {
            query,
            group_size,
            itineraries: Vec::new(),
        }
    }

    /// Append an itinerary carrying `group_size` members.
    pub fn push(&mut self, itinerary: Itinerary, group_size: u32) {
        self.itineraries.push(GroupItinerary {
            itinerary,
            group_size,
        });
    }

    pub fn query(&self) -> &PlanQuery {
        &self.query
    }

    /// The group size originally requested.
    pub fn group_size(&self) -> u32 {
        self.group_size
    }

    pub fn itineraries(&self) -> &[GroupItinerary] {
        &self.itineraries
    }

    pub fn len(&self) -> usize {
        self.itineraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itineraries.is_empty()
    }

    /// Members assigned to an itinerary so far, saturating at `u32::MAX`.
    pub fn assigned(&self) -> u32 {
        self.itineraries
            .iter()
            .fold(0u32, |total, i| total.saturating_add(i.group_size))
    }

    /// Members not yet assigned to an itinerary.
    pub fn remaining(&self) -> u32 {
        self.group_size.saturating_sub(self.assigned())
    }

    /// Returns true once every member has an itinerary.
    pub fn is_complete(&self) -> bool {
        !self.itineraries.is_empty() && self.assigned() == self.group_size
    }
}
