//! Splitting a group across capacity-limited itineraries.
//!
//! Each planning call returns the single best itinerary that avoids every
//! banned segment. Its capacity (the smallest vehicle it rides) is taken
//! off the remaining group, its transit segments are banned, and planning
//! repeats until everyone has a seat.

use std::future::Future;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{BannedSegments, GroupPlan, Itinerary, PlanQuery};

use super::config::GroupPlanConfig;

/// Error from a single planning call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Planner unreachable, overloaded or failing; may succeed on retry
    #[error("planner unavailable: {0}")]
    Unavailable(String),

    /// Planner found no itinerary avoiding the banned segments
    #[error("no itinerary found: {0}")]
    NoItinerary(String),

    /// Planner answered with something we could not use
    #[error("invalid planner response: {0}")]
    InvalidResponse(String),

    /// Planner refused the request
    #[error("planner rejected request: {0}")]
    Rejected(String),
}

impl PlanError {
    /// Returns true if the same call may succeed when retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, PlanError::Unavailable(_))
    }
}

/// Source of single itineraries.
///
/// This abstraction allows the accumulator to be tested with scripted
/// planners.
pub trait ItineraryPlanner {
    /// Plan one itinerary for `query` that uses none of the `banned` segments.
    fn plan_once(
        &self,
        query: &PlanQuery,
        banned: &BannedSegments,
    ) -> impl Future<Output = Result<Itinerary, PlanError>> + Send;
}

/// Error from group planning.
///
/// Every variant raised after planning started carries the itineraries
/// accumulated so far, so the caller can decide whether to retry or
/// discard them.
#[derive(Debug, thiserror::Error)]
pub enum GroupPlanError {
    /// Group size was zero, negative or too large
    #[error("group size must be between 1 and {max}, got {0}", max = u32::MAX)]
    InvalidGroupSize(i64),

    /// A planning call failed
    #[error("planning call {call} failed: {source}")]
    PlanningFailed {
        call: usize,
        #[source]
        source: PlanError,
        partial: Box<GroupPlan>,
    },

    /// Planner returned an itinerary with no transit legs
    #[error("itinerary from call {call} has no transit legs, so its capacity is undefined")]
    NoTransitLegs { call: usize, partial: Box<GroupPlan> },

    /// Planner returned an itinerary that cannot carry anyone
    #[error("itinerary from call {call} has non-positive capacity {capacity}")]
    InvalidCapacity {
        call: usize,
        capacity: u32,
        partial: Box<GroupPlan>,
    },

    /// Iteration cap reached before the group was covered
    #[error("group not covered after {calls} planning calls ({remaining} unassigned)")]
    TooManyIterations {
        calls: usize,
        remaining: u32,
        partial: Box<GroupPlan>,
    },

    /// The session was cancelled while planning
    #[error("group planning cancelled")]
    Cancelled { partial: Box<GroupPlan> },
}

impl GroupPlanError {
    /// Returns the itineraries accumulated before the failure, if planning started.
    pub fn partial_plan(&self) -> Option<&GroupPlan> {
        match self {
            GroupPlanError::InvalidGroupSize(_) => None,
            GroupPlanError::PlanningFailed { partial, .. }
            | GroupPlanError::NoTransitLegs { partial, .. }
            | GroupPlanError::InvalidCapacity { partial, .. }
            | GroupPlanError::TooManyIterations { partial, .. }
            | GroupPlanError::Cancelled { partial } => Some(partial),
        }
    }
}

/// Request for a group plan.
#[derive(Debug, Clone)]
pub struct GroupRequest {
    /// Query shared by every itinerary.
    pub query: PlanQuery,

    /// Number of people to move.
    pub group_size: i64,

    /// Segments unavailable before planning starts (e.g. taken by other
    /// groups travelling the same day).
    pub banned: BannedSegments,
}

impl GroupRequest {
    /// Create a request with nothing banned up front.
    pub fn new(query: PlanQuery, group_size: i64) -> Self {
        Self {
            query,
            group_size,
            banned: BannedSegments::new(),
        }
    }

    /// Start from an existing ban set.
    pub fn with_banned(mut self, banned: BannedSegments) -> Self {
        self.banned = banned;
        self
    }
}

/// Splits a group across as many itineraries as needed.
pub struct GroupPlanner<'a, P: ItineraryPlanner> {
    planner: &'a P,
    config: &'a GroupPlanConfig,
}

impl<'a, P: ItineraryPlanner> GroupPlanner<'a, P> {
    /// Create a new group planner.
    pub fn new(planner: &'a P, config: &'a GroupPlanConfig) -> Self {
        Self { planner, config }
    }

    /// Plan itineraries until the whole group is covered.
    pub async fn plan_group(&self, request: GroupRequest) -> Result<GroupPlan, GroupPlanError> {
        self.run(request, None).await
    }

    /// Like [`plan_group`](Self::plan_group), but stops as soon as `cancel`
    /// becomes `true` or its sender is dropped.
    ///
    /// A planning call in flight at that point is abandoned and its result
    /// never applied.
    pub async fn plan_group_cancellable(
        &self,
        request: GroupRequest,
        cancel: watch::Receiver<bool>,
    ) -> Result<GroupPlan, GroupPlanError> {
        self.run(request, Some(cancel)).await
    }

    async fn run(
        &self,
        request: GroupRequest,
        mut cancel: Option<watch::Receiver<bool>>,
    ) -> Result<GroupPlan, GroupPlanError> {
        let total = u32::try_from(request.group_size)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(GroupPlanError::InvalidGroupSize(request.group_size))?;

        let mut plan = GroupPlan::new(request.query, total);
        let mut banned = request.banned;
        let mut remaining = total;

        for call in 1..=self.config.max_iterations {
            let result = match cancel.as_mut() {
                Some(rx) => tokio::select! {
                    biased;
                    _ = cancelled(rx) => {
                        info!(call, remaining, "group planning cancelled");
                        return Err(GroupPlanError::Cancelled { partial: Box::new(plan) });
                    }
                    result = self.plan_with_retry(plan.query(), &banned, call) => result,
                },
                None => self.plan_with_retry(plan.query(), &banned, call).await,
            };

            let itinerary = match result {
                Ok(itinerary) => itinerary,
                Err(source) => {
                    return Err(GroupPlanError::PlanningFailed {
                        call,
                        source,
                        partial: Box::new(plan),
                    });
                }
            };

            let capacity = match itinerary.group_trip_capacity(&self.config.capacities) {
                None => {
                    return Err(GroupPlanError::NoTransitLegs {
                        call,
                        partial: Box::new(plan),
                    });
                }
                Some(0) => {
                    return Err(GroupPlanError::InvalidCapacity {
                        call,
                        capacity: 0,
                        partial: Box::new(plan),
                    });
                }
                Some(capacity) => capacity,
            };

            let added = banned.ban_itinerary(&itinerary);
            debug!(call, capacity, added, banned = banned.len(), "itinerary planned");

            if remaining > capacity {
                remaining -= capacity;
                plan.push(itinerary, capacity);
            } else {
                plan.push(itinerary, remaining);
                info!(
                    group_size = total,
                    itineraries = plan.len(),
                    "group plan complete"
                );
                return Ok(plan);
            }
        }

        warn!(
            calls = self.config.max_iterations,
            remaining, "group planning hit iteration cap"
        );
        Err(GroupPlanError::TooManyIterations {
            calls: self.config.max_iterations,
            remaining,
            partial: Box::new(plan),
        })
    }

    /// One planning call, retrying transient failures per the retry policy.
    async fn plan_with_retry(
        &self,
        query: &PlanQuery,
        banned: &BannedSegments,
        call: usize,
    ) -> Result<Itinerary, PlanError> {
        let policy = &self.config.retry;
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.planner.plan_once(query, banned).await {
                Ok(itinerary) => return Ok(itinerary),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = policy.backoff(attempt);
                    warn!(call, attempt, ?delay, error = %err, "planning call failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(call, attempt, error = %err, "planning call failed");
                    return Err(err);
                }
            }
        }
    }
}

/// Resolves once cancellation is requested or the sender goes away.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|cancel| *cancel).await;
}

#[cfg(test)]
#[path = "accumulator_tests.rs"]
mod tests;
