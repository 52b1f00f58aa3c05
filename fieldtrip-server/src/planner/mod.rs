//! Group planning.
//!
//! A single trip planner call returns one itinerary, and one itinerary
//! rarely has room for a whole school group. This module repeatedly plans,
//! assigns as many people as the returned itinerary can carry, bans the
//! vehicles it used and plans again until everyone is placed.

mod accumulator;
mod config;

pub use accumulator::{
    GroupPlanError, GroupPlanner, GroupRequest, ItineraryPlanner, PlanError,
};
pub use config::{GroupPlanConfig, RetryPolicy};
