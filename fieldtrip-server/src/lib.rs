//! Field trip group planner server.
//!
//! Plans transit itineraries for school groups too large for one vehicle:
//! the group is split across several itineraries, each using vehicles no
//! other part of the group (or any other trip saved that day) is riding.

pub mod config;
pub mod credentials;
pub mod datastore;
pub mod domain;
pub mod fieldtrip;
pub mod otp;
pub mod planner;
pub mod web;
