//! Web layer for the field trip planner.
//!
//! Provides JSON endpoints for planning group trips, saving and loading
//! them, and working through schools' field trip requests.

mod dto;
mod error;
mod routes;
mod state;

pub use dto::*;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
