//! Application state for the web layer.

use std::sync::Arc;

use crate::domain::ModeCapacities;
use crate::fieldtrip::FieldTripService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Field trip planning service
    pub fieldtrip: Arc<FieldTripService>,

    /// Capacities used to report itinerary capacity
    pub capacities: Arc<ModeCapacities>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(fieldtrip: FieldTripService, capacities: ModeCapacities) -> Self {
        Self {
            fieldtrip: Arc::new(fieldtrip),
            capacities: Arc::new(capacities),
        }
    }
}
