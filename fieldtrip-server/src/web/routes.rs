//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::datastore::{FieldTripRequestDto, TripDirection};
use crate::fieldtrip::FieldTripError;

use super::dto::*;
use super::error::AppError;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/fieldtrip/plan", post(plan_trip).get(current_plan))
        .route("/fieldtrip/save", post(save_plan))
        .route("/fieldtrip/trips", get(list_trips))
        .route("/fieldtrip/trips/:id", get(load_trip))
        .route("/fieldtrip/trips/:id/delete", post(delete_trip))
        .route("/fieldtrip/requests", get(list_requests))
        .route("/fieldtrip/requests/:id/plan/:direction", post(plan_request))
        .route("/fieldtrip/requests/:id/save/:direction", post(save_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

impl AppState {
    fn error(&self, err: FieldTripError) -> AppError {
        AppError::from_fieldtrip(err, &self.capacities)
    }

    fn view(&self, plan: &crate::domain::GroupPlan) -> Json<GroupPlanView> {
        Json(GroupPlanView::from_plan(plan, &self.capacities))
    }
}

fn parse_direction(s: &str) -> Result<TripDirection, AppError> {
    s.parse()
        .map_err(|message| AppError::BadRequest { message })
}

/// Plan a group trip and make it the current plan.
async fn plan_trip(State(state): State<AppState>, body: Bytes) -> Result<Json<GroupPlanView>, AppError> {
    // Parse JSON manually so the body can be logged on failure
    let req: PlanRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid plan request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let plan = state
        .fieldtrip
        .plan(req.query, req.group_size)
        .await
        .map_err(|e| state.error(e))?;
    Ok(state.view(&plan))
}

/// The current plan.
async fn current_plan(State(state): State<AppState>) -> Result<Json<GroupPlanView>, AppError> {
    match state.fieldtrip.current_plan().await {
        Some(plan) => Ok(state.view(&plan)),
        None => Err(AppError::NotFound {
            message: "no current plan".to_string(),
        }),
    }
}

/// Save the current plan as a new trip.
async fn save_plan(State(state): State<AppState>) -> Result<Json<SaveResponse>, AppError> {
    let trip_id = state.fieldtrip.save().await.map_err(|e| state.error(e))?;
    Ok(Json(SaveResponse { trip_id }))
}

async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<TripsQuery>,
) -> Result<Json<Vec<TripSummary>>, AppError> {
    let trips = state
        .fieldtrip
        .list_trips(query.date)
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(trips.iter().map(TripSummary::from).collect()))
}

/// Load a saved trip as the current plan.
async fn load_trip(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GroupPlanView>, AppError> {
    let plan = state
        .fieldtrip
        .render_trip(id)
        .await
        .map_err(|e| state.error(e))?;
    Ok(state.view(&plan))
}

async fn delete_trip(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, AppError> {
    state
        .fieldtrip
        .delete_trip(id)
        .await
        .map_err(|e| state.error(e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_requests(State(state): State<AppState>) -> Result<Json<Vec<FieldTripRequestDto>>, AppError> {
    let requests = state
        .fieldtrip
        .load_requests()
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(requests))
}

/// Plan the outbound or inbound trip for a request.
async fn plan_request(
    State(state): State<AppState>,
    Path((id, direction)): Path<(i64, String)>,
) -> Result<Json<GroupPlanView>, AppError> {
    let direction = parse_direction(&direction)?;
    let plan = state
        .fieldtrip
        .plan_request(id, direction)
        .await
        .map_err(|e| state.error(e))?;
    Ok(state.view(&plan))
}

/// Save the current plan as the outbound or inbound trip of a request.
async fn save_request(
    State(state): State<AppState>,
    Path((id, direction)): Path<(i64, String)>,
) -> Result<Json<SaveResponse>, AppError> {
    let direction = parse_direction(&direction)?;
    let trip_id = state
        .fieldtrip
        .save_request_trip(id, direction)
        .await
        .map_err(|e| state.error(e))?;
    Ok(Json(SaveResponse { trip_id }))
}
