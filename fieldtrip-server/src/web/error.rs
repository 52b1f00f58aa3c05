//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::datastore::DatastoreError;
use crate::domain::ModeCapacities;
use crate::fieldtrip::FieldTripError;
use crate::planner::GroupPlanError;

use super::dto::{ErrorResponse, GroupPlanView};

/// Error returned by a route handler.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    /// Planning ran but could not place the whole group
    Unprocessable {
        message: String,
        partial_plan: Option<GroupPlanView>,
    },
    /// An upstream service failed
    BadGateway { message: String },
    Unavailable { message: String },
}

impl AppError {
    /// Map a service error, rendering any partial plan with `capacities`.
    pub fn from_fieldtrip(err: FieldTripError, capacities: &ModeCapacities) -> Self {
        let message = err.to_string();
        match err {
            FieldTripError::NoCurrentPlan => AppError::Conflict { message },
            FieldTripError::RequestNotFound(_) => AppError::NotFound { message },
            FieldTripError::MissingRequestTime { .. } => AppError::Unprocessable {
                message,
                partial_plan: None,
            },
            FieldTripError::Datastore(DatastoreError::Api { status: 404, .. }) => {
                AppError::NotFound { message }
            }
            FieldTripError::Datastore(_) => AppError::BadGateway { message },
            FieldTripError::Planning(err) => match &err {
                GroupPlanError::InvalidGroupSize(_) => AppError::BadRequest { message },
                GroupPlanError::Cancelled { .. } => AppError::Conflict { message },
                GroupPlanError::PlanningFailed { source, .. } if source.is_transient() => {
                    AppError::Unavailable { message }
                }
                _ => AppError::Unprocessable {
                    message,
                    partial_plan: err
                        .partial_plan()
                        .map(|p| GroupPlanView::from_plan(p, capacities)),
                },
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, partial_plan) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message, None),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message, None),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message, None),
            AppError::Unprocessable {
                message,
                partial_plan,
            } => (StatusCode::UNPROCESSABLE_ENTITY, message, partial_plan),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message, None),
            AppError::Unavailable { message } => {
                (StatusCode::SERVICE_UNAVAILABLE, message, None)
            }
        };
        if status.is_server_error() {
            warn!(%status, error = %error, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error,
                partial_plan,
            }),
        )
            .into_response()
    }
}
