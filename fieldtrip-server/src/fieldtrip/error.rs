//! Field trip service error types.

use crate::datastore::DatastoreError;
use crate::planner::GroupPlanError;

/// Errors from field trip operations.
#[derive(Debug, thiserror::Error)]
pub enum FieldTripError {
    #[error("datastore error: {0}")]
    Datastore(#[from] DatastoreError),

    #[error(transparent)]
    Planning(#[from] GroupPlanError),

    /// Save requested before any plan was made or loaded
    #[error("no current plan to save")]
    NoCurrentPlan,

    #[error("field trip request {0} not found")]
    RequestNotFound(i64),

    /// Request lacks the time needed to plan one direction
    #[error("field trip request {id} has no {field}")]
    MissingRequestTime { id: i64, field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FieldTripError::MissingRequestTime {
            id: 7,
            field: "leaveDestinationTime",
        };
        assert_eq!(
            err.to_string(),
            "field trip request 7 has no leaveDestinationTime"
        );

        let err = FieldTripError::from(GroupPlanError::InvalidGroupSize(0));
        assert_eq!(err.to_string(), GroupPlanError::InvalidGroupSize(0).to_string());
    }
}
