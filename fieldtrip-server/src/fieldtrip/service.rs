//! Field trip planning sessions.
//!
//! The service owns the current group plan. Starting a plan, or loading a
//! saved one, begins a new session: any planning still running for the
//! previous session is cancelled and its result discarded.

use chrono::NaiveDate;
use tokio::sync::{Mutex, RwLock, watch};
use tracing::{debug, info};

use crate::datastore::{
    DatastoreClient, FieldTripDto, FieldTripRequestDto, TripDirection, banned_segments,
    stored_plan,
};
use crate::domain::{GroupPlan, PlanQuery};
use crate::otp::OtpClient;
use crate::planner::{GroupPlanConfig, GroupPlanError, GroupPlanner, GroupRequest, ItineraryPlanner};

use super::error::FieldTripError;

/// Group size used when a request does not give one.
pub const DEFAULT_GROUP_SIZE: u32 = 100;

/// Coordinates planning, saving and loading of field trips.
pub struct FieldTripService<P = OtpClient> {
    planner: P,
    datastore: DatastoreClient,
    config: GroupPlanConfig,
    default_group_size: u32,
    /// Cancels the running session when replaced
    session: Mutex<Option<watch::Sender<bool>>>,
    current: RwLock<Option<GroupPlan>>,
}

impl<P: ItineraryPlanner> FieldTripService<P> {
    pub fn new(planner: P, datastore: DatastoreClient, config: GroupPlanConfig) -> Self {
        Self {
            planner,
            datastore,
            config,
            default_group_size: DEFAULT_GROUP_SIZE,
            session: Mutex::new(None),
            current: RwLock::new(None),
        }
    }

    /// Set the group size used when none is given.
    pub fn with_default_group_size(mut self, size: u32) -> Self {
        self.default_group_size = size;
        self
    }

    pub fn default_group_size(&self) -> u32 {
        self.default_group_size
    }

    /// The plan most recently made or loaded, if any.
    pub async fn current_plan(&self) -> Option<GroupPlan> {
        self.current.read().await.clone()
    }

    /// Cancel the running session and clear the current plan.
    async fn begin_session(&self) -> watch::Receiver<bool> {
        let (tx, rx) = watch::channel(false);
        let mut session = self.session.lock().await;
        if let Some(previous) = session.replace(tx) {
            // Receiver may already be gone if that session finished
            let _ = previous.send(true);
            debug!("superseded previous planning session");
        }
        *self.current.write().await = None;
        rx
    }

    /// Make `plan` current unless its session was superseded meanwhile.
    async fn finish_session(
        &self,
        session: &watch::Receiver<bool>,
        plan: GroupPlan,
    ) -> Result<GroupPlan, FieldTripError> {
        let _guard = self.session.lock().await;
        if *session.borrow() || session.has_changed().is_err() {
            return Err(GroupPlanError::Cancelled {
                partial: Box::new(plan),
            }
            .into());
        }
        *self.current.write().await = Some(plan.clone());
        Ok(plan)
    }

    /// Plan a group, avoiding vehicles already used by trips saved for
    /// the same day.
    pub async fn plan(
        &self,
        query: PlanQuery,
        group_size: Option<i64>,
    ) -> Result<GroupPlan, FieldTripError> {
        let session = self.begin_session().await;
        let group_size = group_size.unwrap_or(i64::from(self.default_group_size));

        let saved = self.datastore.get_trips(Some(query.date)).await?;
        let banned = banned_segments(&saved);
        info!(
            group_size,
            saved_trips = saved.len(),
            banned = banned.len(),
            "planning field trip"
        );

        let request = GroupRequest::new(query, group_size).with_banned(banned);
        let plan = GroupPlanner::new(&self.planner, &self.config)
            .plan_group_cancellable(request, session.clone())
            .await?;

        self.finish_session(&session, plan).await
    }

    /// Save the current plan as a new trip. Returns the trip id.
    pub async fn save(&self) -> Result<i64, FieldTripError> {
        let plan = self
            .current_plan()
            .await
            .ok_or(FieldTripError::NoCurrentPlan)?;
        Ok(self.datastore.save_plan(&plan).await?)
    }

    /// Load a saved trip and make it the current plan.
    pub async fn render_trip(&self, id: i64) -> Result<GroupPlan, FieldTripError> {
        let session = self.begin_session().await;
        let trip = self.datastore.get_trip(id).await?;
        let plan = stored_plan(&trip)?;
        info!(trip_id = id, itineraries = plan.len(), "loaded saved trip");
        self.finish_session(&session, plan).await
    }

    pub async fn delete_trip(&self, id: i64) -> Result<(), FieldTripError> {
        self.datastore.delete_trip(id).await?;
        info!(trip_id = id, "deleted trip");
        Ok(())
    }

    /// Saved trips, optionally only those on `date`.
    pub async fn list_trips(&self, date: Option<NaiveDate>) -> Result<Vec<FieldTripDto>, FieldTripError> {
        Ok(self.datastore.get_trips(date).await?)
    }

    pub async fn load_requests(&self) -> Result<Vec<FieldTripRequestDto>, FieldTripError> {
        Ok(self.datastore.get_requests().await?)
    }

    async fn find_request(&self, id: i64) -> Result<FieldTripRequestDto, FieldTripError> {
        self.load_requests()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(FieldTripError::RequestNotFound(id))
    }

    /// Plan one direction of a field trip request.
    pub async fn plan_request(
        &self,
        request_id: i64,
        direction: TripDirection,
    ) -> Result<GroupPlan, FieldTripError> {
        let request = self.find_request(request_id).await?;
        let query = request_query(&request, direction)?;
        let group_size = request.num_students.map(i64::from);
        self.plan(query, group_size).await
    }

    /// Plan the trip to the destination, arriving by the requested time.
    pub async fn plan_outbound(&self, request_id: i64) -> Result<GroupPlan, FieldTripError> {
        self.plan_request(request_id, TripDirection::Outbound).await
    }

    /// Plan the trip back, leaving at the requested time.
    pub async fn plan_inbound(&self, request_id: i64) -> Result<GroupPlan, FieldTripError> {
        self.plan_request(request_id, TripDirection::Inbound).await
    }

    /// Save the current plan and record it against a request.
    pub async fn save_request_trip(
        &self,
        request_id: i64,
        direction: TripDirection,
    ) -> Result<i64, FieldTripError> {
        let trip_id = self.save().await?;
        self.datastore
            .set_request_trip(request_id, direction, trip_id)
            .await?;
        info!(request_id, trip_id, ?direction, "assigned trip to request");
        Ok(trip_id)
    }
}

/// Build the planning query for one direction of a request.
pub fn request_query(
    request: &FieldTripRequestDto,
    direction: TripDirection,
) -> Result<PlanQuery, FieldTripError> {
    let missing = |field| FieldTripError::MissingRequestTime {
        id: request.id,
        field,
    };
    match direction {
        TripDirection::Outbound => {
            let time = request
                .arrive_destination_time
                .ok_or_else(|| missing("arriveDestinationTime"))?;
            Ok(PlanQuery::new(
                &request.start_location,
                &request.end_location,
                request.travel_date,
                time,
            )
            .arriving_by())
        }
        TripDirection::Inbound => {
            let time = request
                .leave_destination_time
                .ok_or_else(|| missing("leaveDestinationTime"))?;
            Ok(PlanQuery::new(
                &request.end_location,
                &request.start_location,
                request.travel_date,
                time,
            ))
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
