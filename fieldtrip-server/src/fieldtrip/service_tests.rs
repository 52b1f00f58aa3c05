//! Unit tests for field trip sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use axum::extract::{Form, Query, State};
use axum::routing::{get, post};
use axum::Router;
use chrono::NaiveTime;

use super::*;
use crate::credentials::StaticCredentials;
use crate::datastore::{DatastoreConfig, codec};
use crate::domain::itinerary::fixtures::{bus_itinerary, itinerary_with_capacity};
use crate::domain::{BannedSegments, Itinerary};
use crate::otp::itinerary_to_dto;
use crate::planner::PlanError;

/// Origin that makes [`FleetPlanner`] stall forever.
const STALL: &str = "Stall::45.5,-122.6";

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
}

fn query(from: &str) -> PlanQuery {
    PlanQuery::new(
        from,
        "Zoo::45.51,-122.71",
        date(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    )
}

/// Planner with an endless fleet of identical vehicles.
struct FleetPlanner {
    capacity: u32,
    calls: StdMutex<Vec<(String, BannedSegments)>>,
}

impl FleetPlanner {
    fn new(capacity: u32) -> Self {
        Self {
            capacity,
            calls: StdMutex::new(Vec::new()),
        }
    }
}

impl ItineraryPlanner for FleetPlanner {
    async fn plan_once(
        &self,
        query: &PlanQuery,
        banned: &BannedSegments,
    ) -> Result<Itinerary, PlanError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((query.from_place.clone(), banned.clone()));
            calls.len()
        };
        if query.from_place == STALL {
            std::future::pending::<()>().await;
        }
        Ok(itinerary_with_capacity(
            &format!("Fleet_{n}"),
            (n, n + 3),
            self.capacity,
        ))
    }
}

type Params = HashMap<String, String>;

#[derive(Clone, Default)]
struct FakeStore {
    trips: Arc<String>,
    trip: Arc<String>,
    calls: Arc<StdMutex<Vec<(&'static str, Params)>>>,
}

impl FakeStore {
    fn record(&self, path: &'static str, params: Params) {
        self.calls.lock().unwrap().push((path, params));
    }

    fn calls(&self, path: &str) -> Vec<Params> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| *p == path)
            .map(|(_, params)| params.clone())
            .collect()
    }
}

const REQUESTS: &str = r#"[
    {"id": 7, "startLocation": "School::45.52,-122.68", "endLocation": "Zoo::45.51,-122.71",
     "travelDate": "2024-05-14", "arriveDestinationTime": "09:30:00",
     "leaveDestinationTime": "14:15:00", "numStudents": 85},
    {"id": 8, "startLocation": "School::45.52,-122.68", "endLocation": "Museum::45.50,-122.66",
     "travelDate": "2024-05-15"}
]"#;

async fn serve_store(store: FakeStore) -> DatastoreClient {
    let app = Router::new()
        .route(
            "/fieldTrip/getTrips",
            get(|State(s): State<FakeStore>, Query(q): Query<Params>| async move {
                s.record("getTrips", q);
                s.trips.to_string()
            }),
        )
        .route(
            "/fieldTrip",
            get(|State(s): State<FakeStore>, Query(q): Query<Params>| async move {
                s.record("getTrip", q);
                s.trip.to_string()
            }),
        )
        .route(
            "/fieldTrip/getRequests",
            get(|State(s): State<FakeStore>, Query(q): Query<Params>| async move {
                s.record("getRequests", q);
                REQUESTS
            }),
        )
        .route(
            "/fieldTrip/newTrip",
            post(|State(s): State<FakeStore>, Form(f): Form<Params>| async move {
                s.record("newTrip", f);
                "31"
            }),
        )
        .route(
            "/fieldTrip/addItinerary",
            post(|State(s): State<FakeStore>, Form(f): Form<Params>| async move {
                s.record("addItinerary", f);
                "{}"
            }),
        )
        .route(
            "/fieldTrip/setOutboundTrip",
            post(|State(s): State<FakeStore>, Form(f): Form<Params>| async move {
                s.record("setOutboundTrip", f);
                "{}"
            }),
        )
        .with_state(store);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    DatastoreClient::new(
        DatastoreConfig::new(format!("http://{addr}")),
        Arc::new(StaticCredentials::new("dispatcher", "s3cret")),
    )
    .unwrap()
}

async fn service(capacity: u32, store: FakeStore) -> FieldTripService<FleetPlanner> {
    let datastore = serve_store(store).await;
    FieldTripService::new(
        FleetPlanner::new(capacity),
        datastore,
        GroupPlanConfig::default(),
    )
}

fn store_with_trips(trips: &str) -> FakeStore {
    FakeStore {
        trips: Arc::new(trips.to_string()),
        ..FakeStore::default()
    }
}

#[tokio::test]
async fn plan_avoids_vehicles_saved_for_the_same_day() {
    let store = store_with_trips(
        r#"[{"id": 4, "groupItineraries": [{"passengers": 40, "itinData": "",
            "trips": [{"agencyAndId": "TriMet_1", "fromStopIndex": 1, "toStopIndex": 3}]}]}]"#,
    );
    let svc = service(40, store.clone()).await;

    let plan = svc.plan(query("School::45.52,-122.68"), Some(100)).await.unwrap();

    let sizes: Vec<u32> = plan.itineraries().iter().map(|i| i.group_size).collect();
    assert_eq!(sizes, vec![40, 40, 20]);
    assert_eq!(store.calls("getTrips")[0]["date"], "2024-05-14");

    let calls = svc.planner.calls.lock().unwrap();
    let first_bans: Vec<String> = calls[0].1.iter().map(|s| s.trip_id.to_string()).collect();
    assert_eq!(first_bans, vec!["TriMet_1"]);
    assert_eq!(calls[2].1.len(), 3);
    drop(calls);

    assert_eq!(svc.current_plan().await, Some(plan));
}

#[tokio::test]
async fn default_group_size_applies() {
    let svc = service(30, store_with_trips("[]"))
        .await
        .with_default_group_size(45);

    let plan = svc.plan(query("School::45.52,-122.68"), None).await.unwrap();

    assert_eq!(plan.group_size(), 45);
    assert_eq!(plan.len(), 2);
}

#[tokio::test]
async fn new_session_cancels_running_one() {
    let svc = Arc::new(service(50, store_with_trips("[]")).await);

    let stalled = tokio::spawn({
        let svc = svc.clone();
        async move { svc.plan(query(STALL), Some(20)).await }
    });
    while svc.planner.calls.lock().unwrap().is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let plan = svc.plan(query("School::45.52,-122.68"), Some(20)).await.unwrap();

    let err = stalled.await.unwrap().unwrap_err();
    assert!(matches!(
        err,
        FieldTripError::Planning(GroupPlanError::Cancelled { .. })
    ));
    assert_eq!(svc.current_plan().await, Some(plan));
}

#[tokio::test]
async fn failed_plan_leaves_no_current_plan() {
    let svc = service(0, store_with_trips("[]")).await;

    let err = svc.plan(query("School::45.52,-122.68"), Some(10)).await.unwrap_err();

    assert!(matches!(
        err,
        FieldTripError::Planning(GroupPlanError::InvalidCapacity { .. })
    ));
    assert_eq!(svc.current_plan().await, None);
}

#[tokio::test]
async fn save_requires_a_plan() {
    let svc = service(40, store_with_trips("[]")).await;
    assert!(matches!(svc.save().await, Err(FieldTripError::NoCurrentPlan)));
}

#[tokio::test]
async fn render_trip_makes_saved_plan_current() {
    let itin = bus_itinerary("TriMet_15");
    let data = codec::encode(&serde_json::to_string(&itinerary_to_dto(&itin)).unwrap());
    let trip = serde_json::json!({
        "id": 12,
        "passengers": 25,
        "queryParams": serde_json::to_string(&query("School::45.52,-122.68")).unwrap(),
        "groupItineraries": [{"passengers": 25, "itinData": data, "trips": []}],
    });
    let store = FakeStore {
        trip: Arc::new(trip.to_string()),
        ..FakeStore::default()
    };
    let svc = service(40, store.clone()).await;

    let plan = svc.render_trip(12).await.unwrap();

    assert_eq!(store.calls("getTrip")[0]["id"], "12");
    assert_eq!(plan.group_size(), 25);
    assert_eq!(plan.itineraries()[0].itinerary, itin);
    assert_eq!(svc.current_plan().await, Some(plan));
}

#[test]
fn outbound_query_arrives_by_destination_time() {
    let requests: Vec<FieldTripRequestDto> = serde_json::from_str(REQUESTS).unwrap();

    let query = request_query(&requests[0], TripDirection::Outbound).unwrap();

    assert_eq!(query.from_place, "School::45.52,-122.68");
    assert_eq!(query.to_place, "Zoo::45.51,-122.71");
    assert_eq!(query.date, date());
    assert_eq!(query.time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    assert!(query.arrive_by);
}

#[test]
fn inbound_query_departs_destination() {
    let requests: Vec<FieldTripRequestDto> = serde_json::from_str(REQUESTS).unwrap();

    let query = request_query(&requests[0], TripDirection::Inbound).unwrap();

    assert_eq!(query.from_place, "Zoo::45.51,-122.71");
    assert_eq!(query.to_place, "School::45.52,-122.68");
    assert_eq!(query.time, NaiveTime::from_hms_opt(14, 15, 0).unwrap());
    assert!(!query.arrive_by);
}

#[test]
fn request_without_times_cannot_be_planned() {
    let requests: Vec<FieldTripRequestDto> = serde_json::from_str(REQUESTS).unwrap();

    let err = request_query(&requests[1], TripDirection::Inbound).unwrap_err();

    assert!(matches!(
        err,
        FieldTripError::MissingRequestTime {
            id: 8,
            field: "leaveDestinationTime"
        }
    ));
}

#[tokio::test]
async fn plan_outbound_uses_student_count() {
    let svc = service(50, store_with_trips("[]")).await;

    let plan = svc.plan_outbound(7).await.unwrap();

    assert_eq!(plan.group_size(), 85);
    assert!(plan.query().arrive_by);
    assert!(matches!(
        svc.plan_inbound(99).await,
        Err(FieldTripError::RequestNotFound(99))
    ));
}

#[tokio::test]
async fn save_request_trip_saves_then_assigns() {
    let store = store_with_trips("[]");
    let svc = service(50, store.clone()).await;
    svc.plan_outbound(7).await.unwrap();

    let trip_id = svc.save_request_trip(7, TripDirection::Outbound).await.unwrap();

    assert_eq!(trip_id, 31);
    assert_eq!(store.calls("newTrip").len(), 1);
    assert_eq!(store.calls("addItinerary").len(), 2);
    let assigned = store.calls("setOutboundTrip");
    assert_eq!(assigned[0]["requestId"], "7");
    assert_eq!(assigned[0]["tripId"], "31");
}
