//! Field trip datastore HTTP client.
//!
//! Every call carries the `userName`/`password` pair, fetched from the
//! credential provider per request. Reads are `GET`s with query parameters
//! and writes are form `POST`s.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::credentials::CredentialProvider;
use crate::domain::{GroupItinerary, GroupPlan};

use super::convert::{Form, itinerary_form, new_trip_form};
use super::error::DatastoreError;
use super::types::{FieldTripDto, FieldTripRequestDto};

/// Default base URL for a local datastore.
const DEFAULT_BASE_URL: &str = "http://localhost:9090";

/// Page size for listings.
const LIST_LIMIT: u32 = 100;

/// Configuration for the datastore client.
#[derive(Debug, Clone)]
pub struct DatastoreConfig {
    /// Base URL, without the `/fieldTrip` path
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DatastoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Which leg of a request a saved trip fulfils.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripDirection {
    /// From the school to the destination
    Outbound,
    /// Back to the school
    Inbound,
}

impl TripDirection {
    fn endpoint(self) -> &'static str {
        match self {
            TripDirection::Outbound => "setOutboundTrip",
            TripDirection::Inbound => "setInboundTrip",
        }
    }
}

impl std::str::FromStr for TripDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "outbound" => Ok(TripDirection::Outbound),
            "inbound" => Ok(TripDirection::Inbound),
            _ => Err(format!("unknown direction: {s}")),
        }
    }
}

/// Field trip datastore client.
#[derive(Clone)]
pub struct DatastoreClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for DatastoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatastoreClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl DatastoreClient {
    /// Create a new datastore client.
    pub fn new(
        config: DatastoreConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, DatastoreError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.is_empty() {
            format!("{}/fieldTrip", self.base_url)
        } else {
            format!("{}/fieldTrip/{endpoint}", self.base_url)
        }
    }

    /// Prepend the credential fields to `params`.
    fn authed(&self, params: Form) -> Result<Form, DatastoreError> {
        let creds = self.credentials.credentials()?;
        let mut form = vec![
            ("userName".to_string(), creds.user_name),
            ("password".to_string(), creds.password),
        ];
        form.extend(params);
        Ok(form)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: Form) -> Result<T, DatastoreError> {
        let request = self.http.get(self.url(endpoint)).query(&self.authed(params)?);
        let body = Self::send(request).await?;
        serde_json::from_str(&body).map_err(|e| DatastoreError::json(e, &body))
    }

    async fn post(&self, endpoint: &str, params: Form) -> Result<String, DatastoreError> {
        let request = self.http.post(self.url(endpoint)).form(&self.authed(params)?);
        Self::send(request).await
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<String, DatastoreError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DatastoreError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "datastore request failed");
            return Err(DatastoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }

    /// List saved trips, optionally only those departing on `date`.
    pub async fn get_trips(&self, date: Option<NaiveDate>) -> Result<Vec<FieldTripDto>, DatastoreError> {
        let mut params = vec![("limit".to_string(), LIST_LIMIT.to_string())];
        if let Some(date) = date {
            params.push(("date".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        let trips: Vec<FieldTripDto> = self.get("getTrips", params).await?;
        debug!(count = trips.len(), ?date, "loaded saved trips");
        Ok(trips)
    }

    /// Fetch one saved trip with its itineraries.
    pub async fn get_trip(&self, id: i64) -> Result<FieldTripDto, DatastoreError> {
        self.get("", vec![("id".to_string(), id.to_string())]).await
    }

    /// Create a trip record for `plan`, without itineraries. Returns its id.
    pub async fn new_trip(&self, plan: &GroupPlan) -> Result<i64, DatastoreError> {
        let creds = self.credentials.credentials()?;
        let body = self.post("newTrip", new_trip_form(plan, &creds.user_name)?).await?;
        parse_id(&body)
    }

    /// Attach one itinerary of `plan` to trip `trip_id`.
    pub async fn add_itinerary(
        &self,
        trip_id: i64,
        itinerary: &GroupItinerary,
    ) -> Result<(), DatastoreError> {
        self.post("addItinerary", itinerary_form(trip_id, itinerary)?)
            .await
            .map(drop)
    }

    /// Save a complete plan: a new trip plus all of its itineraries.
    ///
    /// Itineraries are posted concurrently. Fails on the first error, in
    /// which case the trip may have been saved with only some of them.
    pub async fn save_plan(&self, plan: &GroupPlan) -> Result<i64, DatastoreError> {
        let trip_id = self.new_trip(plan).await?;
        try_join_all(
            plan.itineraries()
                .iter()
                .map(|itin| self.add_itinerary(trip_id, itin)),
        )
        .await?;
        info!(trip_id, itineraries = plan.len(), "saved group plan");
        Ok(trip_id)
    }

    /// Delete a saved trip.
    pub async fn delete_trip(&self, id: i64) -> Result<(), DatastoreError> {
        self.post("deleteTrip", vec![("id".to_string(), id.to_string())])
            .await
            .map(drop)
    }

    /// List field trip requests.
    pub async fn get_requests(&self) -> Result<Vec<FieldTripRequestDto>, DatastoreError> {
        self.get("getRequests", vec![("limit".to_string(), LIST_LIMIT.to_string())])
            .await
    }

    /// Record `trip_id` as the trip fulfilling one direction of a request.
    pub async fn set_request_trip(
        &self,
        request_id: i64,
        direction: TripDirection,
        trip_id: i64,
    ) -> Result<(), DatastoreError> {
        self.post(
            direction.endpoint(),
            vec![
                ("requestId".to_string(), request_id.to_string()),
                ("tripId".to_string(), trip_id.to_string()),
            ],
        )
        .await
        .map(drop)
    }
}

/// Parse a created record id, answered either bare or as JSON.
fn parse_id(body: &str) -> Result<i64, DatastoreError> {
    let trimmed = body.trim().trim_matches('"');
    trimmed.parse().map_err(|_| DatastoreError::Json {
        message: "expected a trip id".to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}
