//! Trip planner HTTP client.
//!
//! Issues single-itinerary `/plan` requests with the current ban set and
//! converts the answer to domain types.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{BanScope, BannedSegments, Itinerary, PlanQuery};
use crate::planner::{ItineraryPlanner, PlanError};

use super::convert::convert_itinerary;
use super::error::OtpError;
use super::types::PlanResponse;

/// Default base URL for a local planner.
const DEFAULT_BASE_URL: &str = "http://localhost:8080/otp-rest-servlet/ws";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the planner client.
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Base URL of the planner's web service
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// How banned segments are sent
    pub ban_scope: BanScope,
}

impl OtpConfig {
    /// Create a new config pointing at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
            ban_scope: BanScope::default(),
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set how banned segments are sent.
    pub fn with_ban_scope(mut self, scope: BanScope) -> Self {
        self.ban_scope = scope;
        self
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Trip planner API client.
#[derive(Debug, Clone)]
pub struct OtpClient {
    http: reqwest::Client,
    base_url: String,
    ban_scope: BanScope,
    semaphore: Arc<Semaphore>,
}

impl OtpClient {
    /// Create a new planner client with the given configuration.
    pub fn new(config: OtpConfig) -> Result<Self, OtpError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ban_scope: config.ban_scope,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Build the query string for one planning request.
    pub fn plan_params(
        &self,
        query: &PlanQuery,
        banned: &BannedSegments,
    ) -> Vec<(&'static str, String)> {
        let mut params = query.to_params();
        params.push(("numItineraries", "1".to_string()));
        if let Some(trips) = banned.to_query_param(self.ban_scope) {
            params.push(("bannedTrips", trips));
        }
        params
    }

    /// Plan the best itinerary for `query` that avoids every banned segment.
    pub async fn plan(
        &self,
        query: &PlanQuery,
        banned: &BannedSegments,
    ) -> Result<Itinerary, OtpError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| OtpError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/plan", self.base_url);
        debug!(banned = banned.len(), "requesting itinerary");

        let response = self
            .http
            .get(&url)
            .query(&self.plan_params(query, banned))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(OtpError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OtpError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OtpError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: PlanResponse = serde_json::from_str(&body).map_err(|e| OtpError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })?;

        if let Some(error) = parsed.error {
            return Err(OtpError::NoItinerary(
                error.msg.unwrap_or_else(|| "planner reported an error".to_string()),
            ));
        }

        let itinerary = parsed
            .plan
            .and_then(|plan| plan.itineraries.into_iter().next())
            .ok_or_else(|| OtpError::NoItinerary("empty plan".to_string()))?;

        Ok(convert_itinerary(&itinerary)?)
    }
}

impl From<OtpError> for PlanError {
    fn from(err: OtpError) -> Self {
        match err {
            e if e.is_transient() => PlanError::Unavailable(e.to_string()),
            OtpError::NoItinerary(msg) => PlanError::NoItinerary(msg),
            e @ (OtpError::Json { .. } | OtpError::Conversion(_)) => {
                PlanError::InvalidResponse(e.to_string())
            }
            e => PlanError::Rejected(e.to_string()),
        }
    }
}

impl ItineraryPlanner for OtpClient {
    async fn plan_once(
        &self,
        query: &PlanQuery,
        banned: &BannedSegments,
    ) -> Result<Itinerary, PlanError> {
        Ok(self.plan(query, banned).await?)
    }
}
