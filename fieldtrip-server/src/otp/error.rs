//! Planner client error types.

use super::convert::ConversionError;

/// Errors from the trip planner HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Planner rejected our credentials
    #[error("unauthorized by trip planner")]
    Unauthorized,

    /// Rate limited by the planner
    #[error("rate limited by trip planner")]
    RateLimited,

    /// Planner returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Planner answered but found no itinerary
    #[error("no itinerary found: {0}")]
    NoItinerary(String),

    /// Itinerary failed validation
    #[error("invalid itinerary: {0}")]
    Conversion(#[from] ConversionError),
}

impl OtpError {
    /// Returns true if the same request may succeed when retried.
    pub fn is_transient(&self) -> bool {
        match self {
            OtpError::Http(_) | OtpError::RateLimited => true,
            OtpError::Api { status, .. } => *status >= 500,
            OtpError::Unauthorized
            | OtpError::Json { .. }
            | OtpError::NoItinerary(_)
            | OtpError::Conversion(_) => false,
        }
    }
}
