//! Datastore client error types.

use crate::credentials::CredentialError;
use crate::otp::ConversionError;

use super::codec::CodecError;

/// Errors from the field trip datastore.
#[derive(Debug, thiserror::Error)]
pub enum DatastoreError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials could not be obtained
    #[error("no datastore credentials: {0}")]
    Credentials(#[from] CredentialError),

    /// Datastore rejected the credentials
    #[error("unauthorized by datastore")]
    Unauthorized,

    /// Datastore returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response or stored JSON could not be parsed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Stored itinerary payload is corrupt
    #[error("corrupt itinerary data: {0}")]
    Codec(#[from] CodecError),

    /// Stored itinerary failed validation
    #[error("invalid stored itinerary: {0}")]
    Conversion(#[from] ConversionError),
}

impl DatastoreError {
    pub(crate) fn json(err: serde_json::Error, body: &str) -> Self {
        DatastoreError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DatastoreError::Api {
            status: 404,
            message: "no such trip".into(),
        };
        assert_eq!(err.to_string(), "API error 404: no such trip");

        let err = DatastoreError::from(CodecError::OddLength(3));
        assert_eq!(
            err.to_string(),
            "corrupt itinerary data: code stream has odd length 3"
        );

        let source = serde_json::from_str::<u32>("[").unwrap_err();
        let err = DatastoreError::json(source, "[");
        assert!(err.to_string().contains("JSON parse error"));
        assert!(matches!(err, DatastoreError::Json { body: Some(b), .. } if b == "["));
    }
}
