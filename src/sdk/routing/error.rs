use serde::Deserialize;
use thiserror::Error;

// Helper struct to parse the JSON error response from the mapping API
#[derive(Deserialize, Debug)]
pub struct ApiErrorPayload {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Error, Debug)]
pub enum RoutingError {
    #[error("Directions need both endpoints; {0} is not set")]
    MissingEndpoint(&'static str),

    #[error("No geocode results for query: {0}")]
    NoMatch(String),

    #[error("No route found in success response")]
    NoRoute,

    // This variant holds the structured error from the API
    #[error("API Error ({code}): {message}")]
    ApiError { code: String, message: String },

    // A fallback for when we get an error that isn't in the expected JSON format
    #[error("Unstructured API Error: {0}")]
    RawApiError(String),

    #[error("Underlying request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}
