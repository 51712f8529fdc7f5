use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = ResourceError> = std::result::Result<T, E>;

/// Everything that can go wrong while invoking a resource action.
///
/// Nothing is retried or reinterpreted; the caller gets the failure as the
/// transport reported it.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The request never produced a response (connect, timeout, middleware).
    #[error("Request error: {0}")]
    Network(#[from] reqwest_middleware::Error),

    /// The server answered with a non-2xx status.
    #[error("API request failed. Status: {status}, Body: {body}")]
    HttpStatus { status: StatusCode, body: String },

    #[error("Error decoding response: '{source}'. Response body was: '{body}'")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// `query`-style actions must answer with an array, all others with a non-array.
    #[error("Response of action '{action}' has the wrong shape (expected array: {expected_array})")]
    ShapeMismatch { action: String, expected_array: bool },

    #[error("Error encoding request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Base url '{0}' cannot carry a path")]
    InvalidUrl(String),
}

impl ResourceError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ResourceError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ResourceError::Network(_))
    }
}

impl From<reqwest::Error> for ResourceError {
    fn from(e: reqwest::Error) -> Self {
        ResourceError::Network(reqwest_middleware::Error::Reqwest(e))
    }
}
