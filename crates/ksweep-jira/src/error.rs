//! Error types for the Jira client.

use thiserror::Error;

/// Errors that can occur talking to Jira.
#[derive(Error, Debug)]
pub enum JiraError {
    /// Issue key does not exist
    #[error("issue not found: {0}")]
    NotFound(String),

    /// The workflow offers no transition to the requested status
    #[error("no transition to {target} available on {key}")]
    NoTransition { key: String, target: String },

    /// Token could not be turned into an Authorization header
    #[error("invalid credential: {0}")]
    Credential(#[from] reqwest::header::InvalidHeaderValue),

    /// Transport or server-side failure
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for JiraError {
    fn from(err: reqwest::Error) -> Self {
        JiraError::Http(err.to_string())
    }
}

impl From<JiraError> for ksweep_core::SweepError {
    fn from(err: JiraError) -> Self {
        match err {
            JiraError::NotFound(key) => ksweep_core::SweepError::NotFound(key),
            other => ksweep_core::SweepError::Api(other.to_string()),
        }
    }
}
