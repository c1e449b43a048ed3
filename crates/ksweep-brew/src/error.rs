//! Error types for the Brew hub client.

use thiserror::Error;

/// Errors that can occur talking to the Brew/Koji hub.
#[derive(Error, Debug)]
pub enum BrewError {
    /// The hub returned an XML-RPC fault
    #[error("hub fault: {0}")]
    Fault(String),

    /// The response did not look like a listTags result
    #[error("unexpected hub response: {0}")]
    Response(String),

    /// Transport or server-side failure
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for BrewError {
    fn from(err: reqwest::Error) -> Self {
        BrewError::Http(err.to_string())
    }
}

impl From<BrewError> for ksweep_core::SweepError {
    fn from(err: BrewError) -> Self {
        ksweep_core::SweepError::Api(err.to_string())
    }
}
