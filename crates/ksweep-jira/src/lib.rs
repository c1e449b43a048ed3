//! Jira REST client for the KSWEEP sweep engine.
//!
//! Thin glue between the engine's [`ksweep_core::TicketApi`] interface and
//! the Jira REST v2 API. No sweep logic lives here; the interesting parts
//! are pagination, transition resolution and dry-run handling.

pub mod client;
pub mod error;
pub mod models;

pub use client::{JiraClient, JiraConfig};
pub use error::JiraError;
pub use models::{IssueBean, IssueFields, NamedField};
