//! KSWEEP core library
//!
//! Sweep-and-reconcile engine for early-kernel bug clones: discover the
//! clone tickets belonging to a set of kmaint trackers, classify each
//! tracker's builds against the candidate/production Brew tags, advance
//! clone workflow status where warranted, and render a tab-delimited
//! report. All external I/O goes through the collaborator traits in
//! [`api`]; the Jira and Brew implementations live in their own crates.

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod query;
pub mod reconcile;
pub mod report;
pub mod sweep;
pub mod telemetry;
pub mod ticket;
pub mod tracker_text;

pub use api::{BuildTagApi, TicketApi};
pub use classify::{classify, classify_all, ShipState};
pub use config::{BugzillaSpec, SweepConfig, TargetSpec, TrackerSpec};
pub use error::{ConfigError, Result, SweepError};
pub use query::{build_clone_query, build_tracker_query};
pub use reconcile::{Decision, ReconcileOutcome, Reconciler, SweepFlags};
pub use report::{ReportRow, SweepReport};
pub use sweep::{SweepRunner, DEFAULT_CONCURRENCY};
pub use telemetry::init_tracing;
pub use ticket::{
    CloneTicket, Status, TrackerRef, TrackerTicket, CLONE_LABEL, TRACKER_LABEL_PREFIX,
};
pub use tracker_text::{parse_tracker_text, TrackerText};

/// KSWEEP version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
