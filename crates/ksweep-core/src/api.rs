//! Collaborator interfaces for the external ticket tracker and build
//! system.
//!
//! Everything the engine knows about the outside world goes through these
//! two traits, so test doubles are compile-time checked and the engine
//! itself never touches the network. A `dry_run` flag is threaded through
//! every mutating call: implementations must log the same way but issue no
//! external mutation when it is set.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::config::SweepConfig;
use crate::error::Result;
use crate::ticket::{CloneTicket, TrackerTicket};

/// Ticket-tracker operations the sweep engine depends on.
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// Run a clone-discovery query, returning tickets in server order.
    async fn search_clones(&self, query: &str) -> Result<Vec<CloneTicket>>;

    /// Fetch a single clone ticket by key. `NotFound` when the key does not
    /// exist.
    async fn get_clone(&self, key: &str) -> Result<CloneTicket>;

    /// Run a tracker-discovery query, returning tickets in server order.
    async fn search_trackers(&self, query: &str) -> Result<Vec<TrackerTicket>>;

    /// Fetch a tracker ticket by key.
    async fn get_tracker(&self, key: &str) -> Result<TrackerTicket>;

    /// Transition a clone to `target_status`, attaching an explanatory
    /// comment.
    async fn move_clone(
        &self,
        dry_run: bool,
        key: &str,
        target_status: &str,
        comment: &str,
    ) -> Result<()>;

    /// Add a comment to any ticket.
    async fn comment(&self, dry_run: bool, key: &str, body: &str) -> Result<()>;

    /// Downstream bookkeeping once every build of a tracker has reached the
    /// production tag. Implementations are expected to be idempotent: a
    /// re-swept tracker must not accumulate duplicate comments or moves.
    async fn process_shipped_tracker(
        &self,
        dry_run: bool,
        config: &SweepConfig,
        tracker: &TrackerTicket,
        nvrs: &[String],
        prod_tag: &str,
    ) -> Result<()>;
}

/// Build-tag lookups against the Brew/Koji hub.
#[async_trait]
pub trait BuildTagApi: Send + Sync {
    /// Current tag sets for the given builds: one set per input NVR, in the
    /// same order. Never cached across runs; tag membership changing
    /// between runs is the entire point of re-sweeping.
    async fn builds_tags(&self, nvrs: &[String]) -> Result<Vec<HashSet<String>>>;
}
