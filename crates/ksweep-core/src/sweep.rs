//! Sweep orchestration: resolve the clone set, reconcile it, report.

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::api::{BuildTagApi, TicketApi};
use crate::config::SweepConfig;
use crate::error::{Result, SweepError};
use crate::query::{build_clone_query, build_tracker_query};
use crate::reconcile::{Decision, Reconciler, SweepFlags};
use crate::report::SweepReport;
use crate::ticket::{CloneTicket, CLONE_LABEL};

/// Default bound on concurrent clone reconciliation. Sweeps are small and
/// the ticket tracker is the bottleneck; unbounded fan-out would only get
/// the client throttled.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// One sweep pass over the clone set.
pub struct SweepRunner<'a> {
    tickets: &'a dyn TicketApi,
    builds: &'a dyn BuildTagApi,
    config: &'a SweepConfig,
    flags: SweepFlags,
    concurrency: usize,
}

impl<'a> SweepRunner<'a> {
    pub fn new(
        tickets: &'a dyn TicketApi,
        builds: &'a dyn BuildTagApi,
        config: &'a SweepConfig,
        flags: SweepFlags,
    ) -> Self {
        Self {
            tickets,
            builds,
            config,
            flags,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Override the reconciliation worker bound.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run one sweep.
    ///
    /// Explicit clone keys bypass query discovery (targeted re-runs and
    /// debugging); otherwise trackers are resolved, from `tracker_keys` or
    /// by query, and the clone-discovery query is executed. The report
    /// lists every considered clone in discovery order with its
    /// post-reconciliation status.
    pub async fn run(&self, explicit_keys: &[String], tracker_keys: &[String]) -> Result<SweepReport> {
        self.config.validate().map_err(SweepError::Configuration)?;

        let clones = if explicit_keys.is_empty() {
            self.discover(tracker_keys).await?
        } else {
            self.resolve_explicit(explicit_keys).await?
        };
        info!(event = "sweep.clones_resolved", count = clones.len());

        let reconciler = Reconciler::new(self.tickets, self.builds, self.config, self.flags);
        let outcomes: Vec<_> = stream::iter(clones)
            .map(|clone| reconciler.reconcile_clone(clone))
            .buffered(self.concurrency)
            .collect()
            .await;

        let moved = outcomes
            .iter()
            .filter(|o| matches!(o.decision, Decision::Moved { .. }))
            .count();
        let skipped = outcomes
            .iter()
            .filter(|o| matches!(o.decision, Decision::Skipped { .. }))
            .count();
        info!(
            event = "sweep.finished",
            considered = outcomes.len(),
            moved = moved,
            skipped = skipped,
            dry_run = self.flags.dry_run,
        );

        Ok(SweepReport::from_outcomes(&outcomes))
    }

    /// Fetch explicitly requested clones and check them against the
    /// configured filter; a key outside the sweep's scope is an operator
    /// mistake, not a per-clone warning.
    async fn resolve_explicit(&self, keys: &[String]) -> Result<Vec<CloneTicket>> {
        let mut clones = Vec::with_capacity(keys.len());
        for key in keys {
            let clone = self.tickets.get_clone(key).await?;
            self.check_in_scope(&clone)?;
            clones.push(clone);
        }
        Ok(clones)
    }

    fn check_in_scope(&self, clone: &CloneTicket) -> Result<()> {
        let target = &self.config.target;
        if !clone.has_label(CLONE_LABEL) {
            return Err(SweepError::InvalidInput(format!(
                "{} is not labeled {}",
                clone.key, CLONE_LABEL
            )));
        }
        if clone.project != target.project {
            return Err(SweepError::InvalidInput(format!(
                "{} belongs to project {}, expected {}",
                clone.key, clone.project, target.project
            )));
        }
        if !clone.components.iter().any(|c| c == &target.component) {
            return Err(SweepError::InvalidInput(format!(
                "{} has no component {}",
                clone.key, target.component
            )));
        }
        if !clone.target_versions.iter().any(|v| v == &target.target_release) {
            return Err(SweepError::InvalidInput(format!(
                "{} has no target version {}",
                clone.key, target.target_release
            )));
        }
        Ok(())
    }

    /// Discover the clone set: resolve tracker keys (given or queried),
    /// then run the clone query.
    async fn discover(&self, tracker_keys: &[String]) -> Result<Vec<CloneTicket>> {
        let keys: Vec<String> = if tracker_keys.is_empty() {
            let query = build_tracker_query(self.config);
            debug!(event = "sweep.tracker_query", query = %query);
            let trackers = self
                .tickets
                .search_trackers(&query)
                .await
                .map_err(|err| SweepError::Discovery(err.to_string()))?;
            trackers.into_iter().map(|t| t.key).collect()
        } else {
            tracker_keys.to_vec()
        };

        if keys.is_empty() {
            info!(event = "sweep.no_trackers");
            return Ok(Vec::new());
        }

        let query = build_clone_query(&keys, self.config)?;
        info!(event = "sweep.clone_query", query = %query);
        self.tickets
            .search_clones(&query)
            .await
            .map_err(|err| SweepError::Discovery(err.to_string()))
    }
}
