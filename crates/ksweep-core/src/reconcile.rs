//! Clone reconciliation state machine.
//!
//! For each clone: resolve the owning tracker (memoized per key for the
//! duration of the run), classify the tracker's builds against the
//! candidate/production Brew tags, and advance the clone's workflow status
//! when warranted. Status only ever moves forward; a clone that is ahead of
//! the computed target is left alone.
//!
//! A failure while reconciling one clone is logged and excludes that clone
//! from mutation, but never aborts the sweep for its siblings; tracker
//! text is free-form and occasionally malformed.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::{BuildTagApi, TicketApi};
use crate::classify::{classify_all, ShipState};
use crate::config::SweepConfig;
use crate::error::{Result, SweepError};
use crate::ticket::{CloneTicket, Status, TrackerRef, TrackerTicket};
use crate::tracker_text::{parse_tracker_text, TrackerText};

/// Options controlling which side effects a sweep may perform.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepFlags {
    /// Apply status transitions to clone tickets.
    pub move_clones: bool,
    /// Mutate tracker tickets: linked comments on each move, and the
    /// shipped-tracker bookkeeping.
    pub update_tracker: bool,
    /// Compute, log and report decisions identically, but issue no external
    /// mutation.
    pub dry_run: bool,
}

/// What the reconciler decided for one clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Fix not yet in the candidate tag; reconsidered next sweep.
    Pending,
    /// Already at or past the target status.
    UpToDate,
    /// A transition is warranted but moves are disabled.
    Eligible { target: String },
    /// Transition applied (externally a no-op under dry-run).
    Moved { target: String },
    /// Excluded from mutation with a warning.
    Skipped { reason: String },
}

/// Result of reconciling one clone.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub ticket: CloneTicket,
    pub decision: Decision,
}

/// Everything the decision step needs about one tracker, fetched at most
/// once per run.
struct TrackerContext {
    tracker: TrackerTicket,
    text: TrackerText,
    ship_state: ShipState,
}

/// Per-tracker state shared by all clones of that tracker within one run.
///
/// The slot's mutex gives both at-most-one-fetch-per-key semantics and
/// serialization of tracker-ticket mutations.
#[derive(Default)]
struct TrackerSlot {
    context: Option<std::result::Result<Arc<TrackerContext>, String>>,
    shipped_processed: bool,
}

/// Reconciles clones against tracker/build state for one sweep pass.
pub struct Reconciler<'a> {
    tickets: &'a dyn TicketApi,
    builds: &'a dyn BuildTagApi,
    config: &'a SweepConfig,
    flags: SweepFlags,
    trackers: Mutex<HashMap<String, Arc<Mutex<TrackerSlot>>>>,
}

impl<'a> Reconciler<'a> {
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
            trackers: Mutex::new(HashMap::new()),
        }
    }

    /// Reconcile a single clone, returning its (possibly advanced) state and
    /// the decision taken. Never fails: errors become `Decision::Skipped`.
    pub async fn reconcile_clone(&self, mut clone: CloneTicket) -> ReconcileOutcome {
        let decision = match self.try_reconcile(&mut clone).await {
            Ok(decision) => decision,
            Err(err) => {
                warn!(event = "sweep.clone_skipped", key = %clone.key, error = %err);
                Decision::Skipped {
                    reason: err.to_string(),
                }
            }
        };
        ReconcileOutcome {
            ticket: clone,
            decision,
        }
    }

    async fn try_reconcile(&self, clone: &mut CloneTicket) -> Result<Decision> {
        let tracker_ref = clone.tracker()?.clone();
        let slot = self.slot(tracker_ref.key()).await;

        // Clones of the same tracker serialize here; independent trackers
        // proceed in parallel.
        let mut guard = slot.lock().await;

        let context = match guard.context.as_ref() {
            Some(Ok(context)) => Arc::clone(context),
            Some(Err(reason)) => {
                return Err(SweepError::Tracker {
                    key: tracker_ref.key().to_string(),
                    reason: reason.clone(),
                })
            }
            None => match self.load_context(tracker_ref.key()).await {
                Ok(context) => {
                    let context = Arc::new(context);
                    guard.context = Some(Ok(Arc::clone(&context)));
                    context
                }
                Err(err) => {
                    guard.context = Some(Err(err.to_string()));
                    return Err(err);
                }
            },
        };

        match context.ship_state {
            ShipState::NotCandidate => {
                debug!(event = "sweep.not_candidate", key = %clone.key, tracker = %tracker_ref);
                Ok(Decision::Pending)
            }
            ShipState::Candidate => {
                let comment = format!(
                    "Builds {} are available in {}. The fix for this bug should be present in them.",
                    context.text.nvrs.join(", "),
                    self.config.target.candidate_brew_tag,
                );
                self.advance(clone, &tracker_ref, "MODIFIED", &comment, |s| {
                    s.accepts_modified()
                })
                .await
            }
            ShipState::Shipped => {
                self.process_shipped(&mut guard, &context).await;
                let comment = format!(
                    "Builds {} have been tagged into {}, which means they have shipped. Closing this bug.",
                    context.text.nvrs.join(", "),
                    self.config.target.prod_brew_tag,
                );
                self.advance(clone, &tracker_ref, "CLOSED", &comment, |s| !s.is_closed())
                    .await
            }
        }
    }

    /// Move a clone forward to `target` when its current status is eligible.
    async fn advance(
        &self,
        clone: &mut CloneTicket,
        tracker_ref: &TrackerRef,
        target: &str,
        comment: &str,
        eligible: impl Fn(&Status) -> bool,
    ) -> Result<Decision> {
        if !eligible(&clone.status) {
            debug!(event = "sweep.up_to_date", key = %clone.key, status = %clone.status);
            return Ok(Decision::UpToDate);
        }
        if !self.flags.move_clones {
            info!(event = "sweep.move_required", key = %clone.key, from = %clone.status, target = %target);
            return Ok(Decision::Eligible {
                target: target.to_string(),
            });
        }

        info!(
            event = "sweep.move",
            key = %clone.key,
            from = %clone.status,
            target = %target,
            dry_run = self.flags.dry_run,
        );
        self.tickets
            .move_clone(self.flags.dry_run, &clone.key, target, comment)
            .await
            .map_err(|err| SweepError::Mutation {
                key: clone.key.clone(),
                target: target.to_string(),
                reason: err.to_string(),
            })?;

        if self.flags.update_tracker {
            let body = format!("{} has been moved to {}.", clone.key, target);
            // The move already happened; a failed tracker comment is only a
            // warning.
            if let Err(err) = self
                .tickets
                .comment(self.flags.dry_run, tracker_ref.key(), &body)
                .await
            {
                warn!(event = "sweep.tracker_comment_failed", tracker = %tracker_ref, error = %err);
            }
        }

        clone.status = Status::from_name(target);
        Ok(Decision::Moved {
            target: target.to_string(),
        })
    }

    /// Fire the shipped-tracker bookkeeping at most once per tracker per
    /// run. Failures are logged; a re-sweep is the retry mechanism.
    async fn process_shipped(&self, guard: &mut TrackerSlot, context: &TrackerContext) {
        if guard.shipped_processed || !self.flags.update_tracker {
            return;
        }
        guard.shipped_processed = true;
        info!(
            event = "sweep.tracker_shipped",
            tracker = %context.tracker.key,
            tag = %self.config.target.prod_brew_tag,
            dry_run = self.flags.dry_run,
        );
        if let Err(err) = self
            .tickets
            .process_shipped_tracker(
                self.flags.dry_run,
                self.config,
                &context.tracker,
                &context.text.nvrs,
                &self.config.target.prod_brew_tag,
            )
            .await
        {
            warn!(event = "sweep.tracker_shipped_failed", tracker = %context.tracker.key, error = %err);
        }
    }

    /// Fetch and classify a tracker: ticket, parsed text, and the aggregate
    /// shipment state of its builds.
    async fn load_context(&self, key: &str) -> Result<TrackerContext> {
        let tracker = self.tickets.get_tracker(key).await?;
        let text = parse_tracker_text(&tracker)?;
        let tag_sets = self.builds.builds_tags(&text.nvrs).await?;
        if tag_sets.len() != text.nvrs.len() {
            return Err(SweepError::MissingBuilds {
                tracker: key.to_string(),
                want: text.nvrs.len(),
                got: tag_sets.len(),
            });
        }
        let ship_state = classify_all(&tag_sets, &self.config.target);
        info!(
            event = "sweep.tracker_resolved",
            tracker = %key,
            nvrs = ?text.nvrs,
            bz_ids = ?text.bz_ids,
            state = ?ship_state,
        );
        Ok(TrackerContext {
            tracker,
            text,
            ship_state,
        })
    }

    async fn slot(&self, key: &str) -> Arc<Mutex<TrackerSlot>> {
        let mut map = self.trackers.lock().await;
        Arc::clone(
            map.entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(TrackerSlot::default()))),
        )
    }
}
