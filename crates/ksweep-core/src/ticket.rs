//! Ticket-side domain entities.
//!
//! Clone and tracker tickets are owned by the external ticket tracker; the
//! engine reads them and transitions status, nothing else. The tracker join
//! key embedded in clone labels is parsed once at load time into
//! [`TrackerRef`] rather than re-derived at each decision point.

use crate::error::{Result, SweepError};

/// Label that marks a downstream issue as a cloned kernel bug.
pub const CLONE_LABEL: &str = "art:cloned-kernel-bug";

/// Label prefix encoding the owning tracker: `art:kmaint:<KEY>`.
pub const TRACKER_LABEL_PREFIX: &str = "art:kmaint:";

/// Typed reference to the tracker ticket that owns a clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackerRef(String);

impl TrackerRef {
    /// Extract the tracker reference from a clone's labels, if present.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Option<Self> {
        labels
            .iter()
            .find_map(|l| l.as_ref().strip_prefix(TRACKER_LABEL_PREFIX))
            .filter(|k| !k.is_empty())
            .map(|k| Self(k.to_string()))
    }

    /// The tracker ticket key, e.g. `KMAINT-1`.
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Workflow status of a ticket.
///
/// Only the states the engine acts on are distinguished; everything else
/// (`POST`, `ON_QA`, `Verified`, ...) is carried opaquely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    New,
    Assigned,
    Modified,
    Closed,
    Other(String),
}

impl Status {
    /// Map a workflow status name as reported by the ticket tracker.
    pub fn from_name(name: &str) -> Self {
        match name {
            "New" => Status::New,
            "Assigned" => Status::Assigned,
            "MODIFIED" => Status::Modified,
            "CLOSED" => Status::Closed,
            other => Status::Other(other.to_string()),
        }
    }

    /// The status name as the ticket tracker spells it.
    pub fn name(&self) -> &str {
        match self {
            Status::New => "New",
            Status::Assigned => "Assigned",
            Status::Modified => "MODIFIED",
            Status::Closed => "CLOSED",
            Status::Other(name) => name,
        }
    }

    /// Whether a candidate-stage fix may advance this ticket to MODIFIED.
    /// Tickets already in QA or beyond are never moved backward.
    pub fn accepts_modified(&self) -> bool {
        matches!(self, Status::New | Status::Assigned)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Status::Closed)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A downstream clone ticket: one kernel bug instance tied to a product
/// release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneTicket {
    pub key: String,
    pub project: String,
    pub status: Status,
    pub labels: Vec<String>,
    pub components: Vec<String>,
    pub target_versions: Vec<String>,
    pub summary: String,
    /// Owning tracker, parsed from the labels at load time.
    pub tracker: Option<TrackerRef>,
}

impl CloneTicket {
    /// Build a clone from raw ticket fields, extracting the tracker join key.
    #[allow(clippy::too_many_arguments)]
    pub fn from_fields(
        key: impl Into<String>,
        project: impl Into<String>,
        status_name: &str,
        labels: Vec<String>,
        components: Vec<String>,
        target_versions: Vec<String>,
        summary: impl Into<String>,
    ) -> Self {
        let tracker = TrackerRef::from_labels(&labels);
        Self {
            key: key.into(),
            project: project.into(),
            status: Status::from_name(status_name),
            labels,
            components,
            target_versions,
            summary: summary.into(),
            tracker,
        }
    }

    /// The owning tracker, or `MalformedLabel` when no `art:kmaint:` label
    /// exists.
    pub fn tracker(&self) -> Result<&TrackerRef> {
        self.tracker.as_ref().ok_or_else(|| SweepError::MalformedLabel {
            key: self.key.clone(),
        })
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// The upstream kmaint tracker ticket, parent of one or more clones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerTicket {
    pub key: String,
    pub status: Status,
    pub summary: String,
    pub description: String,
}
