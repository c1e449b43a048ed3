//! Tab-delimited sweep report.

use crate::reconcile::ReconcileOutcome;

/// One row of the sweep report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub key: String,
    pub status: String,
    pub summary: String,
}

/// Final report of one sweep: one row per considered clone, in discovery
/// order, reflecting post-reconciliation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub rows: Vec<ReportRow>,
}

impl SweepReport {
    pub fn from_outcomes(outcomes: &[ReconcileOutcome]) -> Self {
        Self {
            rows: outcomes
                .iter()
                .map(|outcome| ReportRow {
                    key: outcome.ticket.key.clone(),
                    status: outcome.ticket.status.name().to_string(),
                    summary: outcome.ticket.summary.clone(),
                })
                .collect(),
        }
    }

    /// Render as `key\tstatus\tsummary` lines with a single final newline.
    /// Input order is preserved; callers sort beforehand when stable
    /// cross-run output matters.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&row.key);
            out.push('\t');
            out.push_str(&row.status);
            out.push('\t');
            out.push_str(&row.summary);
            out.push('\n');
        }
        out
    }
}
