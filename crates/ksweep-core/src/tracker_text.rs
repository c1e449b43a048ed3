//! Extraction of build NVRs and Bugzilla references from tracker ticket
//! text.
//!
//! Tracker summaries follow the shape
//! `kernel-5.14.0-284.28.1.el9_2 and kernel-rt-5.14.0-284.28.1.el9_2 early
//! delivery via OCP`; descriptions reference Bugzilla either by full
//! `show_bug.cgi?id=<N>` URL or by a `bz<N>` shorthand. Both fields are
//! free-form, so extraction failures are per-clone warnings, never fatal.

use regex::Regex;

use crate::error::{Result, SweepError};
use crate::ticket::TrackerTicket;

/// Builds and bug references extracted from one tracker ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerText {
    /// Kernel build NVRs named in the summary, in order of appearance.
    pub nvrs: Vec<String>,
    /// Bugzilla IDs referenced in the description, deduplicated, in order
    /// of first appearance.
    pub bz_ids: Vec<u64>,
}

/// Parse the summary and description of a tracker ticket.
///
/// # Errors
///
/// `TrackerParse` when the summary names no kernel builds.
pub fn parse_tracker_text(tracker: &TrackerTicket) -> Result<TrackerText> {
    let nvrs = extract_nvrs(&tracker.summary);
    if nvrs.is_empty() {
        return Err(SweepError::TrackerParse {
            key: tracker.key.clone(),
            summary: tracker.summary.clone(),
        });
    }
    Ok(TrackerText {
        nvrs,
        bz_ids: extract_bz_ids(&tracker.description),
    })
}

/// Pull `kernel-*` and `kernel-rt-*` NVR tokens out of a summary line.
fn extract_nvrs(summary: &str) -> Vec<String> {
    let nvr_re = Regex::new(r"\bkernel(?:-rt)?-\d[\w.-]*").expect("static pattern");
    nvr_re
        .find_iter(summary)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Pull Bugzilla IDs out of a description: `id=<N>` URL parameters and
/// `bz<N>` shorthand tokens.
fn extract_bz_ids(description: &str) -> Vec<u64> {
    let bz_re = Regex::new(r"(?:id=|\bbz)(\d+)").expect("static pattern");
    let mut seen = Vec::new();
    for captures in bz_re.captures_iter(description) {
        if let Ok(id) = captures[1].parse::<u64>() {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::Status;

    fn tracker(summary: &str, description: &str) -> TrackerTicket {
        TrackerTicket {
            key: "KMAINT-1".to_string(),
            status: Status::from_name("New"),
            summary: summary.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_parses_kernel_and_kernel_rt() {
        let text = parse_tracker_text(&tracker(
            "kernel-1.0.1-1.fake and kernel-rt-1.0.1-1.fake early delivery via OCP",
            "Fixes bugzilla.redhat.com/show_bug.cgi?id=5 and bz6.",
        ))
        .expect("parse");
        assert_eq!(text.nvrs, vec!["kernel-1.0.1-1.fake", "kernel-rt-1.0.1-1.fake"]);
        assert_eq!(text.bz_ids, vec![5, 6]);
    }

    #[test]
    fn test_parses_real_shape_nvrs() {
        let text = parse_tracker_text(&tracker(
            "kernel-5.14.0-284.30.1.el9_2 and kernel-rt-5.14.0-284.30.1.el9_2 early delivery via OCP 4.14",
            "",
        ))
        .expect("parse");
        assert_eq!(
            text.nvrs,
            vec!["kernel-5.14.0-284.30.1.el9_2", "kernel-rt-5.14.0-284.30.1.el9_2"]
        );
        assert!(text.bz_ids.is_empty());
    }

    #[test]
    fn test_summary_without_builds_rejected() {
        let err = parse_tracker_text(&tracker("please ship the kernel soon", "")).unwrap_err();
        match err {
            SweepError::TrackerParse { key, .. } => assert_eq!(key, "KMAINT-1"),
            other => panic!("expected TrackerParse, got {:?}", other),
        }
    }

    #[test]
    fn test_bz_ids_deduplicated_in_order() {
        let text = parse_tracker_text(&tracker(
            "kernel-1.0.1-1.fake early delivery",
            "bz7, then show_bug.cgi?id=3, then bz7 again",
        ))
        .expect("parse");
        assert_eq!(text.bz_ids, vec![7, 3]);
    }

    #[test]
    fn test_bz_shorthand_requires_word_boundary() {
        let text = parse_tracker_text(&tracker(
            "kernel-1.0.1-1.fake early delivery",
            "the abz9 token is not a bug reference",
        ))
        .expect("parse");
        assert!(text.bz_ids.is_empty());
    }
}
