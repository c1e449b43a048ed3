//! Query construction for clone and tracker discovery.
//!
//! The OR clauses over tracker keys follow the input order exactly; the
//! query layer depends on that for deterministic results, so no sorting or
//! deduplication happens here.

use crate::config::SweepConfig;
use crate::error::{Result, SweepError};
use crate::ticket::{CLONE_LABEL, TRACKER_LABEL_PREFIX};

/// Build the clone-discovery query for a set of tracker keys.
///
/// # Errors
///
/// `InvalidInput` when `tracker_keys` is empty: an unconstrained query
/// would sweep every clone ever filed.
pub fn build_clone_query(tracker_keys: &[String], config: &SweepConfig) -> Result<String> {
    if tracker_keys.is_empty() {
        return Err(SweepError::InvalidInput(
            "tracker key list is empty".to_string(),
        ));
    }
    let tracker_clause = tracker_keys
        .iter()
        .map(|key| format!("labels = {TRACKER_LABEL_PREFIX}{key}"))
        .collect::<Vec<_>>()
        .join(" OR ");
    Ok(format!(
        "labels = {} AND project = {} AND component = {} AND \"Target Version\" = \"{}\" AND ({}) order by created DESC",
        CLONE_LABEL,
        config.target.project,
        config.target.component,
        config.target.target_release,
        tracker_clause,
    ))
}

/// Build the tracker-discovery query from the tracker spec.
pub fn build_tracker_query(config: &SweepConfig) -> String {
    let mut query = format!("project = {}", config.tracker.project);
    for label in &config.tracker.labels {
        query.push_str(&format!(" AND labels = {label}"));
    }
    query.push_str(" order by created DESC");
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BugzillaSpec, TargetSpec, TrackerSpec};

    fn config() -> SweepConfig {
        SweepConfig {
            tracker: TrackerSpec {
                project: "KMAINT".to_string(),
                labels: vec!["early-kernel-track".to_string()],
            },
            bugzilla: BugzillaSpec {
                target_releases: vec!["9.2.0".to_string()],
            },
            target: TargetSpec {
                project: "OCPBUGS".to_string(),
                component: "RHCOS".to_string(),
                version: "4.14".to_string(),
                target_release: "4.14.0".to_string(),
                candidate_brew_tag: "rhaos-4.14-rhel-9-candidate".to_string(),
                prod_brew_tag: "rhaos-4.14-rhel-9".to_string(),
            },
        }
    }

    #[test]
    fn test_clone_query_exact_form() {
        let keys = vec!["TRACKER-1".to_string(), "TRACKER-2".to_string()];
        let query = build_clone_query(&keys, &config()).expect("query");
        assert_eq!(
            query,
            "labels = art:cloned-kernel-bug AND project = OCPBUGS AND component = RHCOS \
             AND \"Target Version\" = \"4.14.0\" \
             AND (labels = art:kmaint:TRACKER-1 OR labels = art:kmaint:TRACKER-2) \
             order by created DESC"
        );
    }

    #[test]
    fn test_clone_query_preserves_input_order() {
        let forward = vec!["A-1".to_string(), "B-2".to_string(), "C-3".to_string()];
        let reversed: Vec<String> = forward.iter().rev().cloned().collect();
        let q1 = build_clone_query(&forward, &config()).expect("query");
        let q2 = build_clone_query(&reversed, &config()).expect("query");
        assert!(q1.contains("(labels = art:kmaint:A-1 OR labels = art:kmaint:B-2 OR labels = art:kmaint:C-3)"));
        assert!(q2.contains("(labels = art:kmaint:C-3 OR labels = art:kmaint:B-2 OR labels = art:kmaint:A-1)"));
    }

    #[test]
    fn test_clone_query_single_tracker() {
        let query = build_clone_query(&["TRACKER-9".to_string()], &config()).expect("query");
        assert!(query.contains("AND (labels = art:kmaint:TRACKER-9) order by created DESC"));
    }

    #[test]
    fn test_empty_tracker_list_rejected() {
        let err = build_clone_query(&[], &config()).unwrap_err();
        assert!(matches!(err, SweepError::InvalidInput(_)));
    }

    #[test]
    fn test_tracker_query_form() {
        let query = build_tracker_query(&config());
        assert_eq!(
            query,
            "project = KMAINT AND labels = early-kernel-track order by created DESC"
        );
    }

    #[test]
    fn test_tracker_query_multiple_labels() {
        let mut cfg = config();
        cfg.tracker.labels.push("second-label".to_string());
        let query = build_tracker_query(&cfg);
        assert_eq!(
            query,
            "project = KMAINT AND labels = early-kernel-track AND labels = second-label order by created DESC"
        );
    }
}
