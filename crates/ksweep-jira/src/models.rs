//! Wire DTOs for the Jira REST v2 API.
//!
//! Only the fields the sweep reads are modeled; everything else in the
//! payload is ignored. Mapping into the engine's domain entities happens
//! here so the client itself stays thin.

use serde::Deserialize;

use ksweep_core::{CloneTicket, Status, TrackerTicket};

/// The `Target Version` custom field on Red Hat Jira.
pub const TARGET_VERSION_FIELD: &str = "customfield_12319940";

/// One page of search results.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<IssueBean>,
}

/// An issue as returned by search and fetch endpoints.
#[derive(Debug, Deserialize)]
pub struct IssueBean {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IssueFields {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub status: Option<NamedField>,
    pub project: Option<KeyedField>,
    pub components: Vec<NamedField>,
    #[serde(rename = "customfield_12319940")]
    pub target_versions: Vec<NamedField>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedField {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyedField {
    pub key: String,
}

/// Workflow transitions currently available on an issue.
#[derive(Debug, Deserialize)]
pub struct TransitionsPage {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
    pub to: NamedField,
}

#[derive(Debug, Deserialize)]
pub struct CommentsPage {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
pub struct Comment {
    pub body: String,
}

impl IssueBean {
    /// Map into the engine's clone entity.
    pub fn into_clone_ticket(self) -> CloneTicket {
        let status = self.fields.status.map(|s| s.name).unwrap_or_default();
        CloneTicket::from_fields(
            self.key,
            self.fields.project.map(|p| p.key).unwrap_or_default(),
            &status,
            self.fields.labels,
            self.fields
                .components
                .into_iter()
                .map(|c| c.name)
                .collect(),
            self.fields
                .target_versions
                .into_iter()
                .map(|v| v.name)
                .collect(),
            self.fields.summary.unwrap_or_default(),
        )
    }

    /// Map into the engine's tracker entity.
    pub fn into_tracker_ticket(self) -> TrackerTicket {
        let status = self.fields.status.map(|s| s.name).unwrap_or_default();
        TrackerTicket {
            key: self.key,
            status: Status::from_name(&status),
            summary: self.fields.summary.unwrap_or_default(),
            description: self.fields.description.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUE_JSON: &str = r#"
    {
        "key": "FOO-1",
        "fields": {
            "summary": "CVE-2023-1234 kernel: bad things",
            "labels": ["art:cloned-kernel-bug", "art:bz#5", "art:kmaint:KMAINT-1"],
            "status": {"name": "New"},
            "project": {"key": "OCPBUGS"},
            "components": [{"name": "RHCOS"}],
            "customfield_12319940": [{"name": "4.14.0"}],
            "unmodeled_field": {"whatever": true}
        }
    }"#;

    #[test]
    fn test_issue_deserializes_and_maps_to_clone() {
        let bean: IssueBean = serde_json::from_str(ISSUE_JSON).expect("deserialize");
        let clone = bean.into_clone_ticket();
        assert_eq!(clone.key, "FOO-1");
        assert_eq!(clone.project, "OCPBUGS");
        assert_eq!(clone.status.name(), "New");
        assert_eq!(clone.components, vec!["RHCOS"]);
        assert_eq!(clone.target_versions, vec!["4.14.0"]);
        assert_eq!(clone.tracker.expect("tracker ref").key(), "KMAINT-1");
    }

    #[test]
    fn test_issue_with_missing_fields_maps_to_defaults() {
        let bean: IssueBean =
            serde_json::from_str(r#"{"key": "FOO-2", "fields": {}}"#).expect("deserialize");
        let clone = bean.into_clone_ticket();
        assert_eq!(clone.key, "FOO-2");
        assert!(clone.summary.is_empty());
        assert!(clone.tracker.is_none());
    }

    #[test]
    fn test_tracker_mapping_keeps_description() {
        let bean: IssueBean = serde_json::from_str(
            r#"
            {
                "key": "KMAINT-1",
                "fields": {
                    "summary": "kernel-1.0.1-1.fake early delivery via OCP",
                    "description": "Fixes bz6.",
                    "status": {"name": "New"}
                }
            }"#,
        )
        .expect("deserialize");
        let tracker = bean.into_tracker_ticket();
        assert_eq!(tracker.key, "KMAINT-1");
        assert_eq!(tracker.description, "Fixes bz6.");
    }

    #[test]
    fn test_search_page_defaults() {
        let page: SearchPage = serde_json::from_str(r#"{"total": 0}"#).expect("deserialize");
        assert!(page.issues.is_empty());
    }
}
