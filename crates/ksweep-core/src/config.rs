//! Sweep configuration, loaded from the `kernel_bug_sweep` section of a
//! group metadata document.
//!
//! Pure data: once `validate` has passed, every string field is non-empty
//! and every list used for filtering has at least one entry. The engine
//! relies on those invariants and never re-checks them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Identifies the upstream "kmaint" tracker tickets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackerSpec {
    /// Tracker project key, e.g. `KMAINT`.
    pub project: String,
    /// Labels a tracker must carry, e.g. `early-kernel-track`.
    pub labels: Vec<String>,
}

/// Legacy Bugzilla filter. Carried through for config compatibility; the
/// sweep itself does not consult it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BugzillaSpec {
    pub target_releases: Vec<String>,
}

/// Identifies the downstream clone tickets and the Brew tags that define
/// shipment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetSpec {
    /// Clone project key, e.g. `OCPBUGS`.
    pub project: String,
    /// Clone component. Omitted in most group configs.
    #[serde(default = "default_component")]
    pub component: String,
    /// Product version, e.g. `4.14`.
    pub version: String,
    /// Target Version field value on clones, e.g. `4.14.0`.
    pub target_release: String,
    /// Brew tag a build lands in when the fix is built.
    pub candidate_brew_tag: String,
    /// Brew tag a build lands in when the fix has shipped.
    pub prod_brew_tag: String,
}

fn default_component() -> String {
    "RHCOS".to_string()
}

/// Validated parameters for one sweep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweepConfig {
    #[serde(rename = "tracker_jira")]
    pub tracker: TrackerSpec,
    pub bugzilla: BugzillaSpec,
    #[serde(rename = "target_jira")]
    pub target: TargetSpec,
}

impl SweepConfig {
    /// Deserialize the `kernel_bug_sweep` section of a group metadata
    /// document and validate it.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingSection`: the document has no
    ///   `kernel_bug_sweep` key.
    /// - `ConfigError::Parse`: the section does not match the schema.
    /// - `ConfigError::EmptyField`: a required field is empty.
    pub fn from_group_metadata(yaml: &str) -> Result<Self, ConfigError> {
        let doc: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let section = doc
            .get("kernel_bug_sweep")
            .ok_or(ConfigError::MissingSection)?;
        let config: SweepConfig = serde_yaml::from_value(section.clone())?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a group metadata file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_group_metadata(&text)
    }

    /// Check the non-empty invariants the rest of the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        required("tracker_jira.project", &self.tracker.project)?;
        if self.tracker.labels.is_empty() {
            return Err(ConfigError::EmptyField("tracker_jira.labels"));
        }
        for label in &self.tracker.labels {
            required("tracker_jira.labels entry", label)?;
        }
        if self.bugzilla.target_releases.is_empty() {
            return Err(ConfigError::EmptyField("bugzilla.target_releases"));
        }
        required("target_jira.project", &self.target.project)?;
        required("target_jira.component", &self.target.component)?;
        required("target_jira.version", &self.target.version)?;
        required("target_jira.target_release", &self.target.target_release)?;
        required(
            "target_jira.candidate_brew_tag",
            &self.target.candidate_brew_tag,
        )?;
        required("target_jira.prod_brew_tag", &self.target.prod_brew_tag)?;
        Ok(())
    }
}

fn required(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::EmptyField(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GROUP_METADATA: &str = r#"
kernel_bug_sweep:
  tracker_jira:
    project: KMAINT
    labels:
      - early-kernel-track
  bugzilla:
    target_releases:
      - "9.2.0"
  target_jira:
    project: OCPBUGS
    component: RHCOS
    version: "4.14"
    target_release: "4.14.0"
    candidate_brew_tag: rhaos-4.14-rhel-9-candidate
    prod_brew_tag: rhaos-4.14-rhel-9
"#;

    #[test]
    fn test_full_config_parses() {
        let config = SweepConfig::from_group_metadata(GROUP_METADATA).expect("valid config");
        assert_eq!(config.tracker.project, "KMAINT");
        assert_eq!(config.tracker.labels, vec!["early-kernel-track"]);
        assert_eq!(config.bugzilla.target_releases, vec!["9.2.0"]);
        assert_eq!(config.target.project, "OCPBUGS");
        assert_eq!(config.target.component, "RHCOS");
        assert_eq!(config.target.target_release, "4.14.0");
        assert_eq!(config.target.candidate_brew_tag, "rhaos-4.14-rhel-9-candidate");
        assert_eq!(config.target.prod_brew_tag, "rhaos-4.14-rhel-9");
    }

    #[test]
    fn test_component_defaults_to_rhcos() {
        let yaml = GROUP_METADATA.replace("    component: RHCOS\n", "");
        let config = SweepConfig::from_group_metadata(&yaml).expect("valid config");
        assert_eq!(config.target.component, "RHCOS");
    }

    #[test]
    fn test_missing_section_rejected() {
        let err = SweepConfig::from_group_metadata("unrelated: true\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingSection));
    }

    #[test]
    fn test_empty_project_rejected() {
        let yaml = GROUP_METADATA.replace("project: OCPBUGS", "project: \"\"");
        let err = SweepConfig::from_group_metadata(&yaml).unwrap_err();
        match err {
            ConfigError::EmptyField(field) => assert_eq!(field, "target_jira.project"),
            other => panic!("expected EmptyField, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_tracker_labels_rejected() {
        let yaml = GROUP_METADATA.replace(
            "    labels:\n      - early-kernel-track\n",
            "    labels: []\n",
        );
        let err = SweepConfig::from_group_metadata(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyField("tracker_jira.labels")));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(GROUP_METADATA.as_bytes()).expect("write");
        let config = SweepConfig::from_file(file.path()).expect("valid config");
        assert_eq!(config.target.version, "4.14");
    }
}
