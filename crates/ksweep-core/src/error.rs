//! Error taxonomy for the sweep engine.
//!
//! Fatal errors (`Configuration`, `Discovery`, `InvalidInput`) abort a run
//! before or during clone resolution. The remaining variants describe
//! per-clone conditions: the reconciler logs them and excludes the affected
//! clone from mutation without stopping the sweep.

/// Errors produced while loading or validating the sweep configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("group metadata has no kernel_bug_sweep section")]
    MissingSection,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("malformed group metadata: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sweep engine errors.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("discovery failed: {0}")]
    Discovery(String),

    #[error("ticket not found: {0}")]
    NotFound(String),

    #[error("no art:kmaint:<KEY> label on {key}")]
    MalformedLabel { key: String },

    #[error("tracker {key}: no kernel builds found in summary {summary:?}")]
    TrackerParse { key: String, summary: String },

    #[error("tracker {key}: {reason}")]
    Tracker { key: String, reason: String },

    #[error("tracker {tracker}: build lookup returned {got} tag sets for {want} builds")]
    MissingBuilds {
        tracker: String,
        want: usize,
        got: usize,
    },

    #[error("move of {key} to {target} failed: {reason}")]
    Mutation {
        key: String,
        target: String,
        reason: String,
    },

    #[error("api error: {0}")]
    Api(String),
}

/// Result type for sweep engine operations.
pub type Result<T> = std::result::Result<T, SweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_label_display() {
        let err = SweepError::MalformedLabel {
            key: "FOO-1".to_string(),
        };
        assert!(err.to_string().contains("FOO-1"));
        assert!(err.to_string().contains("art:kmaint"));
    }

    #[test]
    fn test_config_error_wraps_into_sweep_error() {
        let err: SweepError = ConfigError::EmptyField("target_jira.project").into();
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("target_jira.project"));
    }

    #[test]
    fn test_mutation_error_carries_target() {
        let err = SweepError::Mutation {
            key: "FOO-2".to_string(),
            target: "MODIFIED".to_string(),
            reason: "503".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("FOO-2"));
        assert!(msg.contains("MODIFIED"));
        assert!(msg.contains("503"));
    }
}
