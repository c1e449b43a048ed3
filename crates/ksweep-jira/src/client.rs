//! Jira REST v2 client.
//!
//! Implements the engine's [`TicketApi`] over plain REST calls: paginated
//! JQL search, issue fetch, workflow transitions and comments. All
//! mutations honor the `dry_run` flag by logging the decision and returning
//! without a request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use tracing::{debug, info};

use ksweep_core::{CloneTicket, SweepConfig, TicketApi, TrackerTicket};

use crate::error::JiraError;
use crate::models::{
    CommentsPage, IssueBean, SearchPage, TransitionsPage, TARGET_VERSION_FIELD,
};

/// Connection parameters for a Jira instance.
#[derive(Debug, Clone)]
pub struct JiraConfig {
    /// Base URL, e.g. `https://issues.redhat.com`.
    pub base_url: String,
    /// Personal access token. Optional: anonymous reads work against public
    /// projects, mutations do not.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for JiraConfig {
    fn default() -> Self {
        JiraConfig {
            base_url: std::env::var("KSWEEP_JIRA_URL")
                .unwrap_or_else(|_| "https://issues.redhat.com".to_string()),
            token: std::env::var("KSWEEP_JIRA_TOKEN").ok(),
            timeout_secs: 30,
        }
    }
}

impl JiraConfig {
    /// Create a config from environment variables.
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a config for a specific instance.
    pub fn new(base_url: &str) -> Self {
        JiraConfig {
            base_url: base_url.to_string(),
            token: None,
            timeout_secs: 30,
        }
    }

    /// Set the access token.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

/// Jira REST client implementing the engine's ticket interface.
pub struct JiraClient {
    config: JiraConfig,
    http: reqwest::Client,
}

impl JiraClient {
    pub fn new(mut config: JiraConfig) -> Result<Self, JiraError> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("ksweep/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(JiraClient { config, http })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, JiraError> {
        Self::new(JiraConfig::from_env())
    }

    fn api(&self, path: &str) -> String {
        format!("{}/rest/api/2/{}", self.config.base_url, path)
    }

    /// Run a JQL search, draining all pages in server order.
    pub async fn search(&self, jql: &str) -> Result<Vec<IssueBean>, JiraError> {
        let fields = issue_fields();
        let mut issues = Vec::new();
        let mut start_at: u64 = 0;
        loop {
            let start = start_at.to_string();
            let page: SearchPage = self
                .http
                .get(self.api("search"))
                .query(&[
                    ("jql", jql),
                    ("startAt", start.as_str()),
                    ("maxResults", "200"),
                    ("fields", fields.as_str()),
                ])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            let fetched = page.issues.len() as u64;
            issues.extend(page.issues);
            start_at += fetched;
            if fetched == 0 || start_at >= page.total {
                break;
            }
        }
        debug!(event = "jira.search", jql = %jql, results = issues.len());
        Ok(issues)
    }

    /// Fetch one issue by key.
    pub async fn issue(&self, key: &str) -> Result<IssueBean, JiraError> {
        let fields = issue_fields();
        let response = self
            .http
            .get(self.api(&format!("issue/{key}")))
            .query(&[("fields", fields.as_str())])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(JiraError::NotFound(key.to_string()));
        }
        Ok(response.error_for_status()?.json().await?)
    }

    /// All comment bodies on an issue.
    pub async fn comments(&self, key: &str) -> Result<Vec<String>, JiraError> {
        let page: CommentsPage = self
            .http
            .get(self.api(&format!("issue/{key}/comment")))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(page.comments.into_iter().map(|c| c.body).collect())
    }

    /// Add a comment to an issue.
    pub async fn add_comment(&self, key: &str, body: &str) -> Result<(), JiraError> {
        self.http
            .post(self.api(&format!("issue/{key}/comment")))
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Transition an issue to the named target status. The workflow is
    /// resolved dynamically: the transition whose destination (or name)
    /// matches wins.
    pub async fn transition(&self, key: &str, target: &str) -> Result<(), JiraError> {
        let page: TransitionsPage = self
            .http
            .get(self.api(&format!("issue/{key}/transitions")))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let transition = page
            .transitions
            .into_iter()
            .find(|t| {
                t.to.name.eq_ignore_ascii_case(target) || t.name.eq_ignore_ascii_case(target)
            })
            .ok_or_else(|| JiraError::NoTransition {
                key: key.to_string(),
                target: target.to_string(),
            })?;
        self.http
            .post(self.api(&format!("issue/{key}/transitions")))
            .json(&serde_json::json!({ "transition": { "id": transition.id } }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn issue_fields() -> String {
    format!("summary,description,labels,status,project,components,{TARGET_VERSION_FIELD}")
}

#[async_trait]
impl TicketApi for JiraClient {
    async fn search_clones(&self, query: &str) -> ksweep_core::Result<Vec<CloneTicket>> {
        let issues = self.search(query).await?;
        Ok(issues
            .into_iter()
            .map(IssueBean::into_clone_ticket)
            .collect())
    }

    async fn get_clone(&self, key: &str) -> ksweep_core::Result<CloneTicket> {
        Ok(self.issue(key).await?.into_clone_ticket())
    }

    async fn search_trackers(&self, query: &str) -> ksweep_core::Result<Vec<TrackerTicket>> {
        let issues = self.search(query).await?;
        Ok(issues
            .into_iter()
            .map(IssueBean::into_tracker_ticket)
            .collect())
    }

    async fn get_tracker(&self, key: &str) -> ksweep_core::Result<TrackerTicket> {
        Ok(self.issue(key).await?.into_tracker_ticket())
    }

    async fn move_clone(
        &self,
        dry_run: bool,
        key: &str,
        target_status: &str,
        comment: &str,
    ) -> ksweep_core::Result<()> {
        info!(event = "jira.move", key = %key, target = %target_status, dry_run = dry_run);
        if dry_run {
            return Ok(());
        }
        self.add_comment(key, comment).await?;
        self.transition(key, target_status).await?;
        Ok(())
    }

    async fn comment(&self, dry_run: bool, key: &str, body: &str) -> ksweep_core::Result<()> {
        info!(event = "jira.comment", key = %key, dry_run = dry_run);
        if dry_run {
            return Ok(());
        }
        self.add_comment(key, body).await?;
        Ok(())
    }

    async fn process_shipped_tracker(
        &self,
        dry_run: bool,
        _config: &SweepConfig,
        tracker: &TrackerTicket,
        nvrs: &[String],
        prod_tag: &str,
    ) -> ksweep_core::Result<()> {
        let body = format!(
            "Builds {} have been tagged into {}, which means they have shipped. Closing this tracker.",
            nvrs.join(", "),
            prod_tag,
        );
        // Re-swept trackers must not accumulate duplicate comments.
        let existing = self.comments(&tracker.key).await?;
        if !existing.iter().any(|c| c == &body) {
            info!(event = "jira.tracker_comment", key = %tracker.key, dry_run = dry_run);
            if !dry_run {
                self.add_comment(&tracker.key, &body).await?;
            }
        }
        if !tracker.status.is_closed() {
            info!(event = "jira.tracker_close", key = %tracker.key, dry_run = dry_run);
            if !dry_run {
                self.transition(&tracker.key, "CLOSED").await?;
            }
        }
        Ok(())
    }
}
