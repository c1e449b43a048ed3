//! Brew/Koji hub client.
//!
//! The hub speaks XML-RPC; `listTags` against a build NVR is the single
//! method the sweep needs, so the request body is built inline and the tag
//! names are pulled out of the response members directly rather than
//! through a full XML-RPC codec.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use ksweep_core::BuildTagApi;

use crate::error::BrewError;

/// Connection parameters for a Brew/Koji hub.
#[derive(Debug, Clone)]
pub struct BrewConfig {
    /// Hub endpoint, e.g. `https://brewhub.engineering.redhat.com/brewhub`.
    pub hub_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for BrewConfig {
    fn default() -> Self {
        BrewConfig {
            hub_url: std::env::var("KSWEEP_BREW_URL")
                .unwrap_or_else(|_| "https://brewhub.engineering.redhat.com/brewhub".to_string()),
            timeout_secs: 60,
        }
    }
}

impl BrewConfig {
    /// Create a config from environment variables.
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a config for a specific hub.
    pub fn new(hub_url: &str) -> Self {
        BrewConfig {
            hub_url: hub_url.to_string(),
            timeout_secs: 60,
        }
    }
}

/// Brew hub client implementing the engine's build-tag interface.
pub struct BrewClient {
    config: BrewConfig,
    http: reqwest::Client,
}

impl BrewClient {
    pub fn new(config: BrewConfig) -> Result<Self, BrewError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ksweep/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(BrewClient { config, http })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self, BrewError> {
        Self::new(BrewConfig::from_env())
    }

    /// Tags currently applied to one build.
    pub async fn list_tags(&self, nvr: &str) -> Result<Vec<String>, BrewError> {
        let body = format!(
            "<?xml version=\"1.0\"?><methodCall><methodName>listTags</methodName>\
             <params><param><value><string>{}</string></value></param></params></methodCall>",
            xml_escape(nvr),
        );
        let response = self
            .http
            .post(&self.config.hub_url)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let tags = parse_list_tags(&response)?;
        debug!(event = "brew.list_tags", nvr = %nvr, tags = ?tags);
        Ok(tags)
    }
}

#[async_trait]
impl BuildTagApi for BrewClient {
    async fn builds_tags(&self, nvrs: &[String]) -> ksweep_core::Result<Vec<HashSet<String>>> {
        let mut tag_sets = Vec::with_capacity(nvrs.len());
        for nvr in nvrs {
            let tags = self.list_tags(nvr).await?;
            tag_sets.push(tags.into_iter().collect());
        }
        Ok(tag_sets)
    }
}

/// Escape the XML special characters that can appear in an NVR argument.
fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Pull the tag names out of a `listTags` response: each tag struct carries
/// a `name` member with a string value.
fn parse_list_tags(xml: &str) -> Result<Vec<String>, BrewError> {
    if xml.contains("<fault>") {
        let fault_re =
            Regex::new(r"<name>faultString</name>\s*<value>\s*(?:<string>)?([^<]*)").expect("static pattern");
        let message = fault_re
            .captures(xml)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_else(|| "unknown fault".to_string());
        return Err(BrewError::Fault(message));
    }
    if !xml.contains("<methodResponse") {
        return Err(BrewError::Response(
            "payload is not a methodResponse".to_string(),
        ));
    }
    let name_re = Regex::new(r"<name>name</name>\s*<value>\s*<string>([^<]*)</string>")
        .expect("static pattern");
    Ok(name_re
        .captures_iter(xml)
        .map(|c| c[1].to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_TAGS_RESPONSE: &str = r#"<?xml version='1.0'?>
<methodResponse>
<params>
<param>
<value><array><data>
<value><struct>
<member><name>id</name><value><int>12345</int></value></member>
<member><name>name</name><value><string>rhaos-4.14-rhel-9-candidate</string></value></member>
<member><name>perm</name><value><nil/></value></member>
</struct></value>
<value><struct>
<member><name>id</name><value><int>12346</int></value></member>
<member><name>name</name><value><string>rhaos-4.14-rhel-9</string></value></member>
</struct></value>
</data></array></value>
</param>
</params>
</methodResponse>"#;

    const FAULT_RESPONSE: &str = r#"<?xml version='1.0'?>
<methodResponse>
<fault>
<value><struct>
<member><name>faultCode</name><value><int>1000</int></value></member>
<member><name>faultString</name><value><string>No such build: kernel-0-0</string></value></member>
</struct></value>
</fault>
</methodResponse>"#;

    #[test]
    fn test_parse_list_tags() {
        let tags = parse_list_tags(LIST_TAGS_RESPONSE).expect("parse");
        assert_eq!(tags, vec!["rhaos-4.14-rhel-9-candidate", "rhaos-4.14-rhel-9"]);
    }

    #[test]
    fn test_parse_empty_tag_list() {
        let xml = "<?xml version='1.0'?><methodResponse><params><param>\
                   <value><array><data></data></array></value>\
                   </param></params></methodResponse>";
        let tags = parse_list_tags(xml).expect("parse");
        assert!(tags.is_empty());
    }

    #[test]
    fn test_parse_fault() {
        let err = parse_list_tags(FAULT_RESPONSE).unwrap_err();
        match err {
            BrewError::Fault(msg) => assert!(msg.contains("No such build")),
            other => panic!("expected Fault, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_xmlrpc_payload() {
        let err = parse_list_tags("<html>proxy error</html>").unwrap_err();
        assert!(matches!(err, BrewError::Response(_)));
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("kernel-1.0<&>"), "kernel-1.0&lt;&amp;&gt;");
    }

    #[test]
    fn test_config_default_has_hub_url() {
        let config = BrewConfig::default();
        assert!(!config.hub_url.is_empty());
    }
}
