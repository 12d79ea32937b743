use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clearpath_client::{ClientSettings, FailurePolicy};
use clearpath_logging::LogDestination;
use serde::Deserialize;

/// Optional settings file. Every field may be omitted.
///
/// ```ron
/// (
///     base_url: Some("http://localhost:8000"),
///     request_timeout_secs: Some(30),
///     failure_policy: Some(RetryFailures),
///     log_destination: Some(Both),
/// )
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub failure_policy: Option<FailurePolicy>,
    pub log_destination: Option<LogDestination>,
}

impl FileConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn client_settings(&self, base_url_override: Option<String>) -> ClientSettings {
        let defaults = ClientSettings::default();
        ClientSettings {
            base_url: base_url_override
                .or_else(|| self.base_url.clone())
                .unwrap_or(defaults.base_url),
            connect_timeout: self
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            failure_policy: self.failure_policy.unwrap_or(defaults.failure_policy),
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        self.log_destination.unwrap_or_default()
    }
}
