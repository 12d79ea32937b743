use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What the detail cache does with a lookup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Keep the synthesized error record for the rest of the session.
    #[default]
    CacheFailures,
    /// Forget the failure so the next request for the key fetches again.
    RetryFailures,
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applies to plain requests; the result stream only has a connect timeout.
    pub request_timeout: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            failure_policy: FailurePolicy::default(),
        }
    }
}
