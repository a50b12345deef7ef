use std::time::Duration;

use serde::Deserialize;

/// Where to ask for AI shots and how long to wait.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteAiConfig {
    /// Server root, e.g. `http://127.0.0.1:8080`.
    pub base_url: String,
    /// Deadline for one decision, after which the fallback shot is used.
    pub timeout_ms: u64,
}

impl Default for RemoteAiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_ms: 1500,
        }
    }
}

impl RemoteAiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/v1/ai-shot", self.base_url.trim_end_matches('/'))
    }
}
