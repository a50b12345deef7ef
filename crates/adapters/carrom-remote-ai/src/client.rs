use std::future::Future;

use carrom_core::geometry::Vec2;
use carrom_core::protocol::{AiShotRequest, AiShotResponse};

use crate::config::RemoteAiConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum AdvisorError {
    Timeout,
    Http(String),
    Status(u16),
    Decode(String),
    /// The advisor answered with NaN or infinite velocity.
    NonFinite,
    /// The decision task went away before answering.
    Dropped,
}

impl std::fmt::Display for AdvisorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "decision timed out"),
            Self::Http(e) => write!(f, "request failed: {e}"),
            Self::Status(code) => write!(f, "server returned HTTP {code}"),
            Self::Decode(e) => write!(f, "bad response body: {e}"),
            Self::NonFinite => write!(f, "velocity is not finite"),
            Self::Dropped => write!(f, "decision task dropped"),
        }
    }
}

impl std::error::Error for AdvisorError {}

/// Anything that can pick a striker velocity for a board.
pub trait ShotAdvisor: Send + Sync + 'static {
    fn decide(
        &self,
        request: AiShotRequest,
    ) -> impl Future<Output = Result<Vec2, AdvisorError>> + Send;
}

/// Asks the carrom server's `/api/v1/ai-shot` endpoint.
pub struct RemoteAdvisor {
    config: RemoteAiConfig,
    client: reqwest::Client,
}

impl RemoteAdvisor {
    pub fn new(config: RemoteAiConfig) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .user_agent("carrom-remote-ai/0.1")
            .timeout(config.timeout())
            .build()
            .map_err(|e| AdvisorError::Http(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RemoteAiConfig {
        &self.config
    }
}

impl ShotAdvisor for RemoteAdvisor {
    async fn decide(&self, request: AiShotRequest) -> Result<Vec2, AdvisorError> {
        let resp = self
            .client
            .post(self.config.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdvisorError::Timeout
                } else {
                    AdvisorError::Http(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            return Err(AdvisorError::Status(resp.status().as_u16()));
        }

        let shot: AiShotResponse = resp
            .json()
            .await
            .map_err(|e| AdvisorError::Decode(e.to_string()))?;
        let velocity = shot.velocity();
        if !velocity.is_finite() {
            return Err(AdvisorError::NonFinite);
        }
        Ok(velocity)
    }
}
