// GitHub workflow dispatch client

use crate::errors::DispatchError;
use crate::models::{DispatchOutcome, DispatchTarget};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;

/// Base URL of the GitHub REST API
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Media type requested from the GitHub REST API
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// User agent sent with every dispatch request
pub const USER_AGENT: &str = "github-dispatcher";

/// WorkflowDispatcher sends one workflow trigger request per invocation
///
/// The trait is the substitution seam for the scheduler engine: tests swap
/// the HTTP transport for a mock without touching the engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkflowDispatcher: Send + Sync {
    /// Send a single workflow_dispatch request authorized with `credential`
    async fn dispatch(&self, credential: &str) -> Result<DispatchOutcome, DispatchError>;
}

/// GithubDispatcher triggers a fixed workflow via the GitHub REST API
pub struct GithubDispatcher {
    client: Client,
    api_base: String,
    target: DispatchTarget,
}

impl GithubDispatcher {
    /// Create a dispatcher for the fixed production target
    pub fn new(timeout_seconds: u64) -> Result<Self, DispatchError> {
        Self::with_api_base(GITHUB_API_BASE, timeout_seconds)
    }

    /// Create a dispatcher against an alternate API base URL (tests)
    pub fn with_api_base(
        api_base: impl Into<String>,
        timeout_seconds: u64,
    ) -> Result<Self, DispatchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into(),
            target: DispatchTarget::default(),
        })
    }

    /// The fixed target this dispatcher triggers
    pub fn target(&self) -> &DispatchTarget {
        &self.target
    }
}

#[async_trait]
impl WorkflowDispatcher for GithubDispatcher {
    #[tracing::instrument(skip(self, credential))]
    async fn dispatch(&self, credential: &str) -> Result<DispatchOutcome, DispatchError> {
        let url = self.target.dispatch_url(&self.api_base);
        tracing::info!(url = %url, git_ref = %self.target.git_ref, "Sending workflow dispatch request");

        // Exactly one outbound request per invocation; never retried.
        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(&self.target.payload())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(status = status.as_u16(), "Workflow dispatch sent successfully");
            return Ok(DispatchOutcome {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = status.as_u16(), body = %body, "Workflow dispatch rejected");
        Err(DispatchError::Failed {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatcher_creation() {
        let dispatcher = GithubDispatcher::new(30);
        assert!(dispatcher.is_ok());
    }

    #[test]
    fn test_dispatcher_uses_fixed_production_url() {
        let dispatcher = GithubDispatcher::new(30).unwrap();
        assert_eq!(
            dispatcher.target().dispatch_url(GITHUB_API_BASE),
            "https://api.github.com/repos/asuto15/scraping-obs/actions/workflows/scrape.yml/dispatches"
        );
    }

    #[test]
    fn test_accept_header_media_type() {
        assert_eq!(GITHUB_ACCEPT, "application/vnd.github+json");
    }
}
