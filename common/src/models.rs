// Dispatch domain models
//
// The dispatch target is fixed at compile time. A target value is built once
// at startup and read only when a request is constructed; nothing here is
// persisted or mutated between invocations.

use serde::{Deserialize, Serialize};

/// Owner of the repository whose workflow is triggered
pub const TARGET_OWNER: &str = "asuto15";

/// Repository containing the workflow file
pub const TARGET_REPO: &str = "scraping-obs";

/// Workflow file triggered by each dispatch
pub const TARGET_WORKFLOW_FILE: &str = "scrape.yml";

/// Branch the triggered workflow runs against
pub const TARGET_REF: &str = "main";

/// DispatchTarget identifies the workflow to trigger and the ref it runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchTarget {
    pub owner: String,
    pub repo: String,
    pub workflow_file: String,
    pub git_ref: String,
}

impl Default for DispatchTarget {
    fn default() -> Self {
        Self {
            owner: TARGET_OWNER.to_string(),
            repo: TARGET_REPO.to_string(),
            workflow_file: TARGET_WORKFLOW_FILE.to_string(),
            git_ref: TARGET_REF.to_string(),
        }
    }
}

impl DispatchTarget {
    /// Path of the workflow_dispatch endpoint relative to the API base URL
    pub fn dispatch_path(&self) -> String {
        format!(
            "/repos/{}/{}/actions/workflows/{}/dispatches",
            self.owner, self.repo, self.workflow_file
        )
    }

    /// Full URL of the workflow_dispatch endpoint
    pub fn dispatch_url(&self, api_base: &str) -> String {
        format!("{}{}", api_base.trim_end_matches('/'), self.dispatch_path())
    }

    /// Request body naming the ref the workflow runs against
    pub fn payload(&self) -> DispatchPayload {
        DispatchPayload {
            git_ref: self.git_ref.clone(),
        }
    }
}

/// Request body for the workflow_dispatch endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchPayload {
    #[serde(rename = "ref")]
    pub git_ref: String,
}

/// Outcome of a dispatch that was accepted by the remote endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// HTTP status returned by the dispatch endpoint (always a success code)
    pub status: u16,
}
