//! Change document model
//!
//! A change document is a code-review ticket tracked across CI and test runs.
//! Field names follow the dashboard's snake_case wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::pagination::empty_as_none;

/// Review status of a change document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeStatus {
    #[default]
    Active,
    Merged,
    Abandoned,
    /// Value outside the known set, passed through as received
    #[serde(untagged)]
    Other(String),
}

impl ChangeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "ACTIVE",
            Self::Merged => "MERGED",
            Self::Abandoned => "ABANDONED",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a CI or test run referenced from a change document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Failed,
    Running,
    Pending,
    /// Value outside the known set, passed through as received
    #[serde(untagged)]
    Other(String),
}

impl BuildResult {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Running => "RUNNING",
            Self::Pending => "PENDING",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatchsetStatus {
    Active,
    Superseded,
    #[serde(untagged)]
    Other(String),
}

/// CI pipeline flavour a change is routed through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiType {
    AppCi,
    SystemCi,
    IntegrationCi,
    /// Value outside the known set, passed through as received
    #[serde(untagged)]
    Other(String),
}

impl CiType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AppCi => "app_ci",
            Self::SystemCi => "system_ci",
            Self::IntegrationCi => "integration_ci",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for CiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review label a vote is cast on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteLabel {
    #[serde(rename = "Code-Review")]
    CodeReview,
    #[serde(rename = "Verified")]
    Verified,
    #[serde(rename = "QA-Review")]
    QaReview,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Linked requirement ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rdc {
    pub key: String,
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patchset {
    pub number: u32,
    pub commit_id: String,
    pub created_at: DateTime<Utc>,
    pub status: PatchsetStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "type")]
    pub label: VoteLabel,
    pub user: String,
    pub time: DateTime<Utc>,
    /// -1, 0 or +1
    pub mark: i8,
}

/// Reference to a CI build triggered for the change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CiRunRef {
    pub job_name: String,
    pub job_type: CiType,
    pub id: String,
    pub build_num: u32,
    pub build_ret: BuildResult,
    pub job_url: String,
    pub project_id: String,
    pub project_name: String,
}

/// Reference to a test run triggered for the change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRunRef {
    pub id: String,
    pub job_name: String,
    pub build_num: u32,
    pub job_url: String,
    pub build_ret: BuildResult,
    pub project_id: String,
    pub project_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentState {
    pub ci_status: BuildResult,
    pub test_status: BuildResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub total_ci_runs: u32,
    pub total_test_runs: u32,
    pub latest_ci_job_id: String,
    pub latest_test_id: String,
    pub days_open: u32,
}

/// Change document entity
///
/// `current_patchset` always equals `patchsets.len()`, and `merged_at` is
/// present exactly when `status` is `MERGED`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub change_number: String,
    pub server: String,
    pub rdc: Rdc,
    pub current_patchset: u32,
    pub repository: String,
    pub branch: String,
    pub status: ChangeStatus,
    pub owner: Owner,
    pub refs_spec: String,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
    pub patchsets: Vec<Patchset>,
    pub ci_type: CiType,
    pub current_state: CurrentState,
    pub votes: Vec<Vote>,
    pub total_ci: Vec<CiRunRef>,
    pub total_test: Vec<TestRunRef>,
    pub summary: ChangeSummary,
}

/// Query parameters for the change document list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDocumentQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ci_type: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub ci_status: Option<String>,
}

impl ChangeDocumentQuery {
    pub fn filters(&self) -> ChangeDocumentFilters {
        ChangeDocumentFilters {
            status: self.status.clone(),
            ci_type: self.ci_type.clone(),
            repository: self.repository.clone(),
            search: self.search.clone(),
            ci_status: self.ci_status.clone(),
        }
    }
}

/// Filter predicates for change documents, echoed back in list responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDocumentFilters {
    pub status: Option<String>,
    pub ci_type: Option<String>,
    pub repository: Option<String>,
    pub search: Option<String>,
    pub ci_status: Option<String>,
}
