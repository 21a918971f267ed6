//! Job model and related types
//!
//! A job is one CI build execution with ordered stages, produced artifacts
//! and an upload record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::pagination::empty_as_none;

/// Status shared by jobs and their stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Success,
    Failure,
    Running,
    Waiting,
    Pending,
    Aborted,
    /// Value outside the known set, passed through as received
    #[serde(untagged)]
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Running => "RUNNING",
            Self::Waiting => "WAITING",
            Self::Pending => "PENDING",
            Self::Aborted => "ABORTED",
            Self::Other(value) => value,
        }
    }

    /// Whether the execution has finished; unrecognized statuses count as finished
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running | Self::Waiting | Self::Pending)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueSeverity {
    Error,
    Warning,
    Notice,
    #[serde(untagged)]
    Other(String),
}

/// A problem reported by a failed stage, with a suggested fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageIssue {
    #[serde(rename = "type")]
    pub severity: IssueSeverity,
    pub description: String,
    pub ai_answer: String,
}

/// One phase of a job
///
/// `end_time` is always populated, including for stages that are still
/// running, waiting or pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub status: JobStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub logs_url: String,
    #[serde(default)]
    pub issues_found: u32,
    #[serde(default)]
    pub issues: Vec<StageIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub path: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedApk {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upload {
    pub url: String,
    pub commit_id: String,
    pub apks: Vec<UploadedApk>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteType {
    Verified,
    CodeReview,
    QaReview,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteResult {
    #[serde(rename = "type")]
    pub vote_type: VoteType,
    /// -2 through +2
    pub score: i8,
}

/// Job entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: String,
    pub job_id: String,
    pub change_number: String,
    pub patchset: u32,
    pub commit_id: String,
    pub job_name: String,
    pub job_type: String,
    pub build_type: String,
    pub build_target: String,
    pub trigger_type: String,
    pub build_num: u32,
    pub project_id: String,
    pub project_name: String,
    pub node: String,
    pub work_dir: String,
    pub status: JobStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: u64,
    pub vote_result: VoteResult,
    pub stages: Vec<Stage>,
    pub artifacts: Vec<Artifact>,
    pub upload: Upload,
    pub job_url: String,
}

/// Query parameters for the job list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub build_type: Option<String>,
    #[serde(default)]
    pub change_number: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl JobQuery {
    pub fn filters(&self) -> JobFilters {
        JobFilters {
            status: self.status.clone(),
            project_id: self.project_id.clone(),
            job_type: self.job_type.clone(),
            build_type: self.build_type.clone(),
            change_number: self.change_number.clone(),
            search: self.search.clone(),
        }
    }
}

/// Filter predicates for jobs, echoed back in list responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilters {
    pub status: Option<String>,
    pub project_id: Option<String>,
    pub job_type: Option<String>,
    pub build_type: Option<String>,
    pub change_number: Option<String>,
    pub search: Option<String>,
}

/// Query parameters for the builds-of-a-job endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl BuildQuery {
    pub fn filters(&self) -> BuildFilters {
        BuildFilters {
            status: self.status.clone(),
        }
    }
}

/// Filter predicates for the builds of one job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildFilters {
    pub status: Option<String>,
}
