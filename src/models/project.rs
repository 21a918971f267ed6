//! Project model
//!
//! A project groups a repository's CI steps (compile, test and build
//! variants). Field names follow the dashboard's camelCase wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::pagination::empty_as_none;

/// Status of a project step, also used for the project's own status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Failed,
    Running,
    Waiting,
    Pending,
    /// Value outside the known set, passed through as received
    #[serde(untagged)]
    Other(String),
}

impl StepStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Running => "running",
            Self::Waiting => "waiting",
            Self::Pending => "pending",
            Self::Other(value) => value,
        }
    }

    /// Running, waiting and pending steps have no end time yet
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Running | Self::Waiting | Self::Pending)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStep {
    pub id: String,
    pub name: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub repository: String,
    pub branch: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_build_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_build_status: Option<StepStatus>,
    pub steps: Vec<ProjectStep>,
}

/// Query parameters for the project list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl ProjectQuery {
    pub fn filters(&self) -> ProjectFilters {
        ProjectFilters {
            status: self.status.clone(),
            repository: self.repository.clone(),
            search: self.search.clone(),
        }
    }
}

/// Filter predicates for projects, echoed back in list responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectFilters {
    pub status: Option<String>,
    pub repository: Option<String>,
    pub search: Option<String>,
}

/// Query parameters for the project step endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepQuery {
    /// Accepted for interface compatibility; does not affect matching
    #[serde(default)]
    pub change_id: Option<String>,
}
