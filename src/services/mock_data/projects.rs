//! Project generator

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::rngs::StdRng;

use super::rng::{MINUTE_MS, RecordKind, pick, random_date, record_rng};
use super::{BRANCHES, MockDataGenerator, REPOSITORIES};
use crate::models::{Project, ProjectStep, StepStatus};

/// The six steps every project runs, in order
pub const STEP_NAMES: [&str; 6] = [
    "Module Build",
    "Module Test",
    "Full Build",
    "Full Test",
    "Build",
    "Build Test",
];

const STEP_STATUSES: [StepStatus; 5] = [
    StepStatus::Success,
    StepStatus::Failed,
    StepStatus::Running,
    StepStatus::Waiting,
    StepStatus::Pending,
];

const INFO_LOGS: [&str; 9] = [
    "Initializing build environment...",
    "Fetching sources...",
    "Installing dependencies...",
    "Compiling...",
    "Running tests...",
    "Packaging...",
    "Deploying...",
    "Verifying deployment...",
    "Build finished",
];

const ERROR_LOGS: [&str; 7] = [
    "ERROR: cannot reach source repository",
    "ERROR: dependency installation failed",
    "ERROR: compilation failed, see log for details",
    "ERROR: 5 test cases failed",
    "ERROR: packaging failed, required files missing",
    "ERROR: deployment timed out",
    "Build failed",
];

fn project_name(repository: &str) -> &'static str {
    match repository {
        "android-app-main" => "Android Main App",
        "system-core" => "System Core",
        "ui-framework" => "UI Framework",
        "network-service" => "Network Service",
        "media-player" => "Media Player",
        _ => "Unnamed Project",
    }
}

fn project_description(repository: &str) -> &'static str {
    match repository {
        "android-app-main" => "Main Android application: user interface and business logic",
        "system-core" => "Core system module providing low-level services",
        "ui-framework" => "Shared UI component framework",
        "network-service" => "Network module handling requests and data transfer",
        "media-player" => "Media player module for audio and video playback",
        _ => "Project without a description",
    }
}

/// Overall build status from step statuses
///
/// Any failed step fails the build; otherwise any running, waiting or
/// pending step makes it running; otherwise it succeeded.
pub fn derive_build_status(steps: &[ProjectStep]) -> StepStatus {
    if steps.iter().any(|s| s.status == StepStatus::Failed) {
        StepStatus::Failed
    } else if steps.iter().any(|s| s.status.is_in_progress()) {
        StepStatus::Running
    } else {
        StepStatus::Success
    }
}

impl MockDataGenerator {
    /// Generate project `index` with its six steps
    pub fn project(&self, index: u32) -> Project {
        let mut rng = record_rng(self.seed, RecordKind::Project, u64::from(index));
        let slot = index as usize;

        let id = format!("project-{}", 1000 + u64::from(index));
        let repository = REPOSITORIES[slot % REPOSITORIES.len()];
        let branch = BRANCHES[slot % BRANCHES.len()];

        let status = pick(&mut rng, &STEP_STATUSES).clone();
        let last_build_time = random_date(&mut rng, self.now, 3);
        let steps = self.project_steps(&mut rng, &id);
        let last_build_status = derive_build_status(&steps);

        Project {
            id,
            name: project_name(repository).to_string(),
            description: project_description(repository).to_string(),
            repository: repository.to_string(),
            branch: branch.to_string(),
            status,
            last_build_time: Some(last_build_time),
            last_build_status: Some(last_build_status),
            steps,
        }
    }

    /// Generate projects `0..count`
    pub fn projects(&self, count: u32) -> Vec<Project> {
        (0..count).map(|index| self.project(index)).collect()
    }

    /// Steps start fifteen minutes apart; in-progress steps have no end time
    fn project_steps(&self, rng: &mut StdRng, project_id: &str) -> Vec<ProjectStep> {
        let first_start = random_date(rng, self.now, 7);

        STEP_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let status = pick(rng, &STEP_STATUSES).clone();
                let duration: u32 = rng.gen_range(5..125);
                let start_time = first_start + Duration::minutes(15 * i as i64);
                let end_time = (!status.is_in_progress())
                    .then(|| start_time + Duration::minutes(i64::from(duration)));
                let log_count = rng.gen_range(10..30);
                let logs = self.step_logs(rng, log_count, &status);

                ProjectStep {
                    id: format!("{project_id}-step-{i}"),
                    name: name.to_string(),
                    status,
                    start_time: Some(start_time),
                    end_time,
                    duration: Some(duration),
                    logs,
                    job_id: Some(format!("job-{project_id}-{i}")),
                }
            })
            .collect()
    }

    /// One line per minute leading up to now; the last ~30% of a failed
    /// step's lines are errors
    fn step_logs(&self, rng: &mut StdRng, count: usize, status: &StepStatus) -> Vec<String> {
        let error_from = count as f64 * 0.7;

        (0..count)
            .map(|i| {
                let at: DateTime<Utc> =
                    self.now - Duration::milliseconds((count - i) as i64 * MINUTE_MS);
                let timestamp = at.format("%Y-%m-%d %H:%M:%S");
                let message = if *status == StepStatus::Failed && i as f64 > error_from {
                    pick(rng, &ERROR_LOGS)
                } else {
                    pick(rng, &INFO_LOGS)
                };
                format!("[{timestamp}] {message}")
            })
            .collect()
    }
}
