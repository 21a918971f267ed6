//! Job generator

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::rngs::StdRng;

use super::MockDataGenerator;
use super::rng::{RecordKind, pick, random_date, random_hex, random_id, record_rng};
use crate::models::{
    Artifact, IssueSeverity, Job, JobStatus, Stage, StageIssue, Upload, UploadedApk, VoteResult,
    VoteType,
};

const JOB_STATUSES: [JobStatus; 6] = [
    JobStatus::Success,
    JobStatus::Failure,
    JobStatus::Running,
    JobStatus::Waiting,
    JobStatus::Pending,
    JobStatus::Aborted,
];

/// (project id, display name); jobs rotate through these by index
const PROJECTS: [(&str, &str); 8] = [
    ("android-app-main", "Android Main App"),
    ("system-core", "System Core"),
    ("ui-framework", "UI Framework"),
    ("network-service", "Network Service"),
    ("media-player", "Media Player"),
    ("image-service", "Image Service"),
    ("data-sync", "Data Sync"),
    ("security-module", "Security Module"),
];

const JOB_TYPES: [&str; 5] = ["build", "test", "deploy", "verify", "release"];
const BUILD_TYPES: [&str; 5] = ["debug", "release", "profile", "nightly", "weekly"];
const BUILD_TARGETS: [&str; 4] = ["production", "staging", "testing", "development"];
const TRIGGER_TYPES: [&str; 5] = ["manual", "automatic", "scheduled", "webhook", "api"];
const NODES: [&str; 5] = [
    "build-node-01",
    "build-node-02",
    "test-node-01",
    "test-node-02",
    "deploy-node-01",
];

const STAGE_NAMES: [&str; 10] = [
    "Prepare Environment",
    "Code Check",
    "Compile",
    "Unit Test",
    "Integration Test",
    "Deploy",
    "Verify",
    "Performance Test",
    "Security Scan",
    "Release",
];

const ISSUE_SEVERITIES: [IssueSeverity; 3] = [
    IssueSeverity::Error,
    IssueSeverity::Warning,
    IssueSeverity::Notice,
];

const ISSUE_DESCRIPTIONS: [&str; 10] = [
    "Compilation error: cannot find symbol",
    "Test failure: expected result does not match",
    "Style violation: missing semicolon",
    "Performance warning: method takes too long",
    "Security warning: unsafe API in use",
    "Dependency conflict: incompatible versions",
    "Memory leak: resource never released",
    "Thread safety: unsynchronized concurrent access",
    "Network timeout: connection failed",
    "Permission denied: cannot access resource",
];

const ISSUE_SUGGESTIONS: [&str; 10] = [
    "Check the identifier spelling and make sure the package is imported",
    "Update the test case to match the new business logic",
    "Add the missing semicolon to satisfy the style rules",
    "Move the work off the hot path or reduce its complexity",
    "Switch to the recommended API or add the missing checks",
    "Align the dependency versions or add a compatibility shim",
    "Close the resource in a finally block or use a scoped guard",
    "Guard the shared state with a lock or an atomic",
    "Raise the timeout or retry the connection",
    "Review the permission settings and request access",
];

const ARTIFACT_EXTENSIONS: [&str; 13] = [
    "jar", "war", "zip", "tar.gz", "apk", "exe", "dmg", "deb", "rpm", "html", "xml", "json", "txt",
];

const ARTIFACT_PREFIXES: [&str; 11] = [
    "app", "lib", "core", "ui", "api", "service", "util", "common", "data", "report", "doc",
];

const APK_VARIANTS: [&str; 3] = ["debug", "release", "profile"];

const VOTE_TYPES: [VoteType; 3] = [VoteType::Verified, VoteType::CodeReview, VoteType::QaReview];

/// Build duration between 5 and 65 minutes, in milliseconds
fn random_duration_ms(rng: &mut StdRng) -> u64 {
    rng.gen_range(300_000..3_900_000)
}

fn ms(value: u64) -> Duration {
    Duration::milliseconds(value as i64)
}

fn stage_issues(rng: &mut StdRng, count: u32) -> Vec<StageIssue> {
    (0..count)
        .map(|_| StageIssue {
            severity: pick(rng, &ISSUE_SEVERITIES).clone(),
            description: pick(rng, &ISSUE_DESCRIPTIONS).to_string(),
            ai_answer: pick(rng, &ISSUE_SUGGESTIONS).to_string(),
        })
        .collect()
}

/// Stages run back to back with a gap of up to five minutes between them
fn stages(rng: &mut StdRng, first_start: DateTime<Utc>, count: usize) -> Vec<Stage> {
    let mut start_time = first_start;
    let mut stages = Vec::with_capacity(count);

    for i in 0..count {
        let status = if i + 1 == count && rng.gen_bool(0.3) {
            JobStatus::Running
        } else {
            pick(rng, &JOB_STATUSES).clone()
        };

        let duration = random_duration_ms(rng);
        let end_time = start_time + ms(duration);

        let (issues_found, issues) = if status == JobStatus::Failure {
            let found = rng.gen_range(1..=5);
            (found, stage_issues(rng, found))
        } else {
            (0, Vec::new())
        };

        stages.push(Stage {
            name: STAGE_NAMES[i % STAGE_NAMES.len()].to_string(),
            status,
            start_time,
            end_time,
            logs_url: format!("/api/logs/{}", random_id(rng, "log")),
            issues_found,
            issues,
        });

        start_time = end_time + ms(rng.gen_range(0..300_000));
    }

    stages
}

fn artifacts(rng: &mut StdRng, count: u32) -> Vec<Artifact> {
    (0..count)
        .map(|_| {
            let extension = pick(rng, &ARTIFACT_EXTENSIONS);
            let prefix = pick(rng, &ARTIFACT_PREFIXES);
            let name = format!("{prefix}-{}.{extension}", rng.gen_range(0..1000));
            Artifact {
                path: format!("/artifacts/{name}"),
                name,
                size_bytes: rng.gen_range(1024..100_001_024),
            }
        })
        .collect()
}

fn upload(rng: &mut StdRng) -> Upload {
    let url = format!("https://example.com/upload/{}", random_id(rng, "upload"));
    let commit_id = random_hex(rng, 40);
    let apk_count = rng.gen_range(0..3);

    Upload {
        url,
        commit_id,
        apks: (0..apk_count)
            .map(|i| UploadedApk {
                name: format!("app-{}.apk", APK_VARIANTS[i % APK_VARIANTS.len()]),
            })
            .collect(),
    }
}

impl MockDataGenerator {
    /// Generate job `index`
    ///
    /// Project rotates through eight projects by index; the job carries
    /// between three and seven stages. Artifacts are only produced for
    /// terminal statuses.
    pub fn job(&self, index: u32) -> Job {
        let mut rng = record_rng(self.seed, RecordKind::Job, u64::from(index));
        let slot = index as usize;

        let id = random_id(&mut rng, "id");
        let job_id = format!("job-{}", 10_000 + u64::from(index));
        let change_number = (1000 + index / 3).to_string();
        let patchset = rng.gen_range(1..=5);
        let commit_id = random_hex(&mut rng, 40);

        let (project_id, project_name) = PROJECTS[slot % PROJECTS.len()];
        let job_type = *pick(&mut rng, &JOB_TYPES);
        let build_type = *pick(&mut rng, &BUILD_TYPES);
        let build_target = *pick(&mut rng, &BUILD_TARGETS);
        let trigger_type = *pick(&mut rng, &TRIGGER_TYPES);
        let node = *pick(&mut rng, &NODES);

        let build_num = 1000 + index;
        let job_name = format!("{project_id}-{job_type}-{build_type}");

        let status = pick(&mut rng, &JOB_STATUSES).clone();
        let start_time = random_date(&mut rng, self.now, 30);
        let duration_ms = random_duration_ms(&mut rng);
        let end_time = start_time + ms(duration_ms);

        let stage_count = rng.gen_range(3..=7);
        let stage_start = random_date(&mut rng, self.now, 7);
        let stages = stages(&mut rng, stage_start, stage_count);

        let artifact_count = if status.is_terminal() {
            rng.gen_range(1..=5)
        } else {
            0
        };
        let artifacts = artifacts(&mut rng, artifact_count);
        let upload = upload(&mut rng);
        let vote_result = VoteResult {
            vote_type: pick(&mut rng, &VOTE_TYPES).clone(),
            score: rng.gen_range(-2..=2),
        };

        Job {
            id,
            work_dir: format!("/workspace/{project_id}/{job_id}"),
            job_url: format!("https://jenkins.example.com/job/{job_name}/{build_num}/"),
            job_id,
            change_number,
            patchset,
            commit_id,
            job_name,
            job_type: job_type.to_string(),
            build_type: build_type.to_string(),
            build_target: build_target.to_string(),
            trigger_type: trigger_type.to_string(),
            build_num,
            project_id: project_id.to_string(),
            project_name: project_name.to_string(),
            node: node.to_string(),
            status,
            start_time,
            end_time,
            duration_ms,
            vote_result,
            stages,
            artifacts,
            upload,
        }
    }

    /// Generate jobs `0..count`
    pub fn jobs(&self, count: u32) -> Vec<Job> {
        (0..count).map(|index| self.job(index)).collect()
    }
}
