//! Change document generator

use chrono::Duration;
use rand::Rng;

use super::rng::{DAY_MS, HOUR_MS, RecordKind, pick, random_date, record_rng};
use super::{BRANCHES, MockDataGenerator, REPOSITORIES};
use crate::models::{
    BuildResult, ChangeDocument, ChangeStatus, ChangeSummary, CiRunRef, CiType, CurrentState,
    Owner, Patchset, PatchsetStatus, Rdc, TestRunRef, Vote, VoteLabel,
};

/// Review server every generated change lives on
pub const REVIEW_SERVER: &str = "gerrit.example.com";

const CI_TYPES: [CiType; 3] = [CiType::AppCi, CiType::SystemCi, CiType::IntegrationCi];

const BUILD_RESULTS: [BuildResult; 4] = [
    BuildResult::Success,
    BuildResult::Failed,
    BuildResult::Running,
    BuildResult::Pending,
];

const VOTE_LABELS: [VoteLabel; 3] = [
    VoteLabel::CodeReview,
    VoteLabel::Verified,
    VoteLabel::QaReview,
];

const OWNERS: [&str; 5] = [
    "Alice Zhang",
    "Bob Li",
    "Carol Wang",
    "David Zhao",
    "Erin Qian",
];

const REVIEWERS: [&str; 4] = ["Alice Zhang", "Bob Li", "Carol Wang", "David Zhao"];

impl MockDataGenerator {
    /// Generate change document `index`
    ///
    /// Repository, branch, CI type and owner rotate with the index; counts of
    /// patchsets (1-5), votes (1-3), CI runs (1-3) and test runs (1-2) are
    /// drawn from the record's seeded stream.
    pub fn change_document(&self, index: u32) -> ChangeDocument {
        let mut rng = record_rng(self.seed, RecordKind::ChangeDocument, u64::from(index));
        let slot = index as usize;

        let change_number = (1000 + u64::from(index)).to_string();
        let repository = REPOSITORIES[slot % REPOSITORIES.len()];
        let branch = BRANCHES[slot % BRANCHES.len()];

        let created_at = random_date(&mut rng, self.now, 30);
        let updated_at = created_at + Duration::milliseconds(rng.gen_range(0..DAY_MS * 5));
        let merged_at = rng
            .gen_bool(0.3)
            .then(|| updated_at + Duration::milliseconds(rng.gen_range(0..DAY_MS * 3)));

        let status = if merged_at.is_some() {
            ChangeStatus::Merged
        } else if rng.gen_bool(0.1) {
            ChangeStatus::Abandoned
        } else {
            ChangeStatus::Active
        };

        let current_state = CurrentState {
            ci_status: pick(&mut rng, &BUILD_RESULTS).clone(),
            test_status: pick(&mut rng, &BUILD_RESULTS).clone(),
        };

        let patchset_count: u32 = rng.gen_range(1..=5);
        let patchsets = (0..patchset_count)
            .map(|i| Patchset {
                number: i + 1,
                commit_id: format!("commit-{change_number}-{}", i + 1),
                created_at: created_at + Duration::hours(12 * i64::from(i)),
                status: if i + 1 == patchset_count {
                    PatchsetStatus::Active
                } else {
                    PatchsetStatus::Superseded
                },
            })
            .collect();

        let vote_count: usize = rng.gen_range(1..=3);
        let votes = (0..vote_count)
            .map(|i| Vote {
                label: VOTE_LABELS[i % VOTE_LABELS.len()].clone(),
                user: pick(&mut rng, &REVIEWERS).to_string(),
                time: updated_at - Duration::milliseconds((vote_count - i) as i64 * HOUR_MS),
                mark: rng.gen_range(-1..=1),
            })
            .collect();

        let ci_count: u32 = rng.gen_range(1..=3);
        let total_ci: Vec<CiRunRef> = (0..ci_count)
            .map(|i| {
                let job_name = format!("{repository}-ci-{}", i + 1);
                let build_num = 1000 + i;
                CiRunRef {
                    job_url: format!("https://jenkins.example.com/job/{job_name}/{build_num}/"),
                    job_name,
                    job_type: CI_TYPES[i as usize % CI_TYPES.len()].clone(),
                    id: format!("ci-{change_number}-{}", i + 1),
                    build_num,
                    build_ret: pick(&mut rng, &BUILD_RESULTS).clone(),
                    project_id: format!("project-{}", 1000 + i),
                    project_name: format!("{repository} project"),
                }
            })
            .collect();

        let test_count: u32 = rng.gen_range(1..=2);
        let total_test: Vec<TestRunRef> = (0..test_count)
            .map(|i| {
                let job_name = format!("{repository}-test-{}", i + 1);
                let build_num = 2000 + i;
                TestRunRef {
                    id: format!("test-{change_number}-{}", i + 1),
                    job_url: format!("https://jenkins.example.com/job/{job_name}/{build_num}/"),
                    job_name,
                    build_num,
                    build_ret: pick(&mut rng, &BUILD_RESULTS).clone(),
                    project_id: format!("project-{}", 1000 + i),
                    project_name: format!("{repository} project"),
                }
            })
            .collect();

        let rdc_key = format!("RDC-{}", 1000 + rng.gen_range(0..1000));
        let topic = if rng.gen_bool(0.5) {
            format!("topic-{}", rng.gen_range(0..100))
        } else {
            String::new()
        };

        let open_ms = (self.now - created_at).num_milliseconds().max(0) as u64;
        let days_open = open_ms.div_ceil(DAY_MS as u64) as u32;

        let owner_number = 100 + slot % 10;

        ChangeDocument {
            id: format!("doc-{change_number}"),
            server: REVIEW_SERVER.to_string(),
            rdc: Rdc {
                url: format!("https://rdc.example.com/issues/{rdc_key}"),
                key: rdc_key,
                title: format!("[{repository}] Fix issue on {branch} #{change_number}"),
            },
            current_patchset: patchset_count,
            repository: repository.to_string(),
            branch: branch.to_string(),
            status,
            owner: Owner {
                id: format!("user-{owner_number}"),
                name: OWNERS[slot % OWNERS.len()].to_string(),
                email: format!("user{owner_number}@example.com"),
            },
            refs_spec: format!(
                "refs/changes/{}/{change_number}/{patchset_count}",
                &change_number[change_number.len() - 2..]
            ),
            topic,
            created_at,
            updated_at,
            merged_at,
            patchsets,
            ci_type: CI_TYPES[slot % CI_TYPES.len()].clone(),
            current_state,
            votes,
            summary: ChangeSummary {
                total_ci_runs: ci_count,
                total_test_runs: test_count,
                latest_ci_job_id: total_ci.first().map(|r| r.id.clone()).unwrap_or_default(),
                latest_test_id: total_test.first().map(|r| r.id.clone()).unwrap_or_default(),
                days_open,
            },
            total_ci,
            total_test,
            change_number,
        }
    }

    /// Generate change documents `0..count`
    pub fn change_documents(&self, count: u32) -> Vec<ChangeDocument> {
        (0..count).map(|index| self.change_document(index)).collect()
    }
}
