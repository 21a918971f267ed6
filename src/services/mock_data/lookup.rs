//! ID-keyed lookup
//!
//! Single entities are regenerated from the generator, not fetched. Because
//! generation is seeded, looking up the same id twice yields the same record.

use tracing::debug;

use super::MockDataGenerator;
use super::rng::char_code_sum;
use crate::models::{ChangeDocument, Job, Project, ProjectStep, Stage};

/// Job ids wrap into this many generator indices
pub const JOB_INDEX_SPACE: u64 = 100;

/// Size of the project set regenerated for id and step lookups
pub const PROJECT_LOOKUP_POOL: u32 = 3;

/// First run of ASCII digits in `id`, reduced modulo `modulus`
///
/// Reduces digit by digit so arbitrarily long runs never overflow.
fn digits_mod(id: &str, modulus: u64) -> Option<u64> {
    let run = id
        .split(|c: char| !c.is_ascii_digit())
        .find(|part| !part.is_empty())?;

    Some(run.bytes().fold(0, |acc, b| {
        (acc * 10 + u64::from(b - b'0')) % modulus
    }))
}

/// Job type a project step maps onto; names must match exactly
fn job_type_for_step(step_name: &str) -> Option<&'static str> {
    const STEP_JOB_TYPES: [(&str, &str); 6] = [
        ("Module Build", "module_build"),
        ("Module Test", "module_test"),
        ("Full Build", "full_build"),
        ("Full Test", "full_test"),
        ("Build", "build"),
        ("Build Test", "build_test"),
    ];

    STEP_JOB_TYPES
        .iter()
        .find(|(name, _)| *name == step_name)
        .map(|(_, job_type)| *job_type)
}

impl MockDataGenerator {
    /// Regenerate the job a job id refers to
    ///
    /// The first digit run of `id` modulo 100 selects the generator index, so
    /// ids sharing those digits resolve to the same job. Ids without digits
    /// resolve to nothing.
    pub fn job_by_id(&self, id: &str) -> Option<Job> {
        let index = digits_mod(id, JOB_INDEX_SPACE)?;
        debug!(id, index, "Resolved job id to generator index");
        Some(self.job(index as u32))
    }

    /// Find a change document by `_id` or change number among the first
    /// `pool` generated documents
    pub fn change_document_by_id(&self, id: &str, pool: u32) -> Option<ChangeDocument> {
        (0..pool)
            .map(|index| self.change_document(index))
            .find(|doc| doc.id == id || doc.change_number == id)
    }

    /// Find a project by id in the fixed lookup pool
    pub fn project_by_id(&self, id: &str) -> Option<Project> {
        self.projects(PROJECT_LOOKUP_POOL)
            .into_iter()
            .find(|project| project.id == id)
    }

    /// Find a step of a project by name or step id, case-insensitively
    ///
    /// The change id is accepted for interface compatibility and does not
    /// take part in matching.
    pub fn project_step(
        &self,
        project_id: &str,
        step_name: &str,
        _change_id: Option<&str>,
    ) -> Option<ProjectStep> {
        let project = self.project_by_id(project_id)?;
        let wanted = step_name.to_lowercase();

        project
            .steps
            .into_iter()
            .find(|step| step.name.to_lowercase() == wanted || step.id.to_lowercase() == wanted)
    }

    /// Projects shown for a change; the change id does not affect the set
    pub fn projects_for_change(&self, _change_id: &str) -> Vec<Project> {
        self.projects(PROJECT_LOOKUP_POOL)
    }

    /// Job backing a project step
    ///
    /// The generator index is the sum of the character codes of both names
    /// modulo 100; the job is then relabelled for the project and step.
    pub fn job_for_project_step(&self, project_id: &str, step_name: &str) -> Job {
        let index = (char_code_sum(project_id) + char_code_sum(step_name)) % JOB_INDEX_SPACE;
        let mut job = self.job(index as u32);

        job.project_id = project_id.to_string();
        job.project_name = format!("Project {project_id}");
        if let Some(job_type) = job_type_for_step(step_name) {
            job.job_type = job_type.to_string();
        }
        job.job_name = format!("{project_id}-{}", job.job_type);

        job
    }

    /// Generated jobs named `job_name` among the first `pool`, newest build first
    pub fn builds_for_job(&self, job_name: &str, pool: u32) -> Vec<Job> {
        let mut builds: Vec<Job> = self
            .jobs(pool)
            .into_iter()
            .filter(|job| job.job_name == job_name)
            .collect();
        builds.sort_by(|a, b| b.build_num.cmp(&a.build_num));
        builds
    }

    /// A specific build of a job
    ///
    /// Falls back to a synthesized build carrying the requested name and
    /// number when none of the first `pool` jobs match.
    pub fn find_build(&self, job_name: &str, build_num: u32, pool: u32) -> Job {
        self.matching_build(job_name, build_num, pool)
            .unwrap_or_else(|| {
                debug!(job_name, build_num, "No generated build matched, synthesizing one");
                let mut build = self.job(0);
                build.job_name = job_name.to_string();
                build.build_num = build_num;
                build
            })
    }

    /// A named stage of a specific build
    ///
    /// Falls back to the first stage of job 0 renamed to `stage_name` when
    /// the build or the stage does not exist.
    pub fn find_stage(
        &self,
        job_name: &str,
        build_num: u32,
        stage_name: &str,
        pool: u32,
    ) -> Option<Stage> {
        self.matching_build(job_name, build_num, pool)
            .and_then(|build| build.stages.into_iter().find(|s| s.name == stage_name))
            .or_else(|| {
                self.job(0).stages.into_iter().next().map(|mut stage| {
                    stage.name = stage_name.to_string();
                    stage
                })
            })
    }

    fn matching_build(&self, job_name: &str, build_num: u32, pool: u32) -> Option<Job> {
        (0..pool)
            .map(|index| self.job(index))
            .find(|job| job.job_name == job_name && job.build_num == build_num)
    }
}
