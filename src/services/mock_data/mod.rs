//! Mock data generators
//!
//! Synthesizes change documents, jobs and projects with bounded, plausible
//! field values. Generation is a pure function of the base seed, the record
//! index and the reference time, so the same inputs always regenerate the
//! same record.

pub mod change_documents;
pub mod jobs;
pub mod lookup;
pub mod projects;
pub mod rng;

use chrono::{DateTime, Utc};

pub use lookup::{JOB_INDEX_SPACE, PROJECT_LOOKUP_POOL};
pub use projects::derive_build_status;

/// Repositories records rotate through by index
pub(crate) const REPOSITORIES: [&str; 5] = [
    "android-app-main",
    "system-core",
    "ui-framework",
    "network-service",
    "media-player",
];

/// Branches records rotate through by index
pub(crate) const BRANCHES: [&str; 5] = [
    "master",
    "develop",
    "feature/new-ui",
    "bugfix/memory-leak",
    "release/v2.0",
];

/// Deterministic generator for mock CI records
#[derive(Debug, Clone, Copy)]
pub struct MockDataGenerator {
    seed: u64,
    now: DateTime<Utc>,
}

impl MockDataGenerator {
    /// Create a generator; timestamps are placed relative to `now`
    pub fn new(seed: u64, now: DateTime<Utc>) -> Self {
        Self { seed, now }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Reference time all generated timestamps are relative to
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
