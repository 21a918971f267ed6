//! Seeded randomness helpers for the mock data generators.
//!
//! Every record draws from its own `StdRng`, seeded from the base seed, the
//! record kind and the record index, so a record can be regenerated on its
//! own without replaying the records before it.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fibonacci hashing constant used to spread consecutive indices
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

pub(crate) const MINUTE_MS: i64 = 60 * 1000;
pub(crate) const HOUR_MS: i64 = 60 * MINUTE_MS;
pub(crate) const DAY_MS: i64 = 24 * HOUR_MS;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const HEX: &[u8] = b"0123456789abcdef";

/// Kind of record being generated; keeps streams for the same index apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    ChangeDocument,
    Job,
    Project,
}

impl RecordKind {
    fn salt(self) -> u64 {
        match self {
            Self::ChangeDocument => 0xC4A6_0001,
            Self::Job => 0xC4A6_0002,
            Self::Project => 0xC4A6_0003,
        }
    }
}

/// RNG for record `index` of `kind` under `seed`
pub fn record_rng(seed: u64, kind: RecordKind, index: u64) -> StdRng {
    let stream = seed ^ kind.salt().wrapping_mul(GOLDEN_GAMMA);
    StdRng::seed_from_u64(stream.wrapping_add(index.wrapping_mul(GOLDEN_GAMMA)))
}

/// Uniformly pick one element of a non-empty slice
pub fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

/// `now` moved back by a whole number of days in `[0, days_ago)`
pub fn random_date(rng: &mut StdRng, now: DateTime<Utc>, days_ago: i64) -> DateTime<Utc> {
    now - Duration::days(rng.gen_range(0..days_ago))
}

/// Lowercase hex string of `len` digits, e.g. a commit id
pub fn random_hex(rng: &mut StdRng, len: usize) -> String {
    (0..len)
        .map(|_| char::from(*pick(rng, HEX)))
        .collect()
}

/// `<prefix>-` followed by eight base-36 characters
pub fn random_id(rng: &mut StdRng, prefix: &str) -> String {
    let suffix: String = (0..8).map(|_| char::from(*pick(rng, BASE36))).collect();
    format!("{prefix}-{suffix}")
}

/// Sum of the character codes of `s`
pub fn char_code_sum(s: &str) -> u64 {
    s.chars().map(|c| u64::from(u32::from(c))).sum()
}
