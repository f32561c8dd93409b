//! # Identifier Cache
//!
//! Remembers every post id seen on the stream, bucketed by the id's final
//! two characters, so a user can refer to a post by typing just its tail.

use std::collections::{HashMap, HashSet};

use crate::domain::error::ResolveError;

/// Bucketed set of previously observed full identifiers.
///
/// Buckets grow monotonically for the life of the process; there is no
/// eviction.
#[derive(Debug, Default, Clone)]
pub struct IdCache {
    buckets: HashMap<String, HashSet<String>>,
}

impl IdCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id to the bucket keyed by its final two characters.
    /// Re-recording an existing id is a no-op.
    pub fn record(&mut self, id: &str) {
        self.buckets
            .entry(tail(id, 2))
            .or_default()
            .insert(id.to_string());
    }

    /// Resolve a possibly-truncated identifier into a full one.
    ///
    /// Candidates shorter than two characters are rejected. A candidate
    /// matching exactly one recorded id (by suffix) resolves to it; more
    /// than one match is ambiguous. A candidate matching nothing is
    /// returned unchanged: an exact id typed by a human should work even
    /// before it has been observed on the stream.
    pub fn resolve(&self, candidate: &str) -> Result<String, ResolveError> {
        if candidate.chars().count() < 2 {
            return Err(ResolveError::TooShort);
        }

        if let Some(bucket) = self.buckets.get(&tail(candidate, 2)) {
            let matching: Vec<&String> =
                bucket.iter().filter(|id| id.ends_with(candidate)).collect();
            if matching.len() > 1 {
                return Err(ResolveError::Ambiguous);
            }
            if let Some(id) = matching.first() {
                return Ok((*id).clone());
            }
        }

        Ok(candidate.to_string())
    }

    /// Number of distinct ids recorded.
    pub fn len(&self) -> usize {
        self.buckets.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// The last `n` characters of `s` (all of `s` if shorter).
fn tail(s: &str, n: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(n)).collect()
}
