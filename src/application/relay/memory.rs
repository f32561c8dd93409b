//! # Relay Memory
//!
//! The shared state mutated by the stream worker and read by the command
//! handlers: the identifier cache and the most recently seen post. One lock
//! guards both; critical sections never span I/O. Readers may see slightly
//! stale combinations of the two fields, which is acceptable.

use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::relay::ids::IdCache;
use crate::domain::error::ResolveError;
use crate::domain::types::Post;

/// Sentinel accepted wherever an id is, meaning "the most recent post".
pub const LAST_SENTINEL: &str = "last";

pub type SharedMemory = Arc<Mutex<RelayMemory>>;

#[derive(Debug, Default)]
pub struct RelayMemory {
    ids: IdCache,
    last: Option<Post>,
    last_seen_at: Option<DateTime<Local>>,
}

impl RelayMemory {
    pub fn shared() -> SharedMemory {
        Arc::new(Mutex::new(Self::default()))
    }

    /// Record a freshly classified post: its id joins the cache and it
    /// overwrites the last-item slot. Called before the post is formatted
    /// for announcement, so "reply to last" sees consistent state.
    pub fn observe(&mut self, post: &Post) {
        self.ids.record(&post.id);
        self.last = Some(post.clone());
        self.last_seen_at = Some(Local::now());
    }

    pub fn last(&self) -> Option<&Post> {
        self.last.as_ref()
    }

    pub fn last_seen_at(&self) -> Option<DateTime<Local>> {
        self.last_seen_at
    }

    pub fn ids_seen(&self) -> usize {
        self.ids.len()
    }

    /// Resolve a user-supplied identifier, honoring the `last` sentinel.
    pub fn resolve(&self, candidate: &str) -> Result<String, ResolveError> {
        if candidate == LAST_SENTINEL {
            return self
                .last
                .as_ref()
                .map(|post| post.id.clone())
                .ok_or(ResolveError::NothingSeen);
        }
        self.ids.resolve(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            author: "ada".to_string(),
            text: "hello".to_string(),
            repost_of: None,
        }
    }

    #[test]
    fn test_last_sentinel_resolves_to_most_recent() {
        let mut memory = RelayMemory::default();
        memory.observe(&post("1001"));
        memory.observe(&post("1002"));
        assert_eq!(memory.resolve(LAST_SENTINEL), Ok("1002".to_string()));
        assert_eq!(memory.last().unwrap().id, "1002");
    }

    #[test]
    fn test_last_sentinel_fails_before_any_item() {
        let memory = RelayMemory::default();
        assert_eq!(
            memory.resolve(LAST_SENTINEL),
            Err(ResolveError::NothingSeen)
        );
    }

    #[test]
    fn test_observe_overwrites_not_appends() {
        let mut memory = RelayMemory::default();
        memory.observe(&post("1001"));
        memory.observe(&post("1002"));
        assert_eq!(memory.last().map(|p| p.id.as_str()), Some("1002"));
        // Both ids remain resolvable through the cache.
        assert_eq!(memory.resolve("1001"), Ok("1001".to_string()));
        assert_eq!(memory.ids_seen(), 2);
    }
}
