//! # Repost Command
//!
//! `.repost <id|last>` (alias `.rt`) - reshares the specified post.

use anyhow::Result;
use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::application::relay::memory::SharedMemory;
use crate::domain::traits::{ChatProvider, Microblog};
use crate::strings::messages;

fn id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[0-9]+|last)$").unwrap())
}

pub async fn handle_repost(
    memory: &SharedMemory,
    api: &Arc<dyn Microblog>,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let arg = args.trim();
    if !id_pattern().is_match(arg) {
        return super::notify(chat, messages::REPOST_USAGE).await;
    }

    let Some(id) = super::resolve_or_notify(memory, chat, arg).await? else {
        return Ok(());
    };

    if let Err(e) = api.repost(&id).await {
        super::report_upstream_error(chat, &e).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::relay::memory::RelayMemory;
    use crate::domain::error::ResolveError;
    use crate::domain::types::Post;
    use crate::interface::commands::testutil::{FakeApi, FakeChat};

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            author: "ada".to_string(),
            text: "hi".to_string(),
            repost_of: None,
        }
    }

    #[tokio::test]
    async fn test_last_sentinel_reposts_most_recent() {
        let memory = RelayMemory::shared();
        memory.lock().await.observe(&post("31337"));
        let fake = Arc::new(FakeApi::default());
        let api: Arc<dyn Microblog> = fake.clone();
        let chat = FakeChat::default();

        handle_repost(&memory, &api, &chat, "last").await.unwrap();
        assert_eq!(fake.reposts(), vec!["31337".to_string()]);
    }

    #[tokio::test]
    async fn test_ambiguous_id_aborts_with_notice() {
        let memory = RelayMemory::shared();
        {
            let mut m = memory.lock().await;
            m.observe(&post("1142"));
            m.observe(&post("5642"));
        }
        let fake = Arc::new(FakeApi::default());
        let api: Arc<dyn Microblog> = fake.clone();
        let chat = FakeChat::default();

        handle_repost(&memory, &api, &chat, "42").await.unwrap();
        assert_eq!(chat.notices(), vec![ResolveError::Ambiguous.to_string()]);
        assert!(fake.reposts().is_empty());
    }

    #[tokio::test]
    async fn test_garbage_argument_shows_usage() {
        let memory = RelayMemory::shared();
        let fake = Arc::new(FakeApi::default());
        let api: Arc<dyn Microblog> = fake.clone();
        let chat = FakeChat::default();

        handle_repost(&memory, &api, &chat, "not-an-id").await.unwrap();
        assert_eq!(chat.notices(), vec![messages::REPOST_USAGE.to_string()]);
    }
}
