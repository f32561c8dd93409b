//! # Command Handlers
//!
//! One module per command family, plus the helpers they share: identifier
//! resolution with user-visible failures, and chunked submission to the
//! upstream posting capability.

pub mod follow;
pub mod help;
pub mod post;
pub mod relay;
pub mod reply;
pub mod repost;

use anyhow::Result;
use std::sync::Arc;

use crate::application::relay::compose;
use crate::application::relay::memory::SharedMemory;
use crate::domain::error::UpstreamError;
use crate::domain::traits::{ChatProvider, Microblog};
use crate::strings::messages;

pub(crate) async fn notify(chat: &impl ChatProvider, text: &str) -> Result<()> {
    chat.send_notification(text)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

/// Resolve a user-supplied identifier, reporting failures to the user.
/// Returns `None` when the operation should be aborted.
pub(crate) async fn resolve_or_notify(
    memory: &SharedMemory,
    chat: &impl ChatProvider,
    candidate: &str,
) -> Result<Option<String>> {
    let resolved = memory.lock().await.resolve(candidate);
    match resolved {
        Ok(id) => Ok(Some(id)),
        Err(e) => {
            notify(chat, &e.to_string()).await?;
            Ok(None)
        }
    }
}

/// Surface an upstream failure to the requesting user. Structured
/// rejections produce one notice per sub-error.
pub(crate) async fn report_upstream_error(
    chat: &impl ChatProvider,
    err: &UpstreamError,
) -> Result<()> {
    match err {
        UpstreamError::Rejected { errors } => {
            for e in errors {
                notify(chat, &messages::upstream_error(e)).await?;
            }
        }
        other => notify(chat, &messages::upstream_error(&other.to_string())).await?,
    }
    Ok(())
}

/// Split an over-length message and submit every chunk. A rejected chunk is
/// reported but does not abort the remaining chunks.
pub(crate) async fn submit_chunks(
    api: &Arc<dyn Microblog>,
    chat: &impl ChatProvider,
    text: &str,
    reply_to: Option<&str>,
) -> Result<()> {
    for chunk in compose::split_message(text) {
        if let Err(e) = api.post(&chunk, reply_to).await {
            report_upstream_error(chat, &e).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use crate::domain::types::Post;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory `ChatProvider` recording what the bot said.
    #[derive(Clone, Default)]
    pub(crate) struct FakeChat {
        messages: Arc<Mutex<Vec<String>>>,
        notices: Arc<Mutex<Vec<String>>>,
    }

    impl FakeChat {
        pub(crate) fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }

        pub(crate) fn notices(&self) -> Vec<String> {
            self.notices.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatProvider for FakeChat {
        async fn send_message(&self, content: &str) -> Result<String, String> {
            self.messages.lock().unwrap().push(content.to_string());
            Ok("$event".to_string())
        }

        async fn send_notification(&self, content: &str) -> Result<(), String> {
            self.notices.lock().unwrap().push(content.to_string());
            Ok(())
        }

        fn room_id(&self) -> String {
            "!room:example.org".to_string()
        }
    }

    /// In-memory `Microblog` recording calls; optionally rejects posts.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        posts: Mutex<Vec<(String, Option<String>)>>,
        reposts: Mutex<Vec<String>>,
        follows: Mutex<Vec<String>>,
        unfollows: Mutex<Vec<String>>,
        known: Mutex<HashMap<String, Post>>,
        pub(crate) reject_posts_with: Mutex<Option<Vec<String>>>,
    }

    impl FakeApi {
        pub(crate) fn insert(&self, post: Post) {
            self.known.lock().unwrap().insert(post.id.clone(), post);
        }

        pub(crate) fn posts(&self) -> Vec<(String, Option<String>)> {
            self.posts.lock().unwrap().clone()
        }

        pub(crate) fn reposts(&self) -> Vec<String> {
            self.reposts.lock().unwrap().clone()
        }

        pub(crate) fn follows(&self) -> Vec<String> {
            self.follows.lock().unwrap().clone()
        }

        pub(crate) fn unfollows(&self) -> Vec<String> {
            self.unfollows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Microblog for FakeApi {
        async fn post(&self, text: &str, reply_to: Option<&str>) -> Result<(), UpstreamError> {
            if let Some(errors) = self.reject_posts_with.lock().unwrap().clone() {
                return Err(UpstreamError::Rejected { errors });
            }
            self.posts
                .lock()
                .unwrap()
                .push((text.to_string(), reply_to.map(str::to_string)));
            Ok(())
        }

        async fn lookup(&self, id: &str) -> Result<Post, UpstreamError> {
            self.known
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| UpstreamError::NotFound(id.to_string()))
        }

        async fn repost(&self, id: &str) -> Result<(), UpstreamError> {
            self.reposts.lock().unwrap().push(id.to_string());
            Ok(())
        }

        async fn follow(&self, user: &str) -> Result<(), UpstreamError> {
            self.follows.lock().unwrap().push(user.to_string());
            Ok(())
        }

        async fn unfollow(&self, user: &str) -> Result<(), UpstreamError> {
            self.unfollows.lock().unwrap().push(user.to_string());
            Ok(())
        }
    }
}
