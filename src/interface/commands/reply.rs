//! # Reply Command
//!
//! `.reply <id|last> <text>` replies to a post, prepending the @mention
//! of its author.

use anyhow::Result;
use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::application::relay::memory::SharedMemory;
use crate::domain::error::UpstreamError;
use crate::domain::traits::{ChatProvider, Microblog};
use crate::strings::messages;

fn reply_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<id>[0-9]+|last)(?:\s+(?P<message>.+))?$").unwrap())
}

pub async fn handle_reply(
    memory: &SharedMemory,
    api: &Arc<dyn Microblog>,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let Some(caps) = reply_pattern().captures(args.trim()) else {
        return super::notify(chat, messages::REPLY_USAGE).await;
    };
    let Some(message) = caps.name("message") else {
        return super::notify(chat, messages::REPLY_USAGE).await;
    };

    let Some(id) = super::resolve_or_notify(memory, chat, &caps["id"]).await? else {
        return Ok(());
    };

    let target = match api.lookup(&id).await {
        Ok(target) => target,
        Err(UpstreamError::NotFound(_)) => {
            return super::notify(chat, &messages::post_missing(&id)).await;
        }
        Err(e) => return super::report_upstream_error(chat, &e).await,
    };

    let full = format!("@{} {}", target.author, message.as_str());
    super::submit_chunks(api, chat, &full, Some(&id)).await
}
