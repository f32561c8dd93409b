//! # Post Command
//!
//! `.post <text>` - posts to the upstream account, splitting over-length
//! text into continued chunks.

use anyhow::Result;
use std::sync::Arc;

use crate::domain::traits::{ChatProvider, Microblog};
use crate::strings::messages;

pub async fn handle_post(
    api: &Arc<dyn Microblog>,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let text = args.trim();
    if text.is_empty() {
        return super::notify(chat, messages::POST_USAGE).await;
    }
    super::submit_chunks(api, chat, text, None).await
}
