//! # Relay Commands
//!
//! `.restart` - stop-and-start the stream worker. `.status` - show the
//! relay's state and the last post seen.

use anyhow::Result;
use std::sync::Arc;

use crate::application::relay::memory::SharedMemory;
use crate::application::relay::supervisor::StreamSupervisor;
use crate::domain::traits::ChatProvider;
use crate::strings::messages;

pub async fn handle_restart(
    supervisor: &Arc<StreamSupervisor>,
    chat: &impl ChatProvider,
) -> Result<()> {
    supervisor.restart().await;
    super::notify(chat, messages::RELAY_RESTARTED).await
}

pub async fn handle_status(
    memory: &SharedMemory,
    supervisor: &Arc<StreamSupervisor>,
    chat: &impl ChatProvider,
) -> Result<()> {
    let running = supervisor.is_running().await;
    let (ids_seen, last_line) = {
        let memory = memory.lock().await;
        let last_line = memory.last().map(|post| {
            let when = memory
                .last_seen_at()
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_default();
            (post.author.clone(), when)
        });
        (memory.ids_seen(), last_line)
    };

    chat.send_message(&messages::relay_status(running, ids_seen, last_line))
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
