//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in
//! `interface/commands`). It parses the command word (e.g., `.post`) and
//! dispatches it with the necessary context. Relay commands that act on the
//! upstream account are admin-gated.

use anyhow::Result;
use std::sync::Arc;

use crate::application::relay::memory::SharedMemory;
use crate::application::relay::supervisor::StreamSupervisor;
use crate::domain::config::AppConfig;
use crate::domain::traits::{ChatProvider, Microblog};
use crate::interface::commands;
use crate::strings::messages;

pub struct CommandRouter {
    config: AppConfig,
    memory: SharedMemory,
    api: Arc<dyn Microblog>,
    supervisor: Arc<StreamSupervisor>,
}

impl CommandRouter {
    pub fn new(
        config: AppConfig,
        memory: SharedMemory,
        api: Arc<dyn Microblog>,
        supervisor: Arc<StreamSupervisor>,
    ) -> Self {
        Self {
            config,
            memory,
            api,
            supervisor,
        }
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider + Clone + Send + Sync + 'static,
    {
        let msg = message.trim();
        if !msg.starts_with('.') {
            return Ok(());
        }

        let (cmd, args) = if let Some(idx) = msg.find(' ') {
            (&msg[..idx], msg[idx + 1..].trim())
        } else {
            (msg, "")
        };
        tracing::info!(
            "Router dispatching cmd='{}' args='{}' sender='{}'",
            cmd,
            args,
            sender
        );

        match cmd {
            ".help" => {
                commands::help::handle_help(chat).await?;
            }
            ".status" => {
                commands::relay::handle_status(&self.memory, &self.supervisor, chat).await?;
            }
            ".post" | ".repost" | ".rt" | ".reply" | ".follow" | ".unfollow" | ".restart" => {
                if !self.is_admin(sender) {
                    let _ = chat.send_notification(messages::AUTH_DENIED).await;
                    return Ok(());
                }
                match cmd {
                    ".post" => commands::post::handle_post(&self.api, chat, args).await?,
                    ".repost" | ".rt" => {
                        commands::repost::handle_repost(&self.memory, &self.api, chat, args)
                            .await?
                    }
                    ".reply" => {
                        commands::reply::handle_reply(&self.memory, &self.api, chat, args).await?
                    }
                    ".follow" => commands::follow::handle_follow(&self.api, chat, args).await?,
                    ".unfollow" => {
                        commands::follow::handle_unfollow(&self.api, chat, args).await?
                    }
                    ".restart" => {
                        commands::relay::handle_restart(&self.supervisor, chat).await?
                    }
                    _ => unreachable!(),
                }
            }
            _ => {
                let _ = chat.send_message(messages::UNKNOWN_COMMAND).await;
            }
        }

        Ok(())
    }

    /// Check sender against the configured admin list (case-insensitive).
    fn is_admin(&self, sender: &str) -> bool {
        let sender_lower = sender.to_lowercase();
        self.config
            .system
            .admin
            .iter()
            .any(|u| u.to_lowercase() == sender_lower)
    }
}
