//! # Follow Commands
//!
//! `.follow <user>` / `.unfollow <user>` - manage who the upstream account
//! (and therefore the stream) follows.

use anyhow::Result;
use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::domain::traits::{ChatProvider, Microblog};
use crate::strings::messages;

fn user_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@?([0-9a-z_]+)$").unwrap())
}

pub async fn handle_follow(
    api: &Arc<dyn Microblog>,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let Some(user) = parse_user(args) else {
        return super::notify(chat, messages::FOLLOW_USAGE).await;
    };
    match api.follow(&user).await {
        Ok(()) => super::notify(chat, &messages::now_following(&user)).await,
        Err(e) => super::report_upstream_error(chat, &e).await,
    }
}

pub async fn handle_unfollow(
    api: &Arc<dyn Microblog>,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let Some(user) = parse_user(args) else {
        return super::notify(chat, messages::UNFOLLOW_USAGE).await;
    };
    match api.unfollow(&user).await {
        Ok(()) => super::notify(chat, &messages::no_longer_following(&user)).await,
        Err(e) => super::report_upstream_error(chat, &e).await,
    }
}

fn parse_user(args: &str) -> Option<String> {
    user_pattern()
        .captures(args.trim())
        .map(|caps| caps[1].to_string())
}
