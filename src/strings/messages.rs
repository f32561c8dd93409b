//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages:
//! stream notices, command usage, and error reports.

use crate::domain::types::Post;

pub const AUTH_DENIED: &str = "🚫 **Authorization Denied**.";
pub const UNKNOWN_COMMAND: &str = "❓ Unknown command.";

pub const STREAM_LIVE: &str =
    "**relay:** This channel is now streaming in real-time.";

pub fn stream_lost(wait_secs: u64) -> String {
    format!("**relay:** Stream connection lost! Waiting {wait_secs} seconds to reconnect.")
}

pub fn stream_failed(wait_secs: u64) -> String {
    format!("**relay:** Error while following the stream! Waiting {wait_secs} seconds to reconnect.")
}

pub fn error_detail(err: &str) -> String {
    format!("↳ {err}")
}

/// The announcement line for one classified post. Reshares show both the
/// resharer and the original author; the link always points at the
/// resharer's status, which is the id we recorded.
pub fn post_announcement(post: &Post, status_url_base: &str) -> String {
    let url = format!(
        "{}/{}/status/{}",
        status_url_base.trim_end_matches('/'),
        post.author,
        post.id
    );
    match &post.repost_of {
        Some(original) => format!(
            "**[@{} RT @{}]** {} ({url})",
            post.author, original.author, original.text
        ),
        None => format!("**[@{}]** {} ({url})", post.author, post.text),
    }
}

pub fn upstream_error(err: &str) -> String {
    format!("Upstream returned error: {err}")
}

pub fn post_missing(id: &str) -> String {
    format!("Post {id} does not exist!")
}

pub fn now_following(user: &str) -> String {
    format!("Now following @{user}.")
}

pub fn no_longer_following(user: &str) -> String {
    format!("No longer following @{user}.")
}

pub const RELAY_RESTARTED: &str = "🔁 **Stream relay restarted.**";

pub const POST_USAGE: &str = "Usage: `.post <text>`";
pub const REPOST_USAGE: &str = "Usage: `.repost <id|last>`";
pub const REPLY_USAGE: &str = "Usage: `.reply <id|last> <text>`";
pub const FOLLOW_USAGE: &str = "Usage: `.follow <user>`";
pub const UNFOLLOW_USAGE: &str = "Usage: `.unfollow <user>`";

pub fn relay_status(
    running: bool,
    ids_seen: usize,
    last_line: Option<(String, String)>,
) -> String {
    let state = if running { "🟢 running" } else { "🔴 stopped" };
    let mut msg = format!("**Relay**: {state}\n**Posts seen**: {ids_seen}\n");
    match last_line {
        Some((author, when)) => {
            msg.push_str(&format!("**Last post**: @{author} at {when}"));
        }
        None => msg.push_str("**Last post**: none yet"),
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RepostFragment;

    #[test]
    fn test_post_announcement_formats() {
        let post = Post {
            id: "1142".to_string(),
            author: "ada".to_string(),
            text: "hello".to_string(),
            repost_of: None,
        };
        assert_eq!(
            post_announcement(&post, "https://example.com/"),
            "**[@ada]** hello (https://example.com/ada/status/1142)"
        );

        let reshare = Post {
            repost_of: Some(RepostFragment {
                author: "grace".to_string(),
                text: "original".to_string(),
            }),
            ..post
        };
        assert_eq!(
            post_announcement(&reshare, "https://example.com"),
            "**[@ada RT @grace]** original (https://example.com/ada/status/1142)"
        );
    }
}
