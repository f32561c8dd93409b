//! # Core Types
//!
//! Plain data carried between the stream worker, the command handlers, and
//! the outbound adapters.

/// One discrete piece of content delivered by the upstream push source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub author: String,
    pub text: String,
    /// Present when this post reshares another one.
    pub repost_of: Option<RepostFragment>,
}

/// The fragment of an original post carried inside a reshare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepostFragment {
    pub author: String,
    pub text: String,
}

/// The typed outcome of classifying one decoded stream message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Stream-start sentinel; the connection is live.
    Connected,
    /// A new content item (original or reshare).
    Item(Post),
    /// Keep-alive; nothing to do but idle briefly.
    Empty,
    /// Non-empty but not something we handle.
    Unrecognized,
}
