//! # Domain Traits
//!
//! Abstract interfaces for the external collaborators (chat delivery, the
//! upstream stream, the upstream posting API). Allows for pluggable
//! implementations in the Infrastructure layer and fakes in tests.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::domain::error::UpstreamError;
use crate::domain::types::Post;

/// Abstract interface for replying to the room a command came from.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Send a notification (not tracked/editable)
    async fn send_notification(&self, content: &str) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// One named outbound chat connection, able to deliver a line of text to a
/// channel it is joined to.
#[async_trait]
pub trait ChatOutlet: Send + Sync {
    async fn deliver(&self, channel: &str, text: &str) -> Result<(), String>;

    /// Whether the connection is currently usable. Offline outlets are
    /// skipped by the fanout, not treated as errors.
    fn is_live(&self) -> bool;
}

/// A sequence of decoded stream messages. `Value::Null` items mean
/// "connection alive, nothing new right now".
pub type MessageStream = BoxStream<'static, Result<Value, UpstreamError>>;

/// An authenticated server-push message source.
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn open(&self) -> Result<MessageStream, UpstreamError>;
}

/// The upstream posting capability used by the command handlers.
#[async_trait]
pub trait Microblog: Send + Sync {
    async fn post(&self, text: &str, reply_to: Option<&str>) -> Result<(), UpstreamError>;

    async fn lookup(&self, id: &str) -> Result<Post, UpstreamError>;

    async fn repost(&self, id: &str) -> Result<(), UpstreamError>;

    async fn follow(&self, user: &str) -> Result<(), UpstreamError>;

    async fn unfollow(&self, user: &str) -> Result<(), UpstreamError>;
}
