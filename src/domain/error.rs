//! # Domain Errors
//!
//! Typed errors crossing the command and upstream boundaries. The `Display`
//! text of `ResolveError` doubles as the user-facing notice.

use thiserror::Error;

/// Failure to turn a user-supplied identifier into a full post id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Enter at least 2 digits!")]
    TooShort,
    #[error("ID could not unambiguously be resolved! Try a longer prefix.")]
    Ambiguous,
    #[error("I haven't seen any posts yet!")]
    NothingSeen,
}

/// Failure reported by the upstream service.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// Structured rejection; each entry is surfaced to the user separately.
    #[error("upstream rejected the request")]
    Rejected { errors: Vec<String> },
    #[error("post {0} does not exist")]
    NotFound(String),
    #[error("{0}")]
    Transport(String),
}

impl UpstreamError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}
