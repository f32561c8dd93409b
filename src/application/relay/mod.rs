//! # Stream Relay
//!
//! The relay core: a supervised background worker follows the upstream
//! push stream, classifies messages, remembers identifiers and the last
//! seen post, and fans announcements out to the configured destinations.
//! Command handlers read the same shared memory concurrently.

pub mod backoff;
pub mod classify;
pub mod compose;
pub mod fanout;
pub mod ids;
pub mod memory;
pub mod supervisor;
