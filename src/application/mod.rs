//! # Application Layer
//!
//! Contains the core logic of the bot: the stream relay and the command
//! routing that shares its state.

pub mod relay;
pub mod router;
