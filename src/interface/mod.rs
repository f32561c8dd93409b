//! # Interface Layer
//!
//! Thin command handlers invoked by the router.

pub mod commands;
