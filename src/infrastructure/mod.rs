//! # Infrastructure Layer
//!
//! Concrete adapters for the external collaborators: Matrix for outbound
//! chat, HTTP for the upstream stream and posting API.

pub mod matrix;
pub mod upstream;
