//! Agent Dashboard Backend Library
//!
//! This library exposes modules for testing and external use.
//! The server binary is in `src/main.rs`; the desktop dashboard embeds
//! the registry and the translation pipeline directly.

pub mod api;
pub mod config;
pub mod document;
pub mod error;
/// Agent registry and worker loops
///
/// Handles per-agent status, log history and the heartbeat tasks.
pub mod state;
pub mod translation;
