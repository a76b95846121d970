//! I/O helpers for update actions.

pub mod config;
pub mod rewrite;
pub mod targets;
