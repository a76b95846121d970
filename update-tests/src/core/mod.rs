//! Deterministic text transformations behind the update actions.
//!
//! Core modules must be free of I/O side effects. They take document text and
//! return rewritten text, so every substitution is testable on plain strings.

pub mod patterns;
pub mod substitution;
pub mod variable_table;
