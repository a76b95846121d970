//! Stable exit codes for the `update-tests` CLI.

/// All requested updates were applied (or nothing was requested).
pub const OK: i32 = 0;
/// An update failed: missing target file, pattern not found, I/O or config error.
pub const FAILED: i32 = 1;
/// Invalid command line; clap exits with this status on its own.
pub const USAGE: i32 = 2;
