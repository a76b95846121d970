//! Rewrites behave tests and setup scripts of an image repository so the test
//! suite runs against another Maven repository, examples fork, artifacts
//! version or runtime image.
//!
//! - **[`core`]**: Pure text rewrites. No I/O, tested on strings.
//! - **[`io`]**: Configuration, target discovery and file rewriting.
//!
//! [`actions`] composes both into one function per update, and [`cli`] maps
//! command-line options onto those actions.

pub mod actions;
pub mod cli;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
