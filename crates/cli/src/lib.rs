//! pension-desk CLI library
//!
//! Command handlers and terminal plumbing for the `pension-desk` binary.

pub mod commands;
pub mod context;
pub mod progress;
pub mod render;
pub mod session;

pub use context::AppContext;
