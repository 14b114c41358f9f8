//! Infrastructure Layer
//!
//! Everything that touches the local machine rather than the backend:
//! configuration files, `.env` and environment overrides.

pub mod config;

pub use config::{ConfigLoader, ConfigSource, ConfigValidator};
