//! Application Ports
//!
//! Abstractions the services depend on; `adapters` implements them over the
//! backend client.

pub mod remote_store;

pub use remote_store::*;
