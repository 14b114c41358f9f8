//! Typed client for the pension email assistant backend.
//!
//! Every endpoint the desk uses is a method on [`BackendClient`]. Transport
//! failures, non-success statuses and malformed bodies all surface as
//! [`common::DeskError`].

mod client;
pub mod wire;

pub use client::BackendClient;
pub use wire::{MessageResponse, ReplyContext, Stored};
