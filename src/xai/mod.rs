//! Upstream client for the xAI Grok API
//!
//! This module owns everything that touches the upstream HTTP service:
//!
//! - [`types`] - request/response wire shapes per endpoint
//! - [`client`] - the [`client::XaiApi`] trait and its reqwest-backed
//!   implementation [`client::XaiClient`]
//! - [`poll`] - the bounded fixed-interval polling loop for asynchronous
//!   video jobs
//!
//! The client is constructed once at startup from the process configuration
//! and injected into the tool handlers; nothing in this module holds mutable
//! state across calls.

pub mod client;
pub mod poll;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use client::{XaiApi, XaiClient};
pub use poll::{poll_video_job, PollConfig};
