//! corsgate core: the CORS decision engine and its compiled policy.
//!
//! This crate turns a normalized request descriptor into a single `Decision`
//! (pass through, allow with synthesized headers, or reject with a status).
//! It carries no HTTP framework or runtime dependencies so the engine can sit
//! behind any server that can fill in a `CorsRequest`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Bad configuration surfaces as `CorsGateError` at construction; bad traffic
//! surfaces as an ordinary `Decision`, never as a panic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod policy;

/// Shared result type.
pub use error::{CorsGateError, Result};
pub use policy::{
    AllowHeaders, CorsRequest, Decision, DecisionEngine, PolicyConfig, RequestKind, Tier,
};
