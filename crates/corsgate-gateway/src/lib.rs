//! corsgate gateway library entry.
//!
//! This crate wires the config loader, compiled CORS policy, the axum filter
//! middleware, and operational endpoints into a gateway stack. It is intended
//! to be consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod transport;
