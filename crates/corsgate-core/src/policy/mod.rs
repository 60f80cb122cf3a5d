//! Policy layer (whitelists, compiled config, decision engine).
//!
//! `PolicyConfig` compiles raw configuration lists once at startup;
//! `DecisionEngine` evaluates each request against it without locking or I/O.

pub mod allowlist;
pub mod config;
pub mod engine;
pub mod request;

pub use config::PolicyConfig;
pub use engine::{DecisionEngine, OPEN_ALLOWED_METHODS, WILDCARD_ORIGIN};
pub use request::{AllowHeaders, CorsRequest, Decision, RequestKind, Tier, X_REQUESTED_WITH};
