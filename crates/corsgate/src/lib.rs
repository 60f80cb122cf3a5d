//! Top-level facade crate for corsgate.
//!
//! Re-exports the decision engine and the axum gateway so users can depend on a single crate.

pub mod core {
    pub use corsgate_core::*;
}

pub mod gateway {
    pub use corsgate_gateway::*;
}
