//! Transport layer (HTTP).
//!
//! Exposes the CORS filter that sits in front of every route.

pub mod cors;
