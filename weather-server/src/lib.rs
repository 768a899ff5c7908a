//! HTTP API for the weather records service.
//!
//! The binary wires configuration and logging; this library holds the
//! router so it can be driven directly in tests.

pub mod api;
pub mod error;

pub use api::{AppState, router};
