//! # Inkpost API Server
//!
//! Routes, middleware and application state for the HTTP server. The binary
//! in `main.rs` wires these together; integration tests build the same app
//! around in-memory repositories.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;
