//! SmartDoc daemon library: configuration, answer backends and the HTTP API.
//!
//! The binary in `main.rs` wires these together; tests drive the router directly.

pub mod config;
pub mod llm;
pub mod server;
