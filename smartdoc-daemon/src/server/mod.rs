//! HTTP server for the SmartDoc daemon.
//!
//! Provides REST API for:
//! - Health checks
//! - Document upload and summary
//! - Questions, conversation history and session deletion

mod error;
mod http;
pub mod state;

pub use error::ApiError;
pub use http::create_router;
pub use state::AppState;
