//! Shared application state for the server.

use smartdoc_core::DocumentService;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Sessions, extraction and answering
    pub service: Arc<DocumentService>,
    /// Largest accepted upload, in bytes
    pub max_upload_bytes: usize,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: Arc<DocumentService>, max_upload_bytes: usize) -> Self {
        Self {
            service,
            max_upload_bytes,
            start_time: Instant::now(),
        }
    }
}
