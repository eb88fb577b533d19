//! SmartDoc Core - document sessions and question-grounded context selection.
//!
//! This crate holds everything between an uploaded file and a prompt:
//!
//! - **Extraction**: PDF pages and spreadsheet sheets rendered into one normalized text
//! - **Truncation**: hard character budget for stored content
//! - **Sessions**: bounded in-memory store with FIFO-by-age eviction
//! - **Context selection**: keyword window heuristic that fits large documents
//!   into a token-limited model call
//! - **Service**: the Ingest / Answer / History / Delete operations, driven by
//!   an abstract [`Generator`]
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use smartdoc_core::{DocumentService, ServiceConfig, SessionStore};
//!
//! let store = Arc::new(SessionStore::new(100));
//! let service = DocumentService::new(store, generator, ServiceConfig::default());
//!
//! let uploaded = service.ingest("report.pdf", &bytes).await?;
//! let reply = service.answer(&uploaded.session_id, "What was Q3 revenue?").await?;
//! ```

pub mod error;
pub mod extract;
pub mod generator;
pub mod prompt;
pub mod selector;
pub mod service;
pub mod session;
pub mod truncate;
pub mod types;

pub use error::{CoreError, Result};
pub use generator::{GenerationError, GenerationResult, Generator};
pub use selector::{ContextSelector, SelectorConfig};
pub use service::{DocumentService, PreparedDocument, ServiceConfig, SUMMARY_FALLBACK};
pub use session::{SessionStore, DEFAULT_MAX_SESSIONS};
pub use truncate::{truncate, Truncated, TRUNCATION_MARKER};
pub use types::{AnswerOutcome, DocType, DocumentSession, Exchange, HistoryView, IngestOutcome};
