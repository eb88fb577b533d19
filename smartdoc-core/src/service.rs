//! Document service: the operations exposed to the HTTP layer.
//!
//! Ingest and Answer are the only operations that call the generator. No
//! store lock is held across a generation call; history is appended only
//! after an answer has been produced.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{CoreError, Result};
use crate::extract;
use crate::generator::Generator;
use crate::prompt;
use crate::selector::{ContextSelector, SelectorConfig};
use crate::session::SessionStore;
use crate::truncate::truncate;
use crate::types::{AnswerOutcome, DocType, HistoryView, IngestOutcome};

/// Stored in place of a summary when the generator fails during ingest.
pub const SUMMARY_FALLBACK: &str = "Document uploaded successfully. Summary unavailable at the moment; you can still ask questions about it.";

/// Service-level limits.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Truncation budget for stored content, in characters.
    pub max_content_chars: usize,
    /// Exchanges of prior conversation included in answer prompts.
    pub history_window: usize,
    pub selector: SelectorConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_content_chars: 30_000,
            history_window: 3,
            selector: SelectorConfig::default(),
        }
    }
}

/// An upload that has been detected, extracted and truncated but not yet stored.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub filename: String,
    pub doc_type: DocType,
    pub content: String,
    /// Character count before truncation
    pub content_length: usize,
    pub truncated: bool,
}

/// Ingest / Answer / History / Delete over a shared [`SessionStore`].
pub struct DocumentService {
    store: Arc<SessionStore>,
    generator: Arc<dyn Generator>,
    selector: ContextSelector,
    config: ServiceConfig,
}

impl DocumentService {
    pub fn new(
        store: Arc<SessionStore>,
        generator: Arc<dyn Generator>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            generator,
            selector: ContextSelector::new(config.selector.clone()),
            config,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Detect, extract and truncate an upload. CPU-bound; does not touch the store.
    pub fn prepare(&self, filename: &str, bytes: &[u8]) -> Result<PreparedDocument> {
        let doc_type = extract::detect(filename, bytes)?;
        let text = extract::extract(bytes, doc_type)?;
        let content_length = text.chars().count();
        let truncated = truncate(&text, self.config.max_content_chars);

        debug!(
            "Extracted {} characters from {} ({}), truncated: {}",
            content_length, filename, doc_type, truncated.was_truncated
        );

        Ok(PreparedDocument {
            filename: filename.to_string(),
            doc_type,
            content: truncated.text,
            content_length,
            truncated: truncated.was_truncated,
        })
    }

    /// Store a prepared document and generate its initial summary.
    ///
    /// A failing summary never fails the upload; the canned fallback is
    /// returned instead.
    pub async fn ingest_prepared(&self, document: PreparedDocument) -> IngestOutcome {
        let summary_prompt =
            prompt::summary_prompt(document.doc_type, &document.filename, &document.content);
        let session_id = self
            .store
            .create(&document.filename, document.doc_type, document.content);

        info!(
            "Created session {} for {} ({} sessions live)",
            session_id,
            document.filename,
            self.store.count()
        );

        let summary = match self.generator.generate(&summary_prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!(
                    "Summary generation via {} failed for session {}: {}",
                    self.generator.name(),
                    session_id,
                    e
                );
                SUMMARY_FALLBACK.to_string()
            }
        };

        IngestOutcome {
            session_id,
            filename: document.filename,
            doc_type: document.doc_type,
            summary,
            content_length: document.content_length,
            truncated: document.truncated,
        }
    }

    /// Extract, store and summarize an upload.
    pub async fn ingest(&self, filename: &str, bytes: &[u8]) -> Result<IngestOutcome> {
        let document = self.prepare(filename, bytes)?;
        Ok(self.ingest_prepared(document).await)
    }

    /// Answer a question about a stored document and record the exchange.
    pub async fn answer(&self, session_id: &str, question: &str) -> Result<AnswerOutcome> {
        let session = self
            .store
            .get(session_id)
            .ok_or_else(|| CoreError::SessionNotFound(session_id.to_string()))?;

        let excerpt = self.selector.select(&session.content, question);
        let prompt = prompt::answer_prompt(
            session.doc_type,
            &session.filename,
            &excerpt,
            session.recent_history(self.config.history_window),
            question,
        );
        debug!(
            "Answer prompt for session {}: {} characters ({} from document)",
            session_id,
            prompt.len(),
            excerpt.len()
        );

        let answer = self.generator.generate(&prompt).await?.trim().to_string();

        // The session may have been deleted or evicted while generating
        self.store.append_history(session_id, question, &answer)?;

        Ok(AnswerOutcome {
            session_id: session_id.to_string(),
            answer,
        })
    }

    /// Document metadata and full conversation of a session.
    pub fn history(&self, session_id: &str) -> Result<HistoryView> {
        let session = self
            .store
            .get(session_id)
            .ok_or_else(|| CoreError::SessionNotFound(session_id.to_string()))?;

        Ok(HistoryView {
            filename: session.filename,
            doc_type: session.doc_type,
            history: session.history,
        })
    }

    /// Remove a session. Returns whether it existed.
    pub fn delete(&self, session_id: &str) -> bool {
        let existed = self.store.delete(session_id);
        if existed {
            info!("Deleted session {}", session_id);
        }
        existed
    }

    pub fn session_count(&self) -> usize {
        self.store.count()
    }
}
