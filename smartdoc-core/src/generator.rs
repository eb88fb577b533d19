//! Text-generation capability consumed by the core.
//!
//! The core only ever needs "answer this prompt". Vendor request shaping,
//! retries and model fallback chains are implemented behind this trait by the
//! hosting binary (see `smartdoc-daemon`'s `llm` module).

use std::future::Future;
use std::pin::Pin;

/// Error type for generation calls.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Transport-level failure (connection refused, TLS, DNS...)
    #[error("request failed: {0}")]
    Http(String),

    /// Backend answered with a non-success status
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Call did not finish within the configured budget
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// Backend cannot be used as configured
    #[error("misconfigured backend: {0}")]
    Misconfigured(String),

    /// Every model in a fallback chain failed
    #[error("all models failed: {}", .0.join("; "))]
    AllModelsFailed(Vec<String>),
}

/// Result type for generation calls.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Something that turns a prompt into generated text.
///
/// # Example
///
/// ```ignore
/// use smartdoc_core::{Generator, GenerationResult};
///
/// struct Canned;
///
/// impl Generator for Canned {
///     fn generate<'a>(
///         &'a self,
///         _prompt: &'a str,
///     ) -> Pin<Box<dyn Future<Output = GenerationResult<String>> + Send + 'a>> {
///         Box::pin(async move { Ok("42".to_string()) })
///     }
///
///     fn name(&self) -> &str {
///         "canned"
///     }
/// }
/// ```
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = GenerationResult<String>> + Send + 'a>>;

    /// Backend/model identifier used in logs.
    fn name(&self) -> &str;
}
