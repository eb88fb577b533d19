//! Per-call time budget for a generator.

use smartdoc_core::{GenerationError, GenerationResult, Generator};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Fails a call with [`GenerationError::Timeout`] once `limit` elapses.
pub struct TimeoutGenerator {
    inner: Arc<dyn Generator>,
    limit: Duration,
}

impl TimeoutGenerator {
    pub fn new(inner: Arc<dyn Generator>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl Generator for TimeoutGenerator {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = GenerationResult<String>> + Send + 'a>> {
        Box::pin(async move {
            match tokio::time::timeout(self.limit, self.inner.generate(prompt)).await {
                Ok(result) => result,
                Err(_) => Err(GenerationError::Timeout(self.limit.as_secs())),
            }
        })
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
