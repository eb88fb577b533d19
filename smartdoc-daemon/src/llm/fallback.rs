//! Ordered model fallback.

use smartdoc_core::{GenerationError, GenerationResult, Generator};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tries each backend in order and returns the first success.
pub struct FallbackChain {
    backends: Vec<Arc<dyn Generator>>,
    name: String,
}

impl FallbackChain {
    pub fn new(backends: Vec<Arc<dyn Generator>>) -> Self {
        let name = backends
            .iter()
            .map(|b| b.name())
            .collect::<Vec<_>>()
            .join(" -> ");
        Self { backends, name }
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    async fn run(&self, prompt: &str) -> GenerationResult<String> {
        if self.backends.is_empty() {
            return Err(GenerationError::Misconfigured(
                "no models configured".to_string(),
            ));
        }

        let mut failures = Vec::with_capacity(self.backends.len());
        for backend in &self.backends {
            match backend.generate(prompt).await {
                Ok(text) => {
                    debug!(model = backend.name(), "Generation succeeded");
                    return Ok(text);
                }
                Err(e) => {
                    warn!("Model {} failed: {}", backend.name(), e);
                    failures.push(format!("{}: {}", backend.name(), e));
                }
            }
        }

        Err(GenerationError::AllModelsFailed(failures))
    }
}

impl Generator for FallbackChain {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = GenerationResult<String>> + Send + 'a>> {
        Box::pin(self.run(prompt))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
