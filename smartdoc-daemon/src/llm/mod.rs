//! Answer backends.
//!
//! The daemon talks to an OpenAI-compatible chat completions endpoint. Each
//! configured model becomes one [`OpenAiBackend`]; the models are tried in
//! order by a [`FallbackChain`] and the whole call is bounded by a
//! [`TimeoutGenerator`].

mod fallback;
mod openai;
mod timeout;

pub use fallback::FallbackChain;
pub use openai::{parse_completion, HttpParams, OpenAiBackend};
pub use timeout::TimeoutGenerator;

use anyhow::{Context, Result};
use smartdoc_core::Generator;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::LlmConfig;

/// Build the generator described by `[llm]`.
pub fn build_generator(config: &LlmConfig) -> Result<Arc<dyn Generator>> {
    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    let api_key = config.api_key();
    if api_key.is_none() {
        warn!(
            "{} is not set; requests to {} will be sent without an API key",
            config.api_key_env, config.base_url
        );
    }

    let params = HttpParams {
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };

    let backends: Vec<Arc<dyn Generator>> = config
        .model_chain()
        .into_iter()
        .map(|model| {
            Arc::new(OpenAiBackend::new(
                client.clone(),
                &config.base_url,
                api_key.clone(),
                model,
                params.clone(),
            )) as Arc<dyn Generator>
        })
        .collect();

    let chain = FallbackChain::new(backends);
    let generator = TimeoutGenerator::new(Arc::new(chain), config.timeout());
    info!(
        "Answer backend: {} at {} (timeout {:?})",
        generator.name(),
        config.base_url,
        generator.limit()
    );

    Ok(Arc::new(generator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_generator_names_model_chain() {
        let config = LlmConfig {
            model: "primary".to_string(),
            fallback_models: vec!["backup".to_string()],
            api_key_env: "SMARTDOC_TEST_UNSET_KEY".to_string(),
            ..LlmConfig::default()
        };

        let generator = build_generator(&config).unwrap();
        assert_eq!(generator.name(), "primary -> backup");
    }
}
