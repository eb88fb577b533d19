//! OpenAI-compatible chat completions backend.
//!
//! Works against any server implementing `POST {base_url}/chat/completions`
//! (OpenAI, OpenRouter, vLLM, llama.cpp, Ollama...).

use reqwest::Client;
use serde::{Deserialize, Serialize};
use smartdoc_core::{GenerationError, GenerationResult, Generator};
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Request parameters shared by every call.
#[derive(Debug, Clone)]
pub struct HttpParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// One model on one OpenAI-compatible endpoint.
pub struct OpenAiBackend {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    params: HttpParams,
}

impl OpenAiBackend {
    pub fn new(
        client: Client,
        base_url: &str,
        api_key: Option<String>,
        model: impl Into<String>,
        params: HttpParams,
    ) -> Self {
        Self {
            client,
            endpoint: completions_url(base_url),
            api_key,
            model: model.into(),
            params,
        }
    }

    async fn complete(&self, prompt: &str) -> GenerationResult<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.params.max_tokens,
            temperature: self.params.temperature,
        };

        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Requesting chat completion"
        );

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text.chars().take(500).collect(),
            });
        }

        parse_completion(&text)
    }
}

impl Generator for OpenAiBackend {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = GenerationResult<String>> + Send + 'a>> {
        Box::pin(self.complete(prompt))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// `{base_url}/chat/completions`, tolerating a trailing slash.
fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Pull the generated text out of a chat completions response body.
pub fn parse_completion(body: &str) -> GenerationResult<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::InvalidResponse(format!("malformed JSON: {}", e)))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::InvalidResponse("response has no choices".to_string()))?;

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(GenerationError::InvalidResponse(
            "response choice has no content".to_string(),
        )),
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url() {
        assert_eq!(
            completions_url("https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://localhost:8080/v1/"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Revenue grew 8%."}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5}
        }"#;
        assert_eq!(parse_completion(body).unwrap(), "Revenue grew 8%.");
    }

    #[test]
    fn test_parse_completion_without_choices() {
        let err = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(m) if m.contains("no choices")));
    }

    #[test]
    fn test_parse_completion_null_content() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        assert!(matches!(
            parse_completion(body),
            Err(GenerationError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_completion_malformed() {
        assert!(matches!(
            parse_completion("<html>Bad Gateway</html>"),
            Err(GenerationError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: 300,
            temperature: 0.5,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert_eq!(json["max_tokens"], 300);
    }
}
