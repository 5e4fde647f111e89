use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::inference::{ChatBackend, ProviderError};

/// Hugging Face's OpenAI-compatible router.
pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/v1";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [RequestMessage<'a>; 1],
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
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

/// Chat-completions backend for any OpenAI-compatible endpoint.
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for HttpChatBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatBackend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// HTTPS everywhere, plain HTTP only for a local server.
fn validate_base_url(base_url: &str) -> Result<(), String> {
    let parsed = reqwest::Url::parse(base_url)
        .map_err(|e| format!("Invalid base URL '{}': {}", base_url, e))?;

    let host = parsed.host_str().unwrap_or("");
    match parsed.scheme() {
        "https" => Ok(()),
        "http" if matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "::1") => {
            log::info!("Using unencrypted HTTP for local inference server at '{}'", base_url);
            Ok(())
        }
        "http" => Err(format!(
            "HTTP is only allowed for localhost (base URL: '{}'); use HTTPS",
            base_url
        )),
        scheme => Err(format!(
            "Unsupported URL scheme '{}' in base URL '{}'",
            scheme, base_url
        )),
    }
}

impl HttpChatBackend {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, String> {
        validate_base_url(base_url)?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn request_body<'a>(model: &'a str, prompt: &'a str, max_tokens: u32) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: [RequestMessage {
            role: "user",
            content: prompt,
        }],
        max_tokens,
        stream: false,
    }
}

fn parse_completion(body: &str) -> Result<String, ProviderError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::malformed(format!("Invalid completion JSON: {e}")))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::malformed("No choices in response"))?
        .message
        .content
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(ProviderError::malformed("Empty completion content"));
    }
    Ok(content)
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn chat_completion(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let url = self.endpoint();
        log::debug!("POST {} model={} prompt_len={}", url, model, prompt.len());

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request_body(model, prompt, max_tokens))
            .send()
            .await
            .map_err(|e| ProviderError::network(&e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| ProviderError::network(&e))?;

        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), &text));
        }

        parse_completion(&text)
    }
}
