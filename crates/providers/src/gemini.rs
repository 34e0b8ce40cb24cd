use std::time::Duration;

use {
    anyhow::Context,
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde::Serialize,
    tracing::{debug, trace, warn},
};

use crate::model::{CompletionFailure, CompletionProvider, CompletionResult, PromptRequest};

const UNKNOWN_ERROR: &str = "unknown error";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

pub struct GeminiProvider {
    api_key: Secret<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(
        api_key: Secret<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build gemini http client")?;
        Ok(Self {
            api_key,
            model: model.into(),
            base_url: base_url.into(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a success envelope.
fn extract_candidate_text(resp: &serde_json::Value) -> Option<String> {
    resp.pointer("/candidates/0/content/parts/0/text")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

/// Pull `error.message` out of an error envelope, if the body has one.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &PromptRequest) -> CompletionResult {
        let instruction = request.render();
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part {
                    text: &instruction,
                }],
            }],
        };

        debug!(
            model = %self.model,
            prompt_chars = instruction.chars().count(),
            "gemini complete request"
        );

        let http_resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "gemini request failed");
                CompletionFailure::Transport {
                    detail: e.to_string(),
                }
            })?;

        let status = http_resp.status();
        let body_text = http_resp
            .text()
            .await
            .map_err(|e| CompletionFailure::Transport {
                detail: format!("read response body: {e}"),
            })?;

        if !status.is_success() {
            let message = extract_error_message(&body_text);
            warn!(status = %status, message = %message, "gemini API error");
            return Err(CompletionFailure::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let resp: serde_json::Value = serde_json::from_str(&body_text).map_err(|e| {
            warn!(error = %e, "gemini response is not JSON");
            CompletionFailure::MalformedResponse
        })?;
        trace!(response = %resp, "gemini raw response");

        extract_candidate_text(&resp).ok_or_else(|| {
            warn!("gemini response has no candidate text");
            CompletionFailure::MalformedResponse
        })
    }
}
