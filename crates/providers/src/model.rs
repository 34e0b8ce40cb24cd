use async_trait::async_trait;

/// Placeholder replaced by the payload text when a prompt is rendered.
pub const PAYLOAD_PLACEHOLDER: &str = "{text}";

/// A single-turn completion request. Carries everything the provider needs;
/// no state survives between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    /// Fixed instruction text containing exactly one [`PAYLOAD_PLACEHOLDER`].
    pub instruction_template: &'static str,
    pub payload_text: String,
}

impl PromptRequest {
    pub fn new(instruction_template: &'static str, payload_text: impl Into<String>) -> Self {
        Self {
            instruction_template,
            payload_text: payload_text.into(),
        }
    }

    /// The instruction string sent upstream.
    pub fn render(&self) -> String {
        self.instruction_template
            .replacen(PAYLOAD_PLACEHOLDER, &self.payload_text, 1)
    }
}

/// Why a completion produced no usable text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionFailure {
    /// The service answered, but not in the expected shape.
    #[error("malformed completion response")]
    MalformedResponse,

    /// The request never got an answer (connect error, timeout, broken body).
    #[error("completion transport error: {detail}")]
    Transport { detail: String },

    /// The service answered with a non-success status.
    #[error("completion service error ({status}): {message}")]
    Upstream { status: u16, message: String },
}

impl CompletionFailure {
    /// Short stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedResponse => "malformed_response",
            Self::Transport { .. } => "transport",
            Self::Upstream { .. } => "upstream",
        }
    }

    /// Fixed, user-presentable text shown in place of a translation.
    pub fn fallback_text(&self) -> &'static str {
        match self {
            Self::MalformedResponse => "Sorry, something went wrong.",
            Self::Transport { .. } => "Sorry, I couldn't reach the translation service.",
            Self::Upstream { .. } => "Sorry, I couldn't process that.",
        }
    }
}

pub type CompletionResult = Result<String, CompletionFailure>;

/// Text-generation backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name used in logs (e.g. "gemini").
    fn name(&self) -> &str;

    /// Submit one prompt and wait for the outcome. Never cancelled, never
    /// retried.
    async fn complete(&self, request: &PromptRequest) -> CompletionResult;
}
