use async_trait::async_trait;

use crate::error::Result;

// ── Inbound events ──────────────────────────────────────────────────────────

/// Token authorizing exactly one reply to one inbound message.
///
/// Deliberately not `Clone`: [`ChannelOutbound::reply`] takes it by value, so
/// a token cannot be spent twice.
#[derive(PartialEq, Eq)]
pub struct ReplyToken(String);

impl ReplyToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ReplyToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ReplyToken([REDACTED])")
    }
}

/// A text message sent by a user.
#[derive(Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub message_id: String,
    /// Sender user ID. The platform omits it for some group and room senders.
    pub originator_id: Option<String>,
    pub text: String,
    pub reply_token: ReplyToken,
}

/// One inbound occurrence reported by a platform webhook.
#[derive(Debug, PartialEq, Eq)]
pub enum InboundEvent {
    /// A new text message.
    Message(InboundMessage),
    /// The sender withdrew a previously seen message. Carries no reply token:
    /// any follow-up must go through [`ChannelOutbound::push`].
    Retraction { message_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NewMessage,
    Retraction,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NewMessage => "new_message",
            Self::Retraction => "retraction",
        })
    }
}

impl InboundEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Message(_) => EventKind::NewMessage,
            Self::Retraction { .. } => EventKind::Retraction,
        }
    }

    pub fn message_id(&self) -> &str {
        match self {
            Self::Message(msg) => &msg.message_id,
            Self::Retraction { message_id } => message_id,
        }
    }
}

// ── Outbound delivery ───────────────────────────────────────────────────────

/// Send messages to a channel.
///
/// Implementations make a single best-effort attempt and never retry.
#[async_trait]
pub trait ChannelOutbound: Send + Sync {
    /// Answer one inbound message, spending its reply token.
    async fn reply(&self, token: ReplyToken, text: &str) -> Result<()>;

    /// Send a message to a user without a prior event to reply to.
    async fn push(&self, to: &str, text: &str) -> Result<()>;
}
