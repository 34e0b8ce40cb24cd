use {
    bilingo_channels::{InboundEvent, InboundMessage, ReplyToken},
    serde::Deserialize,
    tracing::{debug, warn},
};

use crate::error::{Context, Result};

/// Body of one webhook POST from the LINE platform.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// Bot user ID the events were sent to.
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub reply_token: Option<String>,
    pub source: Option<EventSource>,
    pub message: Option<EventMessage>,
    pub unsend: Option<UnsendDetail>,
    pub timestamp: Option<i64>,
    pub webhook_event_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: Option<String>,
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub id: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsendDetail {
    pub message_id: String,
}

impl WebhookEvent {
    pub fn user_id(&self) -> Option<&str> {
        self.source.as_ref()?.user_id.as_deref()
    }

    /// Convert into a channel event.
    ///
    /// `Ok(None)` means the event is of a kind bilingo does not handle
    /// (stickers, follows, joins, ...). `Err` means a handled kind arrived
    /// without a field it needs.
    pub fn into_inbound(self) -> Result<Option<InboundEvent>> {
        match self.event_type.as_str() {
            "message" => {
                let user_id = self.user_id().map(str::to_string);
                let message = self.message.context("message event without message body")?;
                if message.message_type != "text" {
                    debug!(
                        message_id = %message.id,
                        message_type = %message.message_type,
                        "ignoring non-text message"
                    );
                    return Ok(None);
                }
                let Some(text) = message.text else {
                    debug!(message_id = %message.id, "ignoring text message without text");
                    return Ok(None);
                };
                let reply_token = self
                    .reply_token
                    .with_context(|| format!("message {} has no replyToken", message.id))?;
                if user_id.is_none() {
                    debug!(message_id = %message.id, "text message without source.userId");
                }

                Ok(Some(InboundEvent::Message(InboundMessage {
                    message_id: message.id,
                    originator_id: user_id,
                    text,
                    reply_token: ReplyToken::new(reply_token),
                })))
            },
            "unsend" => {
                let message_id = self
                    .unsend
                    .map(|u| u.message_id)
                    .or_else(|| self.message.map(|m| m.id))
                    .context("unsend event without messageId")?;
                Ok(Some(InboundEvent::Retraction { message_id }))
            },
            other => {
                debug!(event_type = other, "ignoring unsupported webhook event");
                Ok(None)
            },
        }
    }
}

/// Parse a raw webhook body into channel events, preserving platform order.
///
/// Individual malformed events are logged and skipped so they never hide the
/// rest of the batch. Only a body that is not a webhook payload at all fails.
pub fn parse_webhook(body: &[u8]) -> Result<Vec<InboundEvent>> {
    let payload: WebhookPayload = serde_json::from_slice(body)?;
    debug!(
        destination = payload.destination.as_deref().unwrap_or("unknown"),
        events = payload.events.len(),
        "line webhook received"
    );

    let events = payload
        .events
        .into_iter()
        .filter_map(|event| {
            let event_id = event.webhook_event_id.clone();
            match event.into_inbound() {
                Ok(inbound) => inbound,
                Err(e) => {
                    warn!(
                        webhook_event_id = event_id.as_deref().unwrap_or("unknown"),
                        error = %e,
                        "skipping malformed line event"
                    );
                    None
                },
            }
        })
        .collect();
    Ok(events)
}
