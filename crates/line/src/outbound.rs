use std::borrow::Cow;

use {
    async_trait::async_trait,
    secrecy::ExposeSecret,
    serde::Serialize,
    tracing::{debug, warn},
};

use bilingo_channels::{ChannelOutbound, Error, ReplyToken, Result};

use crate::config::LineAccountConfig;

/// LINE rejects text messages longer than this many characters.
pub const LINE_MAX_TEXT_CHARS: usize = 5000;

const REPLY_PATH: &str = "/v2/bot/message/reply";
const PUSH_PATH: &str = "/v2/bot/message/push";

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: Cow<'a, str>,
}

impl<'a> TextMessage<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            kind: "text",
            text: truncate_for_line(text),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

/// Cut `text` to LINE's per-message limit, marking the cut with an ellipsis.
pub fn truncate_for_line(text: &str) -> Cow<'_, str> {
    if text.chars().count() <= LINE_MAX_TEXT_CHARS {
        return Cow::Borrowed(text);
    }
    let mut cut: String = text.chars().take(LINE_MAX_TEXT_CHARS - 1).collect();
    cut.push('…');
    Cow::Owned(cut)
}

/// Outbound sender for one LINE account.
pub struct LineOutbound {
    http: reqwest::Client,
    config: LineAccountConfig,
}

impl LineOutbound {
    pub fn new(config: LineAccountConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::external("build LINE http client", e))?;
        Ok(Self { http, config })
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<()> {
        let url = format!("{}{path}", self.config.api_base_url.trim_end_matches('/'));
        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.config.channel_access_token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| Error::external(format!("POST {path}"), e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(path, status = status.as_u16(), body = %body, "LINE API rejected message");
            return Err(Error::rejected(status.as_u16(), body));
        }
        debug!(path, "LINE message delivered");
        Ok(())
    }
}

#[async_trait]
impl ChannelOutbound for LineOutbound {
    async fn reply(&self, token: ReplyToken, text: &str) -> Result<()> {
        let body = ReplyRequest {
            reply_token: token.as_str(),
            messages: [TextMessage::new(text)],
        };
        self.post(REPLY_PATH, &body).await
    }

    async fn push(&self, to: &str, text: &str) -> Result<()> {
        if to.is_empty() {
            return Err(Error::invalid_input("push recipient is empty"));
        }
        let body = PushRequest {
            to,
            messages: [TextMessage::new(text)],
        };
        self.post(PUSH_PATH, &body).await
    }
}
