use {
    bilingo_providers::{CompletionFailure, CompletionProvider},
    tracing::{debug, info, warn},
};

#[cfg(feature = "metrics")]
use bilingo_metrics::{
    auto_reply as auto_reply_metrics, counter, histogram, labels, llm as llm_metrics,
};

use crate::{
    filter::is_noise,
    prompt::{Route, build_prompt, render_reply, route},
};

/// Text to deliver for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReply {
    pub text: String,
    pub route: Route,
    /// Set when `text` is a fallback string rather than a translation.
    pub failure: Option<CompletionFailure>,
}

/// Process one inbound message text and produce the reply to send.
///
/// Returns `None` when the message is dropped: noise, or nothing left to
/// translate once the command token and mentions are stripped. A failed
/// completion still yields a reply carrying the fixed fallback text.
pub async fn get_reply(provider: &dyn CompletionProvider, raw: &str) -> Option<GeneratedReply> {
    #[cfg(feature = "metrics")]
    counter!(auto_reply_metrics::MESSAGES_RECEIVED_TOTAL).increment(1);

    if is_noise(raw) {
        debug!("dropping noise message");
        #[cfg(feature = "metrics")]
        counter!(auto_reply_metrics::MESSAGES_DROPPED_TOTAL).increment(1);
        return None;
    }

    let (route, payload) = route(raw);
    if payload.is_empty() {
        debug!(%route, "dropping message with empty payload");
        #[cfg(feature = "metrics")]
        counter!(auto_reply_metrics::MESSAGES_DROPPED_TOTAL).increment(1);
        return None;
    }

    info!(
        %route,
        provider = provider.name(),
        payload_chars = payload.chars().count(),
        "generating reply"
    );

    let prompt = build_prompt(route, payload);

    #[cfg(feature = "metrics")]
    let start = std::time::Instant::now();

    let outcome = provider.complete(&prompt.request).await;

    #[cfg(feature = "metrics")]
    histogram!(
        llm_metrics::COMPLETION_DURATION_SECONDS,
        labels::PROVIDER => provider.name().to_string(),
        labels::ROUTE => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());

    Some(match render_reply(prompt.shape, outcome) {
        Ok(text) => GeneratedReply {
            text,
            route,
            failure: None,
        },
        Err(failure) => {
            warn!(%route, error = %failure, "completion failed, using fallback");
            #[cfg(feature = "metrics")]
            counter!(
                llm_metrics::COMPLETION_ERRORS_TOTAL,
                labels::PROVIDER => provider.name().to_string(),
                labels::ERROR_TYPE => failure.kind()
            )
            .increment(1);
            GeneratedReply {
                text: failure.fallback_text().to_string(),
                route,
                failure: Some(failure),
            }
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        crate::{Command, Language},
        async_trait::async_trait,
        bilingo_providers::{CompletionResult, PromptRequest},
        std::sync::Mutex,
    };

    struct Scripted {
        result: CompletionResult,
        seen: Mutex<Vec<PromptRequest>>,
    }

    impl Scripted {
        fn new(result: CompletionResult) -> Self {
            Self {
                result,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: &PromptRequest) -> CompletionResult {
            self.seen.lock().unwrap().push(request.clone());
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn noise_is_dropped_without_calling_provider() {
        let provider = Scripted::new(Ok("unused".into()));
        assert_eq!(get_reply(&provider, " 😀 🎉 ").await, None);
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn bare_command_is_dropped() {
        let provider = Scripted::new(Ok("unused".into()));
        assert_eq!(get_reply(&provider, "/ttw   ").await, None);
        assert_eq!(get_reply(&provider, "@bob").await, None);
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rephrase_reply_is_split_into_sections() {
        let provider = Scripted::new(Ok("English: I am going home.\nChinese: 我要回家了。".into()));
        let reply = get_reply(&provider, "i going home").await.unwrap();

        assert_eq!(reply.text, "I am going home.\n\n我要回家了。");
        assert_eq!(reply.route, Route::Inferred(Language::English));
        assert_eq!(reply.failure, None);
        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].payload_text, "i going home");
    }

    #[tokio::test]
    async fn translate_command_uses_plain_text() {
        let provider = Scripted::new(Ok("  Good morning\n".into()));
        let reply = get_reply(&provider, "/ten 早安").await.unwrap();

        assert_eq!(reply.text, "Good morning");
        assert_eq!(reply.route, Route::Command(Command::TranslateToEnglish));
    }

    #[tokio::test]
    async fn failure_yields_fallback_text() {
        let failure = CompletionFailure::Upstream {
            status: 429,
            message: "quota".into(),
        };
        let provider = Scripted::new(Err(failure.clone()));
        let reply = get_reply(&provider, "你好").await.unwrap();

        assert_eq!(reply.text, failure.fallback_text());
        assert_eq!(reply.failure, Some(failure));
    }

    #[tokio::test]
    async fn missing_sections_yield_malformed_fallback() {
        let provider = Scripted::new(Ok("just some text".into()));
        let reply = get_reply(&provider, "/ttw hello").await.unwrap();

        assert_eq!(
            reply.text,
            CompletionFailure::MalformedResponse.fallback_text()
        );
        assert_eq!(reply.failure, Some(CompletionFailure::MalformedResponse));
    }
}
