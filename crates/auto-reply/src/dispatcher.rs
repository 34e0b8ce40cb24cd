use std::sync::Arc;

use {
    bilingo_channels::{ChannelOutbound, EventKind, InboundEvent, InboundMessage},
    bilingo_common::unix_now,
    bilingo_providers::CompletionProvider,
    tracing::{debug, info, warn},
};

#[cfg(feature = "metrics")]
use bilingo_metrics::{auto_reply as auto_reply_metrics, counter, labels};

use crate::{reply::get_reply, tracker::RetractionTracker};

/// Pushed to the sender after they retract a message the bot answered.
pub const RETRACTION_NOTICE: &str =
    "You unsent a message. The translation above no longer applies.\n你收回了一則訊息，上方的翻譯已不再適用。";

/// What happened to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Noise or empty payload; nothing sent.
    Dropped,
    /// Reply sent. Recorded for retraction when the sender is known.
    Replied { fallback: bool },
    /// Reply attempted but delivery failed; not recorded.
    ReplyFailed,
    /// Retraction matched a record and the notice was pushed.
    NoticePushed,
    /// Retraction matched a record but the push failed.
    NoticeFailed,
    /// Retraction for an unknown, consumed, or expired message.
    Untracked,
}

/// Routes each inbound event through the pipeline and the delivery boundary.
pub struct EventDispatcher {
    provider: Arc<dyn CompletionProvider>,
    outbound: Arc<dyn ChannelOutbound>,
    tracker: Arc<RetractionTracker>,
}

impl EventDispatcher {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        outbound: Arc<dyn ChannelOutbound>,
        tracker: Arc<RetractionTracker>,
    ) -> Self {
        Self {
            provider,
            outbound,
            tracker,
        }
    }

    pub fn tracker(&self) -> &RetractionTracker {
        &self.tracker
    }

    /// Process a webhook batch in arrival order, one event at a time.
    pub async fn dispatch_batch(&self, events: Vec<InboundEvent>) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::with_capacity(events.len());
        for event in events {
            outcomes.push(self.dispatch(event).await);
        }
        outcomes
    }

    pub async fn dispatch(&self, event: InboundEvent) -> DispatchOutcome {
        let kind = event.kind();
        let message_id = event.message_id().to_string();
        let outcome = match event {
            InboundEvent::Message(msg) => self.handle_message(msg).await,
            InboundEvent::Retraction { message_id } => self.handle_retraction(&message_id).await,
        };
        debug!(%kind, %message_id, ?outcome, "event dispatched");
        outcome
    }

    async fn handle_message(&self, msg: InboundMessage) -> DispatchOutcome {
        let InboundMessage {
            message_id,
            originator_id,
            text,
            reply_token,
        } = msg;

        let Some(reply) = get_reply(self.provider.as_ref(), &text).await else {
            return DispatchOutcome::Dropped;
        };

        let user_id = originator_id.as_deref().unwrap_or("unknown");
        if let Err(e) = self.outbound.reply(reply_token, &reply.text).await {
            warn!(%message_id, user_id, error = %e, "reply delivery failed");
            #[cfg(feature = "metrics")]
            counter!(auto_reply_metrics::DELIVERY_FAILURES_TOTAL, labels::OPERATION => "reply")
                .increment(1);
            return DispatchOutcome::ReplyFailed;
        }

        #[cfg(feature = "metrics")]
        counter!(
            auto_reply_metrics::REPLIES_DELIVERED_TOTAL,
            labels::ROUTE => reply.route.to_string()
        )
        .increment(1);

        match &originator_id {
            Some(originator) => self.tracker.record(&message_id, originator, unix_now()),
            None => debug!(%message_id, "sender unknown, retraction will not be acknowledged"),
        }
        info!(
            %message_id,
            user_id,
            route = %reply.route,
            fallback = reply.failure.is_some(),
            "reply delivered"
        );
        DispatchOutcome::Replied {
            fallback: reply.failure.is_some(),
        }
    }

    async fn handle_retraction(&self, message_id: &str) -> DispatchOutcome {
        let Some(originator_id) = self.tracker.consume(message_id, unix_now()) else {
            debug!(%message_id, kind = %EventKind::Retraction, "no record for retracted message");
            return DispatchOutcome::Untracked;
        };

        match self.outbound.push(&originator_id, RETRACTION_NOTICE).await {
            Ok(()) => {
                info!(%message_id, user_id = %originator_id, "retraction notice pushed");
                #[cfg(feature = "metrics")]
                counter!(auto_reply_metrics::NOTICES_PUSHED_TOTAL).increment(1);
                DispatchOutcome::NoticePushed
            },
            Err(e) => {
                warn!(%message_id, user_id = %originator_id, error = %e, "retraction notice failed");
                #[cfg(feature = "metrics")]
                counter!(auto_reply_metrics::DELIVERY_FAILURES_TOTAL, labels::OPERATION => "push")
                    .increment(1);
                DispatchOutcome::NoticeFailed
            },
        }
    }
}
