use {
    axum::{body::Bytes, extract::State},
    tracing::{debug, warn},
};

use crate::server::AppState;

/// Platform callback. Always answers `200 OK`: per-event failures are
/// internal and never surfaced to the platform.
pub async fn webhook_handler(State(state): State<AppState>, body: Bytes) -> &'static str {
    let events = match bilingo_line::parse_webhook(&body) {
        Ok(events) => events,
        Err(e) => {
            warn!(error = %e, bytes = body.len(), "unparsable webhook body");
            return "OK";
        },
    };

    let count = events.len();
    let outcomes = state.dispatcher.dispatch_batch(events).await;
    debug!(events = count, ?outcomes, "webhook batch processed");
    "OK"
}
