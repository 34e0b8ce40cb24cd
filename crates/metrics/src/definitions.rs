//! Metric name constants, grouped by the subsystem that records them.

/// Inbound message pipeline.
pub mod auto_reply {
    /// Text messages handed to the pipeline
    pub const MESSAGES_RECEIVED_TOTAL: &str = "bilingo_auto_reply_messages_received_total";
    /// Messages dropped as noise or with nothing left to translate
    pub const MESSAGES_DROPPED_TOTAL: &str = "bilingo_auto_reply_messages_dropped_total";
    /// Replies accepted by the platform
    pub const REPLIES_DELIVERED_TOTAL: &str = "bilingo_auto_reply_replies_delivered_total";
    /// Reply or push calls the platform rejected or never answered
    pub const DELIVERY_FAILURES_TOTAL: &str = "bilingo_auto_reply_delivery_failures_total";
    /// Retraction notices pushed to the original sender
    pub const NOTICES_PUSHED_TOTAL: &str = "bilingo_auto_reply_notices_pushed_total";
}

/// Completion provider calls.
pub mod llm {
    /// Duration of one completion call in seconds
    pub const COMPLETION_DURATION_SECONDS: &str = "bilingo_llm_completion_duration_seconds";
    /// Completions that ended in a fallback reply, by failure kind
    pub const COMPLETION_ERRORS_TOTAL: &str = "bilingo_llm_completion_errors_total";
}

/// Common label keys.
pub mod labels {
    pub const PROVIDER: &str = "provider";
    pub const ROUTE: &str = "route";
    pub const ERROR_TYPE: &str = "error_type";
    pub const OPERATION: &str = "operation";
}

/// Histogram buckets.
pub mod buckets {
    /// Completion latency, 100ms to 2 minutes.
    pub const LLM_DURATION: [f64; 11] = [0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0];
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn names_are_prefixed_and_unique() {
        let names = [
            auto_reply::MESSAGES_RECEIVED_TOTAL,
            auto_reply::MESSAGES_DROPPED_TOTAL,
            auto_reply::REPLIES_DELIVERED_TOTAL,
            auto_reply::DELIVERY_FAILURES_TOTAL,
            auto_reply::NOTICES_PUSHED_TOTAL,
            llm::COMPLETION_DURATION_SECONDS,
            llm::COMPLETION_ERRORS_TOTAL,
        ];
        for name in names {
            assert!(name.starts_with("bilingo_"), "{name}");
        }
        let mut sorted = names.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
    }

    #[test]
    fn buckets_are_ascending() {
        assert!(buckets::LLM_DURATION.windows(2).all(|w| w[0] < w[1]));
    }
}
