//! LINE Messaging API channel for bilingo.
//!
//! Parses webhook batches into channel events and delivers text through the
//! reply and push endpoints with bearer-token auth.

pub mod config;
pub mod error;
pub mod event;
pub mod outbound;

pub use {
    config::LineAccountConfig,
    error::{Error, Result},
    event::{WebhookPayload, parse_webhook},
    outbound::LineOutbound,
};
