//! Channel boundary.
//!
//! A channel turns platform webhooks into [`InboundEvent`]s and implements
//! [`ChannelOutbound`] for the two delivery paths: a single-use reply bound
//! to one inbound message, and a push addressed to a user.

pub mod error;
pub mod plugin;

pub use {
    error::{Error, Result},
    plugin::{ChannelOutbound, EventKind, InboundEvent, InboundMessage, ReplyToken},
};
