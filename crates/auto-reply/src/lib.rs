//! Inbound message processing pipeline, the glue between the channel and the
//! completion provider.
//!
//! Flow for a new message: noise filter → clean → route (command or inferred
//! language) → build prompt → complete → render reply → deliver via reply
//! token → remember the delivery. A retraction consumes that memory and
//! pushes a notice to the original sender.

pub mod dispatcher;
pub mod filter;
pub mod language;
pub mod prompt;
pub mod reply;
pub mod tracker;

pub use {
    dispatcher::{DispatchOutcome, EventDispatcher, RETRACTION_NOTICE},
    filter::is_noise,
    language::{Language, classify, clean},
    prompt::{BuiltPrompt, Command, ResponseShape, Route, build_prompt, route},
    reply::{GeneratedReply, get_reply},
    tracker::RetractionTracker,
};
