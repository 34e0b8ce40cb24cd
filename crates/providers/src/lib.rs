//! Text-generation providers.
//!
//! A provider takes one self-contained [`PromptRequest`] and returns a
//! [`CompletionResult`]. Every failure is a value; nothing propagates past
//! this boundary.

pub mod gemini;
pub mod model;

pub use {
    gemini::GeminiProvider,
    model::{CompletionFailure, CompletionProvider, CompletionResult, PromptRequest},
};
