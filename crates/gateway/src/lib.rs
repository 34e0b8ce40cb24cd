//! Gateway: HTTP server in front of the reply pipeline.
//!
//! Lifecycle:
//! 1. Bind the configured address
//! 2. Serve health routes and the platform webhook
//! 3. Hand each webhook batch to the [`EventDispatcher`](bilingo_auto_reply::EventDispatcher)
//!
//! All domain logic lives in other crates; this one only does transport.

#[cfg(feature = "prometheus")]
pub mod metrics_routes;
pub mod server;
pub mod webhook;

pub use server::{AppState, bind_addr, build_app, serve, start_server};
