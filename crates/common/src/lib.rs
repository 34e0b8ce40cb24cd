//! Shared helpers used across bilingo crates.

pub mod error;
pub mod route;
pub mod time;

pub use {error::FromMessage, route::normalize_route_path, time::unix_now};
