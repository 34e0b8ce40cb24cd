//! Metric names and recorder setup for bilingo.
//!
//! Instrumented crates record through the `metrics` facade re-exported here.
//! Nothing is collected until [`init_metrics`] installs a recorder, which
//! only exports anything with the `prometheus` feature.

mod definitions;
mod recorder;

pub use {
    definitions::*,
    recorder::{MetricsHandle, init_metrics},
};

pub use metrics::{counter, histogram};
