//! Configuration loading and startup secrets.
//!
//! Config files: `bilingo.toml`, `bilingo.yaml`, `bilingo.yml`, or `bilingo.json`,
//! searched in `./` then `~/.config/bilingo/`. Every field has a default, so
//! the file is optional.
//!
//! Supports `${ENV_VAR}` substitution in the raw file before parsing.
//! Credentials never come from the file: see [`secrets::Secrets`].

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod secrets;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{config_dir, discover_and_load, find_config_file, load_config},
    schema::{
        BilingoConfig, GeminiConfig, LineConfig, MetricsConfig, ServerConfig, TrackerConfig,
    },
    secrets::Secrets,
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
