use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    env_subst::substitute_env,
    error::{Error, Result},
    schema::BilingoConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "bilingo.toml",
    "bilingo.yaml",
    "bilingo.yml",
    "bilingo.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<BilingoConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./bilingo.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/bilingo/bilingo.{toml,yaml,yml,json}` (user-global)
///
/// Returns `BilingoConfig::default()` if no config file is found. A file that
/// exists but does not parse is an error, not a silent fallback.
pub fn discover_and_load() -> Result<BilingoConfig> {
    match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path)
        },
        None => {
            debug!("no config file found, using defaults");
            Ok(BilingoConfig::default())
        },
    }
}

/// First existing config file in the search order of [`discover_and_load`].
pub fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists());
    if local.is_some() {
        return local;
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/bilingo/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "bilingo").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> Result<BilingoConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(Error::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}
