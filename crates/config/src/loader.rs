use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    Error, Result,
    env_subst::substitute_env,
    schema::LintelConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["lintel.toml", "lintel.yaml", "lintel.yml", "lintel.json"];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<LintelConfig> {
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
/// 1. `./lintel.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/lintel/lintel.{toml,yaml,yml,json}` (user-global)
///
/// Returns `LintelConfig::default()` if no config file is found or the file
/// cannot be loaded.
pub fn discover_and_load() -> LintelConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    LintelConfig::default()
}

fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let config_dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| config_dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/lintel/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "lintel").map(|d| d.config_dir().to_path_buf())
}

/// Apply `PORT`, `LINTEL_BIND` and `LINTEL_DB_PATH` from the process
/// environment on top of `config`.
pub fn apply_env_overrides(config: LintelConfig) -> LintelConfig {
    apply_env_overrides_with(config, |name| std::env::var(name).ok())
}

/// Same as [`apply_env_overrides`] with a custom variable lookup.
pub fn apply_env_overrides_with(
    mut config: LintelConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> LintelConfig {
    if let Some(raw) = lookup("PORT") {
        match raw.trim().parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(e) => warn!(value = %raw, error = %e, "ignoring invalid PORT"),
        }
    }
    if let Some(bind) = lookup("LINTEL_BIND").filter(|v| !v.trim().is_empty()) {
        config.server.bind = bind;
    }
    if let Some(path) = lookup("LINTEL_DB_PATH").filter(|v| !v.trim().is_empty()) {
        config.database.path = PathBuf::from(path);
    }
    config
}

fn parse_config(raw: &str, path: &Path) -> Result<LintelConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "json" => serde_json::from_str(raw).map_err(|e| Error::parse(path, e)),
        _ => Err(Error::UnsupportedFormat {
            extension: ext.to_owned(),
        }),
    }
}
