//! Configuration loading and env overrides.
//!
//! Config files: `lintel.toml`, `lintel.yaml`, `lintel.yml` or `lintel.json`.
//! Searched in `./` then the user config directory (`~/.config/lintel/`).
//!
//! Supports `${ENV_VAR}` substitution in the raw file text.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{
        apply_env_overrides, apply_env_overrides_with, config_dir, discover_and_load,
        load_config,
    },
    schema::{DatabaseConfig, LintelConfig, ServerConfig},
};
