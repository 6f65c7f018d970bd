//! `cardforge-config` — CardForge runtime configuration.
//!
//! Provides:
//! - Typed config schema (server, storage, OpenAI providers, logging)
//! - YAML read with `${ENV_VAR}` substitution
//! - Environment variable overrides and default values

pub mod env;
pub mod io;
pub mod schema;

pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use schema::CardForgeConfig;

use anyhow::{Context, Result};
use std::path::Path;

/// Load a config file, substitute `${VAR}` references, and apply
/// environment overrides.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<CardForgeConfig> {
    let mut value = load_config(path).await?;
    if value.is_null() {
        // Empty file parses as null; treat it the same as a missing file.
        value = serde_json::Value::Object(serde_json::Map::new());
    }

    // Substitute ${VAR} env vars before typing.
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let mut config: CardForgeConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;

    config.apply_env_overrides();
    Ok(config)
}
