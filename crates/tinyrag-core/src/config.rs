//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys, e.g. `APP_SEARCH__TOP_K`).
//! Paths expand `~` and `${VAR}` through [`expand_path`].

use anyhow::Context;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::data_processor::DEFAULT_LANGUAGE;
use crate::types::{ChunkingConfig, Weighting};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub data: DataSettings,
    pub chunking: ChunkingConfig,
    pub search: SearchSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    pub docs_dir: String,
    pub max_files: Option<usize>,
    pub language: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { docs_dir: "./data/txt".to_string(), max_files: None, language: DEFAULT_LANGUAGE.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub top_k: usize,
    pub weighting: Weighting,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { top_k: 3, weighting: Weighting::TermFrequency }
    }
}

pub struct Config {
    settings: Settings,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    /// Load configuration files from `dir` for the named environment.
    pub fn load_from(dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let settings: Settings = figment.extract().context("Failed to parse configuration")?;
        Self::validate(&settings)?;
        tracing::debug!(env = env_name, dir = %dir.display(), "configuration loaded");
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn validate(settings: &Settings) -> anyhow::Result<()> {
        settings.chunking.validate()?;
        if settings.search.top_k == 0 {
            anyhow::bail!("search.top_k must be greater than 0");
        }
        if settings.data.max_files == Some(0) {
            anyhow::bail!("data.max_files must be greater than 0 when set");
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
