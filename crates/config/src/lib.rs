//! Configuration loading for synapse.
//!
//! Settings are layered, later layers winning:
//! 1. built-in defaults (file names in the current directory),
//! 2. `config.toml` in the platform configuration directory,
//! 3. a config file named on the command line (TOML, YAML or JSON),
//! 4. `SYNAPSE_`-prefixed environment variables, with `__` separating nested
//!    keys (`SYNAPSE_CACHE__READ_ONLY=true`).
//!
//! When a config file is named explicitly, relative paths in the final
//! settings resolve against that file's directory.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use synapse_engine::DocumentPaths;
use tracing::instrument;

const ENV_PREFIX: &str = "SYNAPSE_";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub documents: DocumentsConfig,
    pub cache: CacheConfig,
}

/// Where the engine's three JSON documents live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    pub items: PathBuf,
    pub vocabulary: PathBuf,
    pub parser: PathBuf,
}
impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            items: PathBuf::from("semantic_label_map.json"),
            vocabulary: PathBuf::from("dynamic_vocabulary.json"),
            parser: PathBuf::from("vocabulary_parser.json"),
        }
    }
}
impl DocumentsConfig {
    pub fn paths(&self) -> DocumentPaths {
        DocumentPaths::new(&self.items, &self.vocabulary, &self.parser)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub path: PathBuf,
    /// Load the cache but never write it back.
    pub read_only: bool,
}
impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("combo_usage_cache.json"),
            read_only: false,
        }
    }
}

impl Config {
    /// Load settings from every layer, including the user's platform config
    /// file if there is one.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_from(user_config_path().as_deref(), explicit)
    }

    /// Load settings with the user-level config file given explicitly
    /// (`None` skips that layer).
    #[instrument(skip_all)]
    pub fn load_from(user: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(user) = user
            && user.is_file()
        {
            tracing::debug!(path = %user.display(), "Reading user config");
            figment = figment.merge(Toml::file(user));
        }
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "Reading config");
            figment = merge_file(figment, path)?;
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR));

        let mut config: Self = figment.extract().or_raise(|| ErrorKind::Invalid)?;
        if let Some(base) = explicit.and_then(Path::parent) {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [
            &mut self.documents.items,
            &mut self.documents.vocabulary,
            &mut self.documents.parser,
            &mut self.cache.path,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    if !path.is_file() {
        exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
    }
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    Ok(match extension.as_deref() {
        Some("toml") => figment.merge(Toml::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
    })
}

fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "synapse").map(|dirs| dirs.config_dir().join("config.toml"))
}
