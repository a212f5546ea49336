use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::skills::{SkillMatchMode, SkillMatcher, SkillVocabulary};

/// Default bound on a single NER call.
pub const DEFAULT_NER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration, loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub skills: SkillsConfig,
    pub ner: NerConfig,
}

impl Config {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn load_default() -> ConfigResult<Self> {
        Self::load(&default_config_path())
    }

    /// Applies `VITAE_*` environment overrides.
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("VITAE_NER_PATH") {
            self.ner.backend = NerBackend::Gazetteer;
            self.ner.path = Some(PathBuf::from(path));
        }

        if let Some(endpoint) = lookup("VITAE_NER_ENDPOINT") {
            let url = Url::parse(&endpoint).map_err(|e| ConfigError::InvalidValue {
                key: "VITAE_NER_ENDPOINT".into(),
                message: e.to_string(),
            })?;
            self.ner.backend = NerBackend::Remote;
            self.ner.endpoint = Some(url);
        }

        if let Some(secs) = lookup("VITAE_NER_TIMEOUT_SECS") {
            self.ner.timeout_secs = secs.parse().map_err(|_| ConfigError::InvalidValue {
                key: "VITAE_NER_TIMEOUT_SECS".into(),
                message: format!("expected seconds, got {secs:?}"),
            })?;
        }

        if let Some(mode) = lookup("VITAE_SKILL_MATCH") {
            self.skills.match_mode = mode.parse().map_err(|message| ConfigError::InvalidValue {
                key: "VITAE_SKILL_MATCH".into(),
                message,
            })?;
        }

        Ok(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    /// Replaces the built-in vocabulary when set.
    pub vocabulary: Option<SkillVocabulary>,
    pub match_mode: SkillMatchMode,
}

impl SkillsConfig {
    #[must_use]
    pub fn vocabulary(&self) -> SkillVocabulary {
        self.vocabulary.clone().unwrap_or_default()
    }

    #[must_use]
    pub fn matcher(&self) -> SkillMatcher {
        SkillMatcher::new(Arc::new(self.vocabulary())).with_mode(self.match_mode)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NerBackend {
    #[default]
    Gazetteer,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    pub backend: NerBackend,
    /// Gazetteer file; defaults to `gazetteer.json` in the config directory.
    pub path: Option<PathBuf>,
    /// Endpoint of a remote NER service.
    pub endpoint: Option<Url>,
    pub timeout_secs: u64,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            backend: NerBackend::default(),
            path: None,
            endpoint: None,
            timeout_secs: DEFAULT_NER_TIMEOUT_SECS,
        }
    }
}

impl NerConfig {
    #[must_use]
    pub fn gazetteer_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| default_config_dir().join("gazetteer.json"))
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vitae")
}

#[must_use]
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}
