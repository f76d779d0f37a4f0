//! Application configuration loaded from a TOML file.
//!
//! Every section is optional; a missing file yields the defaults, which
//! keep submissions in `submissions.json` next to the working directory.

use super::persistence::{InMemoryStore, JsonFileStore};
use super::rest::RestStore;
use crate::domain::{StoreError, SubmissionStore};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("rest backend needs a `url` in [store]")]
    MissingUrl,
    #[error("rest backend needs an API key in ${0}")]
    MissingApiKey(String),
    #[error("rest backend needs a user access token in ${0}")]
    MissingAccessToken(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: PathBuf,
    pub url: Option<String>,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Name of the environment variable holding the signed-in user's access
    /// token. Without it requests run under the anonymous key.
    pub access_token_env: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            path: PathBuf::from("submissions.json"),
            url: None,
            api_key_env: "REINSTATE_API_KEY".to_string(),
            access_token_env: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { file: None, level: "info".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("submissions.csv") }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub log: LogConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Builds the configured store backend.
    pub fn open_store(&self) -> Result<Box<dyn SubmissionStore>, ConfigError> {
        match self.store.backend {
            StoreBackend::File => Ok(Box::new(JsonFileStore::open(&self.store.path)?)),
            StoreBackend::Memory => Ok(Box::new(InMemoryStore::default())),
            StoreBackend::Rest => Ok(Box::new(self.rest_store(|name| std::env::var(name).ok())?)),
        }
    }

    /// Builds the REST backend, reading secrets through `env`.
    fn rest_store(&self, env: impl Fn(&str) -> Option<String>) -> Result<RestStore, ConfigError> {
        let url = self.store.url.as_deref().ok_or(ConfigError::MissingUrl)?;
        let api_key = env(&self.store.api_key_env)
            .ok_or_else(|| ConfigError::MissingApiKey(self.store.api_key_env.clone()))?;
        let store = RestStore::new(url, api_key)?;
        match &self.store.access_token_env {
            Some(name) => {
                let token = env(name).ok_or_else(|| ConfigError::MissingAccessToken(name.clone()))?;
                Ok(store.with_access_token(token))
            }
            None => Ok(store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.path, PathBuf::from("submissions.json"));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_config() {
        let config = AppConfig::from_toml_str(
            r#"
            [store]
            backend = "rest"
            url = "https://db.example.com"

            [log]
            file = "reinstate.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Rest);
        assert_eq!(config.store.url.as_deref(), Some("https://db.example.com"));
        assert_eq!(config.store.api_key_env, "REINSTATE_API_KEY");
        assert_eq!(config.log.file, Some(PathBuf::from("reinstate.log")));
        assert_eq!(config.log.level, "info");
        assert_eq!(config.export.path, PathBuf::from("submissions.csv"));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result = AppConfig::from_toml_str("[store]\nbackend = \"sqlite\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rest_backend_requires_url() {
        let mut config = AppConfig::default();
        config.store.backend = StoreBackend::Rest;
        assert!(matches!(config.open_store(), Err(ConfigError::MissingUrl)));
    }

    #[test]
    fn test_rest_backend_requires_api_key() {
        let mut config = AppConfig::default();
        config.store.backend = StoreBackend::Rest;
        config.store.url = Some("https://db.example.com".to_string());
        config.store.api_key_env = "REINSTATE_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        assert!(matches!(config.open_store(), Err(ConfigError::MissingApiKey(_))));
    }

    fn rest_config(access_token_env: Option<&str>) -> AppConfig {
        AppConfig::from_toml_str(&format!(
            "[store]\nbackend = \"rest\"\nurl = \"https://db.example.com\"\n{}",
            access_token_env
                .map(|name| format!("access_token_env = \"{name}\"\n"))
                .unwrap_or_default()
        ))
        .unwrap()
    }

    fn fake_env(name: &str) -> Option<String> {
        match name {
            "REINSTATE_API_KEY" => Some("anon-key".to_string()),
            "REINSTATE_ACCESS_TOKEN" => Some("user-jwt".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_rest_backend_sends_user_access_token() {
        let config = rest_config(Some("REINSTATE_ACCESS_TOKEN"));
        assert_eq!(config.store.access_token_env.as_deref(), Some("REINSTATE_ACCESS_TOKEN"));

        let store = config.rest_store(fake_env).unwrap();
        let request = store.select_request(Some("u1")).build().unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer user-jwt");
        assert_eq!(request.headers()["apikey"], "anon-key");
    }

    #[test]
    fn test_rest_backend_without_token_uses_api_key() {
        let store = rest_config(None).rest_store(fake_env).unwrap();
        let request = store.select_request(None).build().unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    fn test_rest_backend_missing_access_token() {
        let config = rest_config(Some("REINSTATE_UNSET_TOKEN"));
        assert!(matches!(
            config.rest_store(fake_env),
            Err(ConfigError::MissingAccessToken(name)) if name == "REINSTATE_UNSET_TOKEN"
        ));
    }

    #[test]
    fn test_file_backend_opens_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.store.path = dir.path().join("leads.json");

        let store = config.open_store().unwrap();
        assert!(store.select_all().unwrap().is_empty());
    }
}
