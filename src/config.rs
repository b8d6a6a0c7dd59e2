use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{PuterError, PuterResult};

pub const DEFAULT_API_BASE: &str = "https://api.puter.com";
pub const DEFAULT_ORIGIN: &str = "https://puter.com";

/// Prefix for environment overrides, e.g. `PUTER_AUTH_TOKEN`
const ENV_PREFIX: &str = "PUTER";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base: String,
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Remote working directory used to resolve relative deploy paths.
    /// Defaults to the user's home directory (`/{username}`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_cwd: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            auth_token: None,
            remote_cwd: None,
        }
    }
}

/// Get the config directory
pub fn get_config_dir() -> PuterResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| {
            PuterError::Config(::config::ConfigError::Message(
                "Could not determine config directory".to_string(),
            ))
        })?
        .join("puter");

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

impl ClientConfig {
    /// Load the configuration from the default location
    pub fn load() -> PuterResult<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load the configuration layered as defaults, then the TOML file at
    /// `path`, then `PUTER_*` environment variables. A missing file is
    /// created with the defaults.
    pub fn load_from(path: &Path) -> PuterResult<Self> {
        if !path.exists() {
            Self::default().save_to(path)?;
        }

        let settings = ::config::Config::builder()
            .set_default("api_base", DEFAULT_API_BASE)?
            .set_default("origin", DEFAULT_ORIGIN)?
            .add_source(::config::File::from(path).required(false))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        Ok(config.normalized())
    }

    pub fn save_to(&self, path: &Path) -> PuterResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| PuterError::ConfigSaveFailed(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    fn get_config_path() -> PuterResult<PathBuf> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    fn normalized(mut self) -> Self {
        self.api_base = self.api_base.trim_end_matches('/').to_string();
        self.auth_token = self.auth_token.filter(|t| !t.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = ClientConfig::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.origin, DEFAULT_ORIGIN);
    }

    #[test]
    fn test_file_values_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_base = \"http://localhost:4100/\"\norigin = \"http://puter.localhost\"\nauth_token = \"abc\"\nremote_cwd = \"/alice/Desktop\"\n",
        )
        .unwrap();

        let config = ClientConfig::load_from(&path).unwrap();

        assert_eq!(config.api_base, "http://localhost:4100");
        assert_eq!(config.auth_token.as_deref(), Some("abc"));
        assert_eq!(config.remote_cwd.as_deref(), Some("/alice/Desktop"));
    }

    #[test]
    fn test_saved_file_round_trips_without_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        ClientConfig::default().save_to(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();

        assert!(!contents.contains("auth_token"));
        assert!(!contents.contains("remote_cwd"));
        assert!(ClientConfig::load_from(&path).unwrap().remote_cwd.is_none());
    }
}
