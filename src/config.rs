use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine configuration directory")]
    NoProjectDirs,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::NoProjectDirs => "Could not determine home directory".to_string(),
            ConfigError::Io(e) => format!("File system error: {}", e),
            ConfigError::Parse { path, source } => {
                format!("Configuration file {} is invalid: {}", path.display(), source)
            }
        }
    }
}

/// Persistent settings, read from `config.json` in the platform config dir.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub site_url: String,
    pub popular_limit: usize,
    pub category_limit: usize,
    pub category_page_limit: usize,
    pub search_limit: usize,
    pub request_timeout_secs: u64,
    /// Open franchises inside the explorer instead of on the website.
    pub inline_detail: bool,
    pub analytics: bool,
    /// Browser launcher overriding the platform default.
    pub open_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            site_url: "http://localhost:5173/".to_string(),
            popular_limit: 8,
            category_limit: 10,
            category_page_limit: 50,
            search_limit: 20,
            request_timeout_secs: 10,
            inline_detail: true,
            analytics: false,
            open_command: None,
        }
    }
}

/// Command-line values that win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub site_url: Option<String>,
    pub no_inline_detail: bool,
    pub analytics: bool,
}

impl Config {
    pub fn project_dirs() -> Result<directories::ProjectDirs, ConfigError> {
        directories::ProjectDirs::from("com", "franchiseorder", "franchise-explorer")
            .ok_or(ConfigError::NoProjectDirs)
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::project_dirs()?.config_dir().join("config.json"))
    }

    /// Missing file means defaults; a broken file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if let Some(site_url) = overrides.site_url {
            self.site_url = site_url;
        }
        if overrides.no_inline_detail {
            self.inline_detail = false;
        }
        if overrides.analytics {
            self.analytics = true;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.popular_limit, 8);
        assert_eq!(config.category_limit, 10);
        assert!(config.inline_detail);
        assert!(!config.analytics);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "api_url": "https://api.example.com", "category_limit": 4 }"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.category_limit, 4);
        assert_eq!(config.popular_limit, 8);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.user_message().contains("invalid"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = Config::default();
        config.open_command = Some("firefox".to_string());
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::default();
        config.apply(Overrides {
            api_url: Some("http://10.0.0.2:5000".to_string()),
            site_url: None,
            no_inline_detail: true,
            analytics: true,
        });
        assert_eq!(config.api_url, "http://10.0.0.2:5000");
        assert_eq!(config.site_url, Config::default().site_url);
        assert!(!config.inline_detail);
        assert!(config.analytics);
    }
}
