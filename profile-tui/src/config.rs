use std::{env, fs, path::Path, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "group-profile";
const STORE_FILE: &str = "profile-store.json";
const LOG_FILE: &str = "group-profile.log";

/// Configuration for the application.
///
/// Persisted as TOML. Every field is optional; unset paths fall back to
/// files inside the configuration directory.
///
/// Storage location:
/// - Linux: $XDG_CONFIG_HOME/group-profile/config.toml or
///   $HOME/.config/group-profile/config.toml
/// - macOS: $HOME/Library/Application Support/group-profile/config.toml
/// - Windows: %APPDATA%\group-profile\config.toml
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub store_file: Option<PathBuf>,
    pub favorites_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Returns the configuration directory path under the user's
    /// platform-appropriate config directory.
    pub fn config_dir() -> Result<PathBuf> {
        platform_config_home()
            .map(|home| home.join(APP_DIR))
            .ok_or_else(|| {
                anyhow!("Unable to determine config directory from the environment")
            })
    }

    /// Returns the default config file path.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads the configuration from `path`. A missing file yields the
    /// default configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).with_context(|| {
            format!("Failed to read config file: {}", path.display())
        })?;

        toml::from_str(&content).with_context(|| {
            format!("Failed to parse config file: {}", path.display())
        })
    }

    /// Saves the configuration to `path`, creating the directory if
    /// needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize config")?;

        fs::write(path, content).with_context(|| {
            format!("Failed to write config file: {}", path.display())
        })
    }

    /// Overlay values given on the command line.
    pub fn merge(self, overrides: AppConfig) -> Self {
        Self {
            store_file: overrides.store_file.or(self.store_file),
            favorites_file: overrides.favorites_file.or(self.favorites_file),
            log_file: overrides.log_file.or(self.log_file),
        }
    }

    pub fn store_file_or_default(&self) -> Result<PathBuf> {
        match &self.store_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(STORE_FILE)),
        }
    }

    pub fn log_file_or_default(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(LOG_FILE)),
        }
    }
}

fn platform_config_home() -> Option<PathBuf> {
    let var = |name: &str| env::var_os(name).map(PathBuf::from);

    if cfg!(target_os = "windows") {
        var("APPDATA")
            .or_else(|| var("USERPROFILE").map(|home| home.join(".config")))
    } else if cfg!(target_os = "macos") {
        var("HOME").map(|home| home.join("Library").join("Application Support"))
    } else {
        var("XDG_CONFIG_HOME")
            .or_else(|| var("HOME").map(|home| home.join(".config")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let temp_dir = TempDir::new("config").unwrap();
        let config =
            AppConfig::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new("config").unwrap();
        let path = temp_dir.path().join("nested/config.toml");
        let config = AppConfig {
            store_file: Some(PathBuf::from("/tmp/store.json")),
            favorites_file: None,
            log_file: Some(PathBuf::from("/tmp/profile.log")),
        };

        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_defaults_live_in_app_dir() {
        let Ok(dir) = AppConfig::config_dir() else {
            return;
        };
        assert!(dir.ends_with(APP_DIR));
        assert_eq!(
            AppConfig::default().store_file_or_default().unwrap(),
            dir.join(STORE_FILE)
        );
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp_dir = TempDir::new("config").unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "store_file = [").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_command_line_wins() {
        let file = AppConfig {
            store_file: Some(PathBuf::from("a.json")),
            favorites_file: Some(PathBuf::from("fav.json")),
            log_file: None,
        };
        let cli = AppConfig {
            store_file: Some(PathBuf::from("b.json")),
            ..AppConfig::default()
        };

        let merged = file.merge(cli);
        assert_eq!(merged.store_file, Some(PathBuf::from("b.json")));
        assert_eq!(merged.favorites_file, Some(PathBuf::from("fav.json")));
        assert_eq!(merged.log_file, None);
    }
}
