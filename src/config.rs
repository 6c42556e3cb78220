// config.rs - Optional TOML application config
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::ui::theme::ThemeName;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme: Option<String>,
    pub data_dir: Option<PathBuf>,
    /// Ask before clearing the session
    pub confirm_clear: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: None,
            data_dir: None,
            confirm_clear: true,
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig =
            toml::from_str(&content).map_err(|e| format!("Invalid config format: {}", e))?;

        Ok(config)
    }

    /// Configured theme, if it names a known one
    pub fn theme_name(&self) -> Option<ThemeName> {
        let name = self.theme.as_deref()?;
        match name.parse() {
            Ok(theme) => Some(theme),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = \"mauve\"\nconfirm_clear = false\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.theme_name(), Some(ThemeName::Mauve));
        assert!(!config.confirm_clear);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.confirm_clear);
        assert_eq!(config.theme_name(), None);
    }

    #[test]
    fn test_invalid_config_reports_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = [").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
        assert!(AppConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
