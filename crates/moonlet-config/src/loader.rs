//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::settings::{validate_prefix, SettingsFile};
use crate::{ConfigError, ConfigResult, DEFAULT_PRIVATE_PREFIX, DEFAULT_SHORT_SRC_LEN};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the per-project settings file
pub const PROJECT_FILE_NAME: &str = "moonlet.toml";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.moonlet/config.toml) - lowest priority
/// 2. Project config (./moonlet.toml) - overrides global
/// 3. Environment variables (MOONLET_*) - overrides project
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Merged settings from every layer
    pub settings: SettingsFile,

    /// Project root directory (where moonlet.toml was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Create a loader that reads the global layer from `path` instead of
    /// the home directory.
    pub fn with_global_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find moonlet.toml, layers it over the
    /// global config if one exists, then applies environment overrides.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_settings) = self.find_project_settings(start_dir)?;

        let mut settings = self.load_global_settings()?;
        settings.merge(&project_settings);

        let settings = self.apply_env_overrides(settings)?;

        Ok(Config {
            settings,
            project_root,
        })
    }

    /// Load configuration from a specific project settings file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_settings = SettingsFile::load_from_file(config_path)?;
        let mut settings = self.load_global_settings()?;
        settings.merge(&project_settings);

        let settings = self.apply_env_overrides(settings)?;
        let project_root = config_path.parent().map(|p| p.to_path_buf());

        Ok(Config {
            settings,
            project_root,
        })
    }

    /// Find project settings by walking up directory tree
    ///
    /// Returns (project_root, settings); defaults when no file is found.
    fn find_project_settings(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, SettingsFile)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_FILE_NAME);

            if config_path.exists() {
                let settings = SettingsFile::load_from_file(&config_path)?;
                return Ok((Some(current), settings));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, SettingsFile::default())),
            }
        }
    }

    /// Load global settings from ~/.moonlet/config.toml
    fn load_global_settings(&mut self) -> ConfigResult<SettingsFile> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => match SettingsFile::global_path() {
                Ok(path) => {
                    self.global_config_path = Some(path.clone());
                    path
                }
                // No home directory means no global layer
                Err(ConfigError::HomeNotFound) => return Ok(SettingsFile::default()),
                Err(e) => return Err(e),
            },
        };

        // Global config is optional - if it doesn't exist, return default
        if !path.exists() {
            return Ok(SettingsFile::default());
        }

        SettingsFile::load_from_file(&path)
    }

    /// Apply environment variable overrides
    ///
    /// Recognised variables: MOONLET_SHORT_SRC_LEN, MOONLET_PRIVATE_PREFIX, MOONLET_HOOKS
    fn apply_env_overrides(&self, mut settings: SettingsFile) -> ConfigResult<SettingsFile> {
        if let Ok(len) = env::var("MOONLET_SHORT_SRC_LEN") {
            let parsed = len
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue {
                    field: "MOONLET_SHORT_SRC_LEN".to_string(),
                    reason: format!("expected a positive integer, got '{}'", len),
                })?;
            settings
                .debug
                .get_or_insert_with(Default::default)
                .short_src_len = Some(parsed);
        }

        if let Ok(prefix) = env::var("MOONLET_PRIVATE_PREFIX") {
            validate_prefix("MOONLET_PRIVATE_PREFIX", &prefix)?;
            settings
                .debug
                .get_or_insert_with(Default::default)
                .private_prefix = Some(prefix);
        }

        if let Ok(hooks) = env::var("MOONLET_HOOKS") {
            let enabled = matches!(hooks.to_lowercase().as_str(), "true" | "1" | "yes" | "on");
            settings.hooks.get_or_insert_with(Default::default).enabled = Some(enabled);
        }

        settings.validate()?;
        Ok(settings)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Effective `short_src` length (settings > default)
    pub fn short_src_len(&self) -> usize {
        self.settings
            .short_src_len()
            .unwrap_or(DEFAULT_SHORT_SRC_LEN)
    }

    /// Effective private-local prefix (settings > default)
    pub fn private_prefix(&self) -> char {
        self.settings
            .private_prefix()
            .unwrap_or(DEFAULT_PRIVATE_PREFIX)
    }

    /// Whether hooks are dispatched (settings > default)
    pub fn hooks_enabled(&self) -> bool {
        self.settings.hooks_enabled().unwrap_or(true)
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a moonlet.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}
