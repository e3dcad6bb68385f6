//! Settings files (`~/.moonlet/config.toml` and `moonlet.toml`)
//!
//! Both files share one schema; the loader merges them in precedence order.

use crate::{ConfigError, ConfigResult, MIN_SHORT_SRC_LEN};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of a Moonlet settings file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// Introspection settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugSection>,

    /// Hook dispatch settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hooks: Option<HooksSection>,
}

/// `[debug]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DebugSection {
    /// Maximum length of the shortened source id (default: 60)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_src_len: Option<usize>,

    /// First character of compiler-private local names (default: "*")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_prefix: Option<String>,
}

/// `[hooks]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct HooksSection {
    /// Whether line/call hooks are dispatched at all (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl SettingsFile {
    /// Load a settings file from disk
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let settings: Self =
            toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
                file: path.to_path_buf(),
                error: e,
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate field values
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(debug) = &self.debug {
            if let Some(len) = debug.short_src_len {
                if len < MIN_SHORT_SRC_LEN {
                    return Err(ConfigError::InvalidValue {
                        field: "debug.short_src_len".to_string(),
                        reason: format!("must be at least {}, got {}", MIN_SHORT_SRC_LEN, len),
                    });
                }
            }
            if let Some(prefix) = &debug.private_prefix {
                validate_prefix("debug.private_prefix", prefix)?;
            }
        }
        Ok(())
    }

    /// Get the global settings path (~/.moonlet/config.toml)
    pub fn global_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".moonlet").join("config.toml"))
    }

    /// Merge another settings file into this one, field by field.
    /// Values present in `other` win.
    pub fn merge(&mut self, other: &SettingsFile) {
        if let Some(other_debug) = &other.debug {
            let debug = self.debug.get_or_insert_with(Default::default);
            if other_debug.short_src_len.is_some() {
                debug.short_src_len = other_debug.short_src_len;
            }
            if other_debug.private_prefix.is_some() {
                debug.private_prefix = other_debug.private_prefix.clone();
            }
        }
        if let Some(other_hooks) = &other.hooks {
            let hooks = self.hooks.get_or_insert_with(Default::default);
            if other_hooks.enabled.is_some() {
                hooks.enabled = other_hooks.enabled;
            }
        }
    }

    pub fn short_src_len(&self) -> Option<usize> {
        self.debug.as_ref().and_then(|d| d.short_src_len)
    }

    pub fn private_prefix(&self) -> Option<char> {
        self.debug
            .as_ref()
            .and_then(|d| d.private_prefix.as_deref())
            .and_then(|p| p.chars().next())
    }

    pub fn hooks_enabled(&self) -> Option<bool> {
        self.hooks.as_ref().and_then(|h| h.enabled)
    }
}

/// The private-local marker must be exactly one character
pub(crate) fn validate_prefix(field: &str, value: &str) -> ConfigResult<()> {
    if value.chars().count() != 1 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be a single character, got '{}'", value),
        });
    }
    Ok(())
}
