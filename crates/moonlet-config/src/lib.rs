//! Moonlet Configuration System
//!
//! Provides configuration for the Moonlet debug core:
//! - Global user configuration (~/.moonlet/config.toml)
//! - Project configuration (moonlet.toml)
//! - Environment overrides (MOONLET_*)
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config (~/.moonlet/config.toml)
//! 3. Project config (./moonlet.toml, searched upward)
//! 4. Environment variables (MOONLET_*)
//!
//! # Example
//!
//! ```no_run
//! use moonlet_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! assert!(config.short_src_len() >= 16);
//! ```

pub mod loader;
pub mod settings;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use loader::{Config, ConfigLoader};
pub use settings::{DebugSection, HooksSection, SettingsFile};

/// Default maximum length of a shortened source id (`short_src`).
pub const DEFAULT_SHORT_SRC_LEN: usize = 60;

/// Smallest accepted `short_src` length; shorter buffers cannot hold the
/// `file `...'` decoration plus a useful tail.
pub const MIN_SHORT_SRC_LEN: usize = 16;

/// Default first character marking compiler-private locals.
pub const DEFAULT_PRIVATE_PREFIX: char = '*';
