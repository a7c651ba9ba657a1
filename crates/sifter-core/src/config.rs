//! Compiler configuration, loadable from TOML.

use crate::{DEFAULT_PATH_SEPARATOR, PATH_DELIMITER};
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error as ThisError;

///
/// CompilerConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Separator used to derive association paths from field names.
    pub path_separator: char,
    /// Escape character written before literal `%` / `_` in LIKE patterns.
    pub like_escape: char,
    /// Memoize validated filter models per filter type.
    pub cache_filter_models: bool,
    /// Page size used when a caller does not pick one.
    pub default_page_size: u32,
    /// Upper bound applied to requested page sizes.
    pub max_page_size: u32,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            path_separator: DEFAULT_PATH_SEPARATOR,
            like_escape: '\\',
            cache_filter_models: true,
            default_page_size: 20,
            max_page_size: 1000,
        }
    }
}

impl CompilerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|err| ConfigError::Parse {
            message: err.to_string(),
        })?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path_separator == PATH_DELIMITER {
            return Err(ConfigError::Invalid {
                key: "path_separator",
                message: format!("'{PATH_DELIMITER}' is reserved for explicit paths"),
            });
        }
        if matches!(self.like_escape, '%' | '_') {
            return Err(ConfigError::Invalid {
                key: "like_escape",
                message: "escape character cannot be a wildcard".to_string(),
            });
        }
        if self.max_page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "max_page_size",
                message: "must be at least 1".to_string(),
            });
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid {
                key: "default_page_size",
                message: format!("must be between 1 and {}", self.max_page_size),
            });
        }

        Ok(())
    }
}

/// Configuration loading failures.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config: {message}")]
    Parse { message: String },

    #[error("invalid config value for '{key}': {message}")]
    Invalid { key: &'static str, message: String },
}
