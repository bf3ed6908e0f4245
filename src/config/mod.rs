//! Evaluator configuration
//!
//! Settings can be written inline or loaded from the `[evaluator]` table of
//! an analysis config file:
//!
//! ```toml
//! [evaluator]
//! allow-unknown = true
//! allow-field-initializers = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options fixed before an evaluator's first use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Approximate instead of failing: an unknown operand is replaced by
    /// the other, unknown template parts and array elements are tolerated,
    /// and `format` calls evaluate to their format string.
    pub allow_unknown: bool,
    /// Trust the initializer of any field, not only static final ones
    pub allow_field_initializers: bool,
}

/// Errors loading an [`EvaluatorConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid evaluator config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Deserialize)]
struct Wrapped {
    evaluator: EvaluatorConfig,
}

impl EvaluatorConfig {
    /// Parses a config from TOML text.
    ///
    /// Accepts either the bare keys or an `[evaluator]` table; other tables
    /// alongside `[evaluator]` are ignored.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(text)?;
        if table.contains_key("evaluator") {
            let wrapped: Wrapped = toml::Value::Table(table).try_into()?;
            return Ok(wrapped.evaluator);
        }
        Ok(toml::Value::Table(table).try_into()?)
    }

    /// Reads a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded evaluator config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> String {
        // Two booleans always serialize
        toml::to_string(self).unwrap_or_default()
    }
}
