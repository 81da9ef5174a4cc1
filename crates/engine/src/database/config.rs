//! Database configuration via `strata-lists.toml`
//!
//! A database is configured from a small TOML document. Every field has a
//! default, so an empty file (or `DatabaseConfig::default()`) is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_core::{StrataError, StrataResult};

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "strata-lists.toml";

/// Database configuration loaded from TOML.
///
/// # Example
///
/// ```toml
/// name = "inventory"
/// max_list_length = 10000
/// strict_transactions = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Database name, used in log output.
    #[serde(default = "default_name")]
    pub name: String,
    /// Maximum element count of any managed list. `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_list_length: Option<usize>,
    /// Reject managed mutations outside a write transaction.
    ///
    /// When `false`, such a mutation runs in its own implicit transaction.
    #[serde(default = "default_strict")]
    pub strict_transactions: bool,
}

fn default_name() -> String {
    "default".to_string()
}

fn default_strict() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            max_list_length: None,
            strict_transactions: default_strict(),
        }
    }
}

impl DatabaseConfig {
    /// Check field values.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty name or a zero `max_list_length`.
    pub fn validate(&self) -> StrataResult<()> {
        if self.name.trim().is_empty() {
            return Err(StrataError::invalid_input("database name cannot be empty"));
        }
        if self.max_list_length == Some(0) {
            return Err(StrataError::invalid_input(
                "max_list_length must be at least 1; omit it for unbounded lists",
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> StrataResult<Self> {
        let config: DatabaseConfig = toml::from_str(content)
            .map_err(|e| StrataError::invalid_input(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Strata lists database configuration
#
# Name shown in log output (default: "default")
name = "default"

# Maximum number of elements in any managed list (default: unbounded)
# max_list_length = 100000

# Require an open write transaction for every managed mutation (default: true).
# When false, each mutation outside a transaction commits on its own.
strict_transactions = true
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> StrataResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            StrataError::InvalidInput { message } => {
                StrataError::invalid_input(format!("{} ({})", message, path.display()))
            }
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> StrataResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> StrataResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| StrataError::internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
