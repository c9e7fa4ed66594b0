//! # Configuration
//!
//! Binding behavior is configured through [`BindConfig`], managed by [`confique`]
//! for layered loading from a TOML file, environment variables, and defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `PARAMBIND_CACHING`, `PARAMBIND_VALIDATE_DEFAULTS`,
//!    `PARAMBIND_KEY_SEPARATOR`.
//! 2. **Config file**: `parambind.toml` (explicit path, or the OS config dir via
//!    [`directories`] for [`BindConfig::load_default`]).
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `caching` | `true` | Keep deserialized values of cache-eligible attributes in memory |
//! | `validate_defaults` | `true` | Run the validator chain over defaults when a schema is resolved |
//! | `key_separator` | `"_"` | Joins an instance prefix and an attribute name into a store key |

use crate::error::Result;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILENAME: &str = "parambind.toml";

/// Settings applied when a declaration is resolved into a schema.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BindConfig {
    /// Master switch for the per-instance value cache. When off, every read
    /// re-deserializes from the store. Static eligibility is unaffected.
    #[config(default = true, env = "PARAMBIND_CACHING")]
    pub caching: bool,

    /// Validate explicit and serializer-provided defaults at resolution time.
    /// A default that fails its own validators is then a bind error.
    #[config(default = true, env = "PARAMBIND_VALIDATE_DEFAULTS")]
    pub validate_defaults: bool,

    /// Separator between an instance prefix and an attribute name.
    #[config(default = "_", env = "PARAMBIND_KEY_SEPARATOR")]
    pub key_separator: String,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            caching: true,
            validate_defaults: true,
            key_separator: "_".to_string(),
        }
    }
}

impl BindConfig {
    /// Load from `path`, layered under environment variables.
    /// A missing file falls back to compiled defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = BindConfig::builder().env().file(path.as_ref()).load()?;
        Ok(config)
    }

    /// Load `parambind.toml` from the OS-appropriate config directory.
    pub fn load_default() -> Result<Self> {
        match directories::ProjectDirs::from("", "", "parambind") {
            Some(dirs) => Self::load(dirs.config_dir().join(CONFIG_FILENAME)),
            None => Ok(BindConfig::builder().env().load()?),
        }
    }

    /// Disable the value cache.
    pub fn without_caching(mut self) -> Self {
        self.caching = false;
        self
    }

    /// Exempt defaults from validation.
    pub fn without_default_validation(mut self) -> Self {
        self.validate_defaults = false;
        self
    }

    /// Store key for `name` under `prefix`. An empty prefix yields the bare name.
    pub fn key_for(&self, prefix: &str, name: &str) -> String {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", prefix, self.key_separator, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = BindConfig::default();
        assert!(config.caching);
        assert!(config.validate_defaults);
        assert_eq!(config.key_separator, "_");
    }

    #[test]
    fn test_key_for_with_prefix() {
        let config = BindConfig::default();
        assert_eq!(config.key_for("type1", "x"), "type1_x");
    }

    #[test]
    fn test_key_for_empty_prefix_is_bare_name() {
        let config = BindConfig::default();
        assert_eq!(config.key_for("", "x"), "x");
    }

    #[test]
    fn test_custom_separator() {
        let config = BindConfig {
            key_separator: ".".to_string(),
            ..Default::default()
        };
        assert_eq!(config.key_for("seg", "threshold"), "seg.threshold");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let config = BindConfig::load(temp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config.key_separator, "_");
        assert!(config.validate_defaults);
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "caching = false\nkey_separator = \"::\"\n").unwrap();

        let config = BindConfig::load(&path).unwrap();
        assert!(!config.caching);
        assert!(config.validate_defaults);
        assert_eq!(config.key_separator, "::");
    }

    #[test]
    fn test_builders() {
        let config = BindConfig::default()
            .without_caching()
            .without_default_validation();
        assert!(!config.caching);
        assert!(!config.validate_defaults);
    }
}
