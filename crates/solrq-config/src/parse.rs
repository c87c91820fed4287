//! Configuration file parsing.
//!
//! Parses individual `.solrq.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Compiler settings section.
    pub compiler: Option<RawCompilerSettings>,
    /// Identifier query settings section.
    pub uri: Option<RawUriSettings>,
    /// Basic search settings section.
    pub basic: Option<RawBasicSettings>,
    /// Operator aliases: alias -> built-in operator.
    pub operators: Option<HashMap<String, String>>,
    /// Namespace prefixes: prefix -> namespace URI.
    pub namespaces: Option<HashMap<String, String>>,
}

/// Raw compiler settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCompilerSettings {
    /// Handling of rules with unknown operators: skip, warn or error.
    pub unmatched: Option<String>,
    /// Whether rule values are escaped before rendering.
    pub escape_values: Option<bool>,
}

/// Raw identifier query settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawUriSettings {
    /// Field holding instance identifiers.
    pub field: Option<String>,
    /// Maximum identifiers per group.
    pub batch_size: Option<usize>,
}

/// Raw basic search settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBasicSettings {
    /// `strftime` pattern for creation date arguments.
    pub date_format: Option<String>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
