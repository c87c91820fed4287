//! Configuration system for solrq.
//!
//! solrq uses TOML configuration files named `.solrq.toml`. Configuration is resolved by walking
//! up the directory tree from the current working directory, collecting any `.solrq.toml` files
//! found, then loading `~/.solrq.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, UNMATCHED_POLICIES, merge_configs};
pub use parse::{
    RawBasicSettings, RawCompilerSettings, RawConfig, RawUriSettings, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for solrq.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Tree compiler settings.
    pub compiler: CompilerSettings,
    /// Identifier query settings.
    pub uri: UriSettings,
    /// Basic search settings.
    pub basic: BasicSettings,
    /// Operator aliases: alias -> built-in operator.
    pub operators: BTreeMap<String, String>,
    /// Namespace prefixes: prefix -> namespace URI.
    pub namespaces: BTreeMap<String, String>,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.solrq.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// Produces the same layout as a `.solrq.toml` file.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableSettings {
            compiler: &self.compiler,
            uri: &self.uri,
            basic: &self.basic,
            operators: &self.operators,
            namespaces: &self.namespaces,
        };
        toml::to_string_pretty(&serializable).expect("settings serialization should not fail")
    }
}

/// Tree compiler settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Handling of rules with unknown operators: `skip`, `warn` or `error`.
    pub unmatched: String,
    /// Whether rule values are escaped before rendering.
    pub escape_values: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            unmatched: String::from("skip"),
            escape_values: false,
        }
    }
}

/// Identifier query settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UriSettings {
    /// Field holding instance identifiers.
    pub field: String,
    /// Maximum identifiers per group.
    pub batch_size: usize,
}

impl Default for UriSettings {
    fn default() -> Self {
        Self {
            field: String::from("id"),
            batch_size: 1000,
        }
    }
}

/// Basic search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BasicSettings {
    /// `strftime` pattern for creation date arguments.
    pub date_format: String,
}

impl Default for BasicSettings {
    fn default() -> Self {
        Self {
            date_format: String::from("%Y-%m-%d"),
        }
    }
}

/// Internal view for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Compiler settings.
    compiler: &'a CompilerSettings,
    /// Identifier query settings.
    uri: &'a UriSettings,
    /// Basic search settings.
    basic: &'a BasicSettings,
    /// Operator aliases.
    operators: &'a BTreeMap<String, String>,
    /// Namespace prefixes.
    namespaces: &'a BTreeMap<String, String>,
}
