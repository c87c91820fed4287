//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules.

use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};

use crate::{
    BasicSettings, CompilerSettings, Config, ConfigError, UriSettings,
    parse::{RawBasicSettings, RawCompilerSettings, RawConfig, RawUriSettings},
};

/// Accepted values for `compiler.unmatched`.
pub const UNMATCHED_POLICIES: &[&str] = &["skip", "warn", "error"];

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - `[operators]` and `[namespaces]`: merged by key, first definition of each key wins
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let compiler = merge_compiler_settings(configs)?;
    let uri = merge_uri_settings(configs)?;
    let basic = merge_basic_settings(configs);
    let operators = merge_tables(configs, |raw| raw.operators.as_ref());
    let namespaces = merge_tables(configs, |raw| raw.namespaces.as_ref());
    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(|p| p.to_path_buf());

    Ok(Config {
        compiler,
        uri,
        basic,
        operators,
        namespaces,
        config_root,
    })
}

/// Merges compiler settings, rejecting unknown unmatched policies.
fn merge_compiler_settings(configs: &[ParsedConfig]) -> Result<CompilerSettings, ConfigError> {
    let mut result = CompilerSettings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref compiler) = parsed.config.compiler {
            apply_raw_compiler(&mut result, compiler, parsed)?;
        }
    }

    Ok(result)
}

/// Applies raw compiler settings to result.
fn apply_raw_compiler(
    result: &mut CompilerSettings,
    raw: &RawCompilerSettings,
    parsed: &ParsedConfig,
) -> Result<(), ConfigError> {
    if let Some(ref v) = raw.unmatched {
        let normalized = v.trim().to_ascii_lowercase();
        if !UNMATCHED_POLICIES.contains(&normalized.as_str()) {
            return Err(ConfigError::InvalidValue {
                path: parsed.path.clone(),
                key: "compiler.unmatched",
                value: v.clone(),
                expected: "one of skip, warn, error",
            });
        }
        result.unmatched = normalized;
    }
    if let Some(v) = raw.escape_values {
        result.escape_values = v;
    }
    Ok(())
}

/// Merges identifier query settings, rejecting a zero batch size.
fn merge_uri_settings(configs: &[ParsedConfig]) -> Result<UriSettings, ConfigError> {
    let mut result = UriSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref uri) = parsed.config.uri {
            apply_raw_uri(&mut result, uri, parsed)?;
        }
    }

    Ok(result)
}

/// Applies raw identifier query settings to result.
fn apply_raw_uri(
    result: &mut UriSettings,
    raw: &RawUriSettings,
    parsed: &ParsedConfig,
) -> Result<(), ConfigError> {
    if let Some(ref v) = raw.field {
        result.field = v.clone();
    }
    if let Some(v) = raw.batch_size {
        if v == 0 {
            return Err(ConfigError::InvalidValue {
                path: parsed.path.clone(),
                key: "uri.batch_size",
                value: v.to_string(),
                expected: "a positive integer",
            });
        }
        result.batch_size = v;
    }
    Ok(())
}

/// Merges basic search settings.
fn merge_basic_settings(configs: &[ParsedConfig]) -> BasicSettings {
    let mut result = BasicSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref basic) = parsed.config.basic {
            apply_raw_basic(&mut result, basic);
        }
    }

    result
}

/// Applies raw basic search settings to result.
fn apply_raw_basic(result: &mut BasicSettings, raw: &RawBasicSettings) {
    if let Some(ref v) = raw.date_format {
        result.date_format = v.clone();
    }
}

/// Merges a string table across configs; the highest precedence definition of a key wins.
fn merge_tables<F>(configs: &[ParsedConfig], table: F) -> BTreeMap<String, String>
where
    F: Fn(&RawConfig) -> Option<&HashMap<String, String>>,
{
    let mut result = BTreeMap::new();

    for parsed in configs.iter().rev() {
        if let Some(entries) = table(&parsed.config) {
            for (key, value) in entries {
                result.insert(key.clone(), value.clone());
            }
        }
    }

    result
}
