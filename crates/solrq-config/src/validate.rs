//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The identifier field is blank, so identifier queries cannot be built.
    BlankUriField,
    /// An alias names itself.
    SelfAlias {
        /// The offending alias.
        alias: String,
    },
    /// An alias has a blank target operator.
    BlankAliasTarget {
        /// The offending alias.
        alias: String,
    },
    /// A namespace URI lacks a trailing `#` or `/`, so expanded names run into it.
    NamespaceWithoutSeparator {
        /// Namespace prefix.
        prefix: String,
        /// Namespace URI.
        uri: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankUriField => write!(f, "uri.field is blank"),
            Self::SelfAlias { alias } => {
                write!(f, "operator alias '{alias}' refers to itself")
            }
            Self::BlankAliasTarget { alias } => {
                write!(f, "operator alias '{alias}' has an empty target")
            }
            Self::NamespaceWithoutSeparator { prefix, uri } => {
                write!(
                    f,
                    "namespace '{prefix}' URI does not end with '#' or '/': {uri}"
                )
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
///
/// This checks for:
/// - A blank identifier field
/// - Operator aliases that are empty or point at themselves
/// - Namespace URIs without a trailing separator
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.uri.field.trim().is_empty() {
        warnings.push(ConfigWarning::BlankUriField);
    }

    for (alias, target) in &config.operators {
        if target.trim().is_empty() {
            warnings.push(ConfigWarning::BlankAliasTarget {
                alias: alias.clone(),
            });
        } else if alias == target {
            warnings.push(ConfigWarning::SelfAlias {
                alias: alias.clone(),
            });
        }
    }

    for (prefix, uri) in &config.namespaces {
        if !uri.ends_with('#') && !uri.ends_with('/') {
            warnings.push(ConfigWarning::NamespaceWithoutSeparator {
                prefix: prefix.clone(),
                uri: uri.clone(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_clean() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn test_blank_uri_field() {
        let mut config = Config::default();
        config.uri.field = "  ".into();
        assert_eq!(validate_config(&config), vec![ConfigWarning::BlankUriField]);
    }

    #[test]
    fn test_alias_warnings() {
        let mut config = Config::default();
        config.operators.insert("equals".into(), "equals".into());
        config.operators.insert("is".into(), String::new());
        config.operators.insert("has".into(), "contains".into());

        let warnings = validate_config(&config);
        assert_eq!(
            warnings,
            vec![
                ConfigWarning::SelfAlias {
                    alias: "equals".into()
                },
                ConfigWarning::BlankAliasTarget { alias: "is".into() },
            ]
        );
    }

    #[test]
    fn test_namespace_separator() {
        let mut config = Config::default();
        config
            .namespaces
            .insert("emf".into(), "http://example.org/emf#".into());
        config
            .namespaces
            .insert("ptop".into(), "http://example.org/ptop".into());

        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "namespace 'ptop' URI does not end with '#' or '/': http://example.org/ptop"
        );
    }
}
