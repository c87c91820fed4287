//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use solrq_config::Config;
use solrq_query::{Namespaces, OperationRegistry, QueryError, RegistryBuilder, UnmatchedPolicy};
use tracing::debug;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        debug!(
            root = ?config.config_root,
            aliases = config.operators.len(),
            "configuration loaded"
        );
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for commands like `init` that should work even when an existing config file is
    /// invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Builds the operation registry from the built-ins plus configured aliases.
    pub fn registry(&self) -> Result<OperationRegistry, ExitCode> {
        build_registry(&self.config).map_err(|e| {
            eprintln!("error: invalid operator configuration: {e}");
            ExitCode::FAILURE
        })
    }

    /// Returns the configured unmatched-rule policy.
    pub fn unmatched_policy(&self) -> Result<UnmatchedPolicy, ExitCode> {
        self.config.compiler.unmatched.parse().map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }

    /// Returns the configured namespace prefixes.
    pub fn namespaces(&self) -> Namespaces {
        self.config
            .namespaces
            .iter()
            .map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
            .collect()
    }
}

/// Builds a registry for `config`, reporting alias problems as query errors.
pub fn build_registry(config: &Config) -> Result<OperationRegistry, QueryError> {
    RegistryBuilder::with_builtins()
        .aliases(&config.operators)
        .escape_values(config.compiler.escape_values)
        .build()
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
