//! Implementation of `solrq check`.

use std::process::ExitCode;

use solrq_config::{Config, ConfigWarning, discover_config_files, is_global_config};

use crate::cli::{
    context::{CommandContext, build_registry},
    output::section,
};

/// Exit codes for `solrq check`.
mod exit_codes {
    use std::process::ExitCode;

    /// Configuration is valid, possibly with warnings.
    pub const OK: ExitCode = ExitCode::SUCCESS;
    /// Configuration has errors and cannot be used.
    pub const ERROR: ExitCode = ExitCode::FAILURE;
}

/// Validates configuration files and the operation registry they produce.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);

    println!("Checking configuration...");
    println!();

    if config_files.is_empty() {
        println!("No configuration files found; built-in defaults apply.");
        println!();
        println!("Run 'solrq init' to create a configuration file.");
        return exit_codes::OK;
    }

    section("Config files (highest precedence first)");
    for path in &config_files {
        let scope = if is_global_config(path) {
            "global"
        } else {
            "local"
        };
        println!("  {} ({scope})", path.display());
    }
    println!();

    let config = match Config::load_from_files(&config_files) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_codes::ERROR;
        }
    };

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No configuration warnings.");
    } else {
        section(&format!("Warnings ({})", warnings.len()));
        for warning in &warnings {
            println!("  - {warning}");
        }
        println!();
        print_hints(&warnings);
    }
    println!();

    match build_registry(&config) {
        Ok(registry) => {
            println!(
                "Operations: {} registered, {} aliases",
                registry.len(),
                registry.aliases().len()
            );
            exit_codes::OK
        }
        Err(e) => {
            eprintln!("error: {e}");
            exit_codes::ERROR
        }
    }
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|warning| match warning {
            ConfigWarning::BlankUriField => {
                "Set uri.field to the field holding instance identifiers."
            }
            ConfigWarning::SelfAlias { .. } | ConfigWarning::BlankAliasTarget { .. } => {
                "Point each [operators] alias at a built-in operator; see `solrq operators`."
            }
            ConfigWarning::NamespaceWithoutSeparator { .. } => {
                "End namespace URIs with '#' or '/' so expanded names stay separate."
            }
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();

    if !hints.is_empty() {
        println!("Hints:");
        for hint in hints {
            println!("  - {hint}");
        }
    }
}
