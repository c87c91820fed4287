//! Implementation of `solrq config`.

use std::process::ExitCode;

use crate::cli::context::CommandContext;

/// Shows effective configuration settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    if let Some(root) = &config.config_root {
        println!("# resolved from {}", root.display());
    }
    print!("{}", config.settings_to_toml());
    ExitCode::SUCCESS
}
