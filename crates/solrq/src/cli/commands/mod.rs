//! Command implementations and dispatch.

pub mod basic;
pub mod check;
pub mod compile;
pub mod config;
pub mod init;
pub mod operators;
pub mod parse;
pub mod range;
pub mod uri;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Compile(cmd) => compile::run(ctx, &cmd),
        Commands::Uri(cmd) => uri::run(ctx, &cmd),
        Commands::Range(cmd) => range::run(&cmd),
        Commands::Basic(cmd) => basic::run(ctx, &cmd),
        Commands::Parse(cmd) => parse::run(&cmd),
        Commands::Operators => operators::run(ctx),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
        Commands::Check => check::run(ctx),
    }
}
