//! Implementation of `solrq uri`.

use std::process::ExitCode;

use solrq_query::build_uri_query_batched;

use crate::cli::{
    args::UriCommand,
    context::CommandContext,
    output::{STDIN_MARKER, query_failure, read_input},
};

/// Prints a batched identifier query.
pub fn run(ctx: &CommandContext, cmd: &UriCommand) -> ExitCode {
    let from_stdin = cmd.ids.is_empty() || cmd.ids.iter().all(|id| id == STDIN_MARKER);
    let ids: Vec<String> = if from_stdin {
        match read_input(STDIN_MARKER) {
            Ok(input) => input.split_whitespace().map(str::to_string).collect(),
            Err(code) => return code,
        }
    } else {
        cmd.ids.clone()
    };

    let field = cmd.field.as_deref().unwrap_or(&ctx.config.uri.field);
    let batch_size = cmd.batch_size.unwrap_or(ctx.config.uri.batch_size);

    match build_uri_query_batched(&ids, field, batch_size) {
        Ok(query) => {
            println!("{query}");
            ExitCode::SUCCESS
        }
        Err(e) => query_failure(&e),
    }
}
