//! Implementation of `solrq basic`.

use std::process::ExitCode;

use chrono::NaiveDate;
use solrq_query::BasicSearch;

use crate::cli::{args::BasicCommand, context::CommandContext, output::query_failure};

/// Prints the query for a basic search form.
pub fn run(ctx: &CommandContext, cmd: &BasicCommand) -> ExitCode {
    let format = &ctx.config.basic.date_format;
    let created_from = match parse_day(cmd.created_from.as_deref(), format) {
        Ok(day) => day,
        Err(code) => return code,
    };
    let created_to = match parse_day(cmd.created_to.as_deref(), format) {
        Ok(day) => day,
        Err(code) => return code,
    };

    let search = BasicSearch {
        location: cmd.location.clone(),
        meta_text: cmd.text.clone(),
        object_types: cmd.object_types.clone(),
        sub_types: cmd.sub_types.clone(),
        mimetype: cmd.mimetype.clone(),
        identifier: cmd.identifier.clone(),
        created_from,
        created_to,
        created_by: cmd.created_by.clone(),
    };

    match search.build_query(&ctx.namespaces()) {
        Ok(query) => {
            println!("{query}");
            ExitCode::SUCCESS
        }
        Err(e) => query_failure(&e),
    }
}

/// Parses an optional day argument with the configured format.
fn parse_day(value: Option<&str>, format: &str) -> Result<Option<NaiveDate>, ExitCode> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(value, format)
        .map(Some)
        .map_err(|e| {
            eprintln!("error: invalid date '{value}' for format '{format}': {e}");
            ExitCode::FAILURE
        })
}
