//! Implementation of `solrq parse`.

use std::process::ExitCode;

use serde::Serialize;
use solrq_query::parse_string_query;

use crate::cli::{
    args::ParseCommand,
    output::{print_json, query_failure},
};

/// JSON output for a split string query.
#[derive(Serialize)]
struct JsonParseOutput<'a> {
    /// Query text.
    query: &'a str,
    /// Extra request parameters in key order.
    params: Vec<JsonParam<'a>>,
}

/// One request parameter.
#[derive(Serialize)]
struct JsonParam<'a> {
    /// Parameter name.
    name: &'a str,
    /// Parameter value.
    value: &'a str,
}

/// Splits a string query and prints its parameters and query text.
pub fn run(cmd: &ParseCommand) -> ExitCode {
    let parsed = match parse_string_query(&cmd.query) {
        Ok(parsed) => parsed,
        Err(e) => return query_failure(&e),
    };

    if cmd.output.json {
        return print_json(&JsonParseOutput {
            query: &parsed.query,
            params: parsed
                .params
                .iter()
                .map(|(name, value)| JsonParam { name, value })
                .collect(),
        });
    }

    for (name, value) in &parsed.params {
        println!("{name}={value}");
    }
    println!("q={}", parsed.query);
    ExitCode::SUCCESS
}
