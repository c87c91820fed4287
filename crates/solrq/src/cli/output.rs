//! Input reading and output rendering shared by commands.

use std::{
    fs,
    io::{self, Read},
    process::ExitCode,
};

use serde::Serialize;
use solrq_query::QueryError;

/// Argument value naming standard input.
pub const STDIN_MARKER: &str = "-";

/// Reads a file argument, or stdin for `-`.
pub fn read_input(path: &str) -> Result<String, ExitCode> {
    if path == STDIN_MARKER {
        let mut buf = String::new();
        return io::stdin()
            .read_to_string(&mut buf)
            .map(|_| buf)
            .map_err(|e| {
                eprintln!("error: failed to read stdin: {e}");
                ExitCode::FAILURE
            });
    }

    fs::read_to_string(path).map_err(|e| {
        eprintln!("error: failed to read {path}: {e}");
        ExitCode::FAILURE
    })
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Reports a query error and returns the failure code.
pub fn query_failure(err: &QueryError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::FAILURE
}

/// Prints a section title followed by an underline.
pub fn section(title: &str) {
    println!("{title}");
    println!("{}", "-".repeat(title.chars().count()));
}
