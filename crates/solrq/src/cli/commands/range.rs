//! Implementation of `solrq range`.

use std::process::ExitCode;

use solrq_query::{DateRange, build_date_range_filter_query};

use crate::cli::{args::RangeCommand, output::query_failure};

/// Prints a date range filter for one field.
pub fn run(cmd: &RangeCommand) -> ExitCode {
    let range = DateRange::new(cmd.from, cmd.to);
    match build_date_range_filter_query(&cmd.field, Some(&range)) {
        Ok(filter) => {
            println!("{filter}");
            ExitCode::SUCCESS
        }
        Err(e) => query_failure(&e),
    }
}
