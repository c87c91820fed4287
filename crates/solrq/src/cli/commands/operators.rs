//! Implementation of `solrq operators`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};

use crate::cli::{context::CommandContext, output::section};

/// Lists registered operations in consultation order, then configured aliases.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let registry = match ctx.registry() {
        Ok(registry) => registry,
        Err(code) => return code,
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Order", "Operation", "Operators"]);
    for op in registry.operations() {
        table.add_row(vec![
            Cell::new(op.order().to_string()),
            Cell::new(op.name()),
            Cell::new(op.operators().join(", ")),
        ]);
    }
    println!("{table}");

    let aliases = registry.aliases();
    if !aliases.is_empty() {
        println!();
        section("Aliases");
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec!["Alias", "Operator"]);
        for (alias, target) in aliases {
            table.add_row(vec![Cell::new(alias), Cell::new(target)]);
        }
        println!("{table}");
    }

    if registry.escapes_values() {
        println!();
        println!("Rule values are escaped before rendering.");
    }

    ExitCode::SUCCESS
}
