//! Implementation of `solrq compile`.

use std::process::ExitCode;

use serde::Serialize;
use solrq_query::{QueryCompiler, SearchTreeNode};

use crate::cli::{
    args::CompileCommand,
    context::CommandContext,
    output::{print_json, query_failure, read_input, section},
};

/// JSON output for a compiled tree.
#[derive(Serialize)]
struct JsonCompileOutput<'a> {
    /// Compiled query text.
    query: &'a str,
    /// Rules skipped for lack of an operation.
    unmatched: Vec<String>,
}

/// Compiles a JSON search tree and prints the query.
pub fn run(ctx: &CommandContext, cmd: &CompileCommand) -> ExitCode {
    let input = match read_input(&cmd.input) {
        Ok(input) => input,
        Err(code) => return code,
    };
    let tree = match SearchTreeNode::from_json(&input) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("error: invalid search tree: {e}");
            return ExitCode::FAILURE;
        }
    };

    let registry = match ctx.registry() {
        Ok(registry) => registry,
        Err(code) => return code,
    };
    let policy = match cmd.unmatched {
        Some(policy) => policy,
        None => match ctx.unmatched_policy() {
            Ok(policy) => policy,
            Err(code) => return code,
        },
    };

    let compiled = match QueryCompiler::new(&registry).unmatched(policy).compile(&tree) {
        Ok(compiled) => compiled,
        Err(e) => return query_failure(&e),
    };

    if cmd.output.json {
        return print_json(&JsonCompileOutput {
            query: &compiled.query,
            unmatched: compiled.unmatched.iter().map(ToString::to_string).collect(),
        });
    }

    if cmd.explain {
        section(&format!("Tree ({policy} unmatched rules)"));
        print!("{tree}");
        println!();
        if !compiled.unmatched.is_empty() {
            section("Skipped rules");
            for rule in &compiled.unmatched {
                println!("  {rule}");
            }
            println!();
        }
        section("Query");
    }

    println!("{}", compiled.query);
    ExitCode::SUCCESS
}
