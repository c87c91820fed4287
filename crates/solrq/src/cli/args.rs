//! Clap argument definitions for the `solrq` CLI.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use solrq_query::UnmatchedPolicy;

/// Parses an unmatched-rule policy name.
fn parse_policy(s: &str) -> Result<UnmatchedPolicy, String> {
    s.parse()
}

/// Parses an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid timestamp '{s}' (expected RFC 3339 or YYYY-MM-DD)"))
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "solrq")]
#[command(about = "Compile search criteria into Solr queries")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); SOLRQ_LOG overrides
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Parses the process arguments, exiting with usage on error.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Shared output mode flag.
#[derive(Args, Debug, Clone, Default)]
pub struct JsonArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `solrq compile`.
#[derive(Args, Debug, Clone)]
pub struct CompileCommand {
    /// JSON search tree file, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: String,

    /// Print the parsed tree and skipped rules before the query
    #[arg(long)]
    pub explain: bool,

    /// Override the configured unmatched policy: skip, warn or error
    #[arg(long, value_parser = parse_policy)]
    pub unmatched: Option<UnmatchedPolicy>,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: JsonArgs,
}

/// Arguments for `solrq uri`.
#[derive(Args, Debug, Clone)]
pub struct UriCommand {
    /// Identifiers; reads whitespace-separated ids from stdin when empty or `-`
    pub ids: Vec<String>,

    /// Field holding identifiers [default: uri.field from config]
    #[arg(short = 'f', long)]
    pub field: Option<String>,

    /// Identifiers per OR group [default: uri.batch_size from config]
    #[arg(short = 'b', long)]
    pub batch_size: Option<usize>,
}

/// Arguments for `solrq range`.
#[derive(Args, Debug, Clone)]
pub struct RangeCommand {
    /// Date field to filter
    pub field: String,

    /// Lower bound, inclusive; open when omitted
    #[arg(long, value_parser = parse_timestamp)]
    pub from: Option<DateTime<Utc>>,

    /// Upper bound, inclusive; open when omitted
    #[arg(long, value_parser = parse_timestamp)]
    pub to: Option<DateTime<Utc>>,
}

/// Arguments for `solrq basic`.
#[derive(Args, Debug, Clone, Default)]
pub struct BasicCommand {
    /// Context instance the results must be part of (repeatable)
    #[arg(long)]
    pub location: Vec<String>,

    /// Free text sub-query
    #[arg(long)]
    pub text: Option<String>,

    /// Semantic class (repeatable); `prefix:Name` is expanded from [namespaces]
    #[arg(long = "type")]
    pub object_types: Vec<String>,

    /// Definition sub type (repeatable)
    #[arg(long = "sub-type")]
    pub sub_types: Vec<String>,

    /// Mime type; a leading `^` matches it as a substring
    #[arg(long)]
    pub mimetype: Option<String>,

    /// Exact instance identifier
    #[arg(long)]
    pub identifier: Option<String>,

    /// First creation day, in basic.date_format
    #[arg(long)]
    pub created_from: Option<String>,

    /// Last creation day, in basic.date_format
    #[arg(long)]
    pub created_to: Option<String>,

    /// Creator (repeatable)
    #[arg(long)]
    pub created_by: Vec<String>,
}

/// Arguments for `solrq parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Raw query, optionally prefixed with `|{json params}|`
    pub query: String,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: JsonArgs,
}

/// Arguments for `solrq init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.solrq.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `solrq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Compile a JSON search tree into a query
    #[command(after_help = "\
TREE FORMAT:
  Condition  {\"condition\": \"AND\"|\"OR\", \"rules\": [...]}
  Rule       {\"field\": \"title\", \"operation\": \"contains\", \"values\": [\"x\"]}

EXAMPLES:
  solrq compile tree.json
  cat tree.json | solrq compile --unmatched error
  solrq compile tree.json --explain")]
    Compile(CompileCommand),

    /// Build a batched identifier query
    Uri(UriCommand),

    /// Build a date range filter
    Range(RangeCommand),

    /// Build a basic search query
    Basic(BasicCommand),

    /// Split a string query into parameters and query text
    Parse(ParseCommand),

    /// List registered operations and aliases
    Operators,

    /// Initialize solrq configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,

    /// Validate configuration and diagnose issues
    Check,
}

impl Commands {
    /// Returns true if the command needs the merged configuration up front.
    ///
    /// `init` must work next to a broken config, and `check` reports load errors itself.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Self::Init(_) | Self::Check)
    }
}
