//! Standalone query fragment builders.
//!
//! These build the fragments that do not come from a search tree: batched identifier
//! queries, date range filters and value escaping.

use chrono::{DateTime, Utc};

use crate::error::QueryError;

/// Maximum number of identifiers per parenthesised group in a URI query.
///
/// Keeps each clause under the engine's boolean clause limit.
pub const URI_BATCH_SIZE: usize = 1000;

/// Date pattern understood by the search engine. Always rendered in UTC.
pub const SOLR_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Query matching every document.
pub const QUERY_DEFAULT_ALL: &str = "*:*";

/// Marker for an open range bound.
const OPEN_BOUND: &str = "*";

/// A date interval with independently optional bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Inclusive lower bound, `None` for open.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound, `None` for open.
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Creates a range from optional bounds.
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    /// Returns true if the lower bound is after the upper bound.
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}

/// Formats a timestamp with [`SOLR_DATE_FORMAT`].
pub fn format_solr_date(date: &DateTime<Utc>) -> String {
    date.format(SOLR_DATE_FORMAT).to_string()
}

/// Builds a range filter `field:[from TO to]` with `*` for absent bounds.
///
/// Fails with an invalid-argument error if `field` is blank, `range` is `None`, or the
/// range is inverted. Bounds are never swapped.
pub fn build_date_range_filter_query(
    field: &str,
    range: Option<&DateRange>,
) -> Result<String, QueryError> {
    require_field(field)?;
    let range = range.ok_or_else(|| QueryError::invalid_argument("date range is required"))?;
    if range.is_inverted() {
        return Err(QueryError::invalid_argument(
            "date range lower bound is after its upper bound",
        ));
    }

    let from = range
        .from
        .as_ref()
        .map_or_else(|| OPEN_BOUND.to_string(), format_solr_date);
    let to = range
        .to
        .as_ref()
        .map_or_else(|| OPEN_BOUND.to_string(), format_solr_date);

    Ok(format!("{field}:[{from} TO {to}]"))
}

/// Builds an identifier query batched at [`URI_BATCH_SIZE`].
///
/// See [`build_uri_query_batched`].
pub fn build_uri_query<S: AsRef<str>>(ids: &[S], field: &str) -> Result<String, QueryError> {
    build_uri_query_batched(ids, field, URI_BATCH_SIZE)
}

/// Builds `{!df=field q.op=OR}field:((ids...) OR (ids...))`.
///
/// Identifiers are quoted and split into groups of at most `batch_size`, each group
/// parenthesised and the groups OR-ed together. An empty identifier list yields an empty
/// string.
pub fn build_uri_query_batched<S: AsRef<str>>(
    ids: &[S],
    field: &str,
    batch_size: usize,
) -> Result<String, QueryError> {
    require_field(field)?;
    if batch_size == 0 {
        return Err(QueryError::invalid_argument(
            "batch size must be greater than zero",
        ));
    }
    if ids.is_empty() {
        return Ok(String::new());
    }

    let groups: Vec<String> = ids
        .chunks(batch_size)
        .map(|batch| {
            let quoted: Vec<String> = batch.iter().map(|id| quote(id.as_ref())).collect();
            format!("({})", quoted.join(" "))
        })
        .collect();

    Ok(format!(
        "{{!df={field} q.op=OR}}{field}:({})",
        groups.join(" OR ")
    ))
}

/// Escapes characters with special meaning in the query language.
pub fn escape_query_chars(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        if is_special(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Characters that must be backslash-escaped in a term.
fn is_special(c: char) -> bool {
    matches!(
        c,
        '\\' | '+'
            | '-'
            | '!'
            | '('
            | ')'
            | ':'
            | '^'
            | '['
            | ']'
            | '"'
            | '{'
            | '}'
            | '~'
            | '*'
            | '?'
            | '|'
            | '&'
            | ';'
            | '/'
    ) || c.is_whitespace()
}

/// Wraps a value in double quotes, escaping embedded quotes and backslashes.
pub(crate) fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Rejects blank field names.
fn require_field(field: &str) -> Result<(), QueryError> {
    if field.trim().is_empty() {
        return Err(QueryError::invalid_argument("field name must not be blank").with_context(field));
    }
    Ok(())
}
