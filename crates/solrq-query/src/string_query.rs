//! String query splitting.
//!
//! A raw string query may carry extra request parameters in front of the query text:
//!
//! ```text
//! |{"fq":"status:APPROVED","defType":"edismax"}|title:report
//! ```
//!
//! The JSON object between the two `|` characters holds string-valued parameters; everything
//! after the closing `|` is the query.

use serde_json::{Map, Value};

use crate::{error::QueryError, helpers::QUERY_DEFAULT_ALL};

/// Delimiter around the nested parameter object.
const NESTED_DELIMITER: char = '|';

/// A query split into text and extra parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringQuery {
    /// Query text; `*:*` when the input has none.
    pub query: String,
    /// Extra request parameters, ordered by key.
    pub params: Vec<(String, String)>,
}

/// Splits a raw string query into parameters and query text.
pub fn parse_string_query(input: &str) -> Result<StringQuery, QueryError> {
    if input.trim().is_empty() {
        return Ok(default_query(Vec::new()));
    }

    let Some(rest) = input.strip_prefix(NESTED_DELIMITER) else {
        return Ok(StringQuery {
            query: input.to_string(),
            params: Vec::new(),
        });
    };

    let Some(end) = rest.find(NESTED_DELIMITER) else {
        return Err(QueryError::parse(
            "missing closing '|' after nested parameters",
            Some(0),
            input,
        ));
    };

    let nested = &rest[..end];
    let query = &rest[end + 1..];
    let params = parse_params(nested, input)?;

    if query.trim().is_empty() {
        return Ok(default_query(params));
    }
    Ok(StringQuery {
        query: query.to_string(),
        params,
    })
}

/// Parses the nested JSON object into string pairs.
fn parse_params(nested: &str, input: &str) -> Result<Vec<(String, String)>, QueryError> {
    let object: Map<String, Value> = serde_json::from_str(nested).map_err(|err| {
        let position = (err.line() == 1).then(|| err.column().max(1));
        QueryError::parse(format!("invalid nested parameters: {err}"), position, input)
    })?;

    object
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key, s)),
            other => Err(QueryError::parse(
                format!("nested parameter '{key}' must be a string, got {other}"),
                value_position(nested, &key),
                input,
            )),
        })
        .collect()
}

/// Returns the offset in the full input of the value stored under `key`.
fn value_position(nested: &str, key: &str) -> Option<usize> {
    let quoted = serde_json::to_string(key).ok()?;
    let key_end = nested.find(&quoted)? + quoted.len();
    let after_key = &nested[key_end..];
    let colon = after_key.find(':')?;
    let value = &after_key[colon + 1..];
    let padding = value.len() - value.trim_start().len();
    Some(NESTED_DELIMITER.len_utf8() + key_end + colon + 1 + padding)
}

/// Returns the match-everything query with the given parameters.
fn default_query(params: Vec<(String, String)>) -> StringQuery {
    StringQuery {
        query: QUERY_DEFAULT_ALL.to_string(),
        params,
    }
}
