//! Basic search query assembly.
//!
//! The basic search form does not send a search tree. It sends a handful of well-known
//! arguments which are turned into a single conjunctive query.

use std::{borrow::Cow, collections::BTreeMap};

use chrono::NaiveDate;

use crate::{
    error::QueryError,
    helpers::{DateRange, QUERY_DEFAULT_ALL, build_date_range_filter_query, quote},
};

/// Expands prefixed short URIs (`emf:Case`) into full URIs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    /// Prefix -> namespace URI.
    prefixes: BTreeMap<String, String>,
}

impl Namespaces {
    /// Creates an empty resolver that leaves every value unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a prefix.
    pub fn insert(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), uri.into());
    }

    /// Expands `prefix:local` when the prefix is known. Other values are returned as-is.
    pub fn expand<'v>(&self, value: &'v str) -> Cow<'v, str> {
        let Some((prefix, local)) = value.split_once(':') else {
            return Cow::Borrowed(value);
        };
        if local.starts_with("//") {
            return Cow::Borrowed(value);
        }
        match self.prefixes.get(prefix) {
            Some(uri) => Cow::Owned(format!("{uri}{local}")),
            None => Cow::Borrowed(value),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Namespaces {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            prefixes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Arguments of a basic search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicSearch {
    /// Context instances the results must be part of.
    pub location: Vec<String>,
    /// Free text, passed through as a parenthesised sub-query.
    pub meta_text: Option<String>,
    /// Semantic classes of the results.
    pub object_types: Vec<String>,
    /// Definition sub types. Values that look like URIs are treated as semantic classes.
    pub sub_types: Vec<String>,
    /// Mime type. A leading `^` matches it as a substring.
    pub mimetype: Option<String>,
    /// Exact instance identifier.
    pub identifier: Option<String>,
    /// First creation day, inclusive.
    pub created_from: Option<NaiveDate>,
    /// Last creation day, inclusive.
    pub created_to: Option<NaiveDate>,
    /// Creators of the results.
    pub created_by: Vec<String>,
}

impl BasicSearch {
    /// Assembles the query, or `*:*` if no argument is set.
    ///
    /// Fails if the creation range is inverted.
    pub fn build_query(&self, namespaces: &Namespaces) -> Result<String, QueryError> {
        let mut clauses: Vec<String> = Vec::new();

        if !self.location.is_empty() {
            clauses.push(format!(
                "partOfRelation:{}",
                join_arguments(&self.location, Some(namespaces))
            ));
        }
        if let Some(text) = non_blank(self.meta_text.as_deref()) {
            clauses.push(format!("({text})"));
        }
        if let Some(types) = self.types_clause(namespaces) {
            clauses.push(types);
        }
        if let Some(mimetype) = non_blank(self.mimetype.as_deref()) {
            let mimetype = match mimetype.strip_prefix('^') {
                Some(rest) => format!("*{rest}*"),
                None => mimetype.to_string(),
            };
            clauses.push(format!("mimetype:\"{mimetype}\""));
        }
        if let Some(identifier) = non_blank(self.identifier.as_deref()) {
            clauses.push(format!("identifier:\"{}\"", namespaces.expand(identifier)));
        }
        if let Some(range) = self.created_range() {
            clauses.push(build_date_range_filter_query("createdOn", Some(&range))?);
        }
        if !self.created_by.is_empty() {
            clauses.push(format!(
                "createdBy:{}",
                join_arguments(&self.created_by, Some(namespaces))
            ));
        }

        if clauses.is_empty() {
            return Ok(QUERY_DEFAULT_ALL.to_string());
        }
        Ok(clauses.join(" AND "))
    }

    /// Builds `( type:(...) OR rdfType:(...) )` from object and sub types.
    fn types_clause(&self, namespaces: &Namespaces) -> Option<String> {
        let mut rdf_types: Vec<String> = Vec::new();
        let mut sub_types: Vec<String> = Vec::new();

        for object_type in &self.object_types {
            push_unique(&mut rdf_types, object_type);
        }
        for sub_type in &self.sub_types {
            if sub_type.find(':').is_some_and(|pos| pos > 0) {
                push_unique(&mut rdf_types, sub_type);
            } else {
                push_unique(&mut sub_types, sub_type);
            }
        }

        if rdf_types.is_empty() && sub_types.is_empty() {
            return None;
        }

        let mut clause = String::from("( ");
        if !sub_types.is_empty() {
            clause.push_str("type:");
            clause.push_str(&join_arguments(&sub_types, None));
        }
        if !rdf_types.is_empty() {
            if !sub_types.is_empty() {
                clause.push_str(" OR ");
            }
            clause.push_str("rdfType:");
            clause.push_str(&join_arguments(&rdf_types, Some(namespaces)));
        }
        clause.push_str(" )");
        Some(clause)
    }

    /// Creation range from the start of the first day to the end of the last, in UTC.
    fn created_range(&self) -> Option<DateRange> {
        if self.created_from.is_none() && self.created_to.is_none() {
            return None;
        }
        let from = self
            .created_from
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|start| start.and_utc());
        let to = self
            .created_to
            .and_then(|day| day.and_hms_opt(23, 59, 59))
            .map(|end| end.and_utc());
        Some(DateRange::new(from, to))
    }
}

/// Renders `( "a" OR "b" )`, expanding namespaces when a resolver is given.
fn join_arguments(values: &[String], namespaces: Option<&Namespaces>) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|value| match namespaces {
            Some(ns) => quote(&ns.expand(value)),
            None => quote(value),
        })
        .collect();
    format!("( {} )", quoted.join(" OR "))
}

/// Appends `value` unless already present.
fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}

/// Returns the trimmed value if it is not blank.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
