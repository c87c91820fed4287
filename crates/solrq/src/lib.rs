//! solrq: search criteria to Solr queries.
//!
//! Search screens describe what a user is looking for as a tree of rules joined by AND/OR
//! conditions. solrq turns such trees, identifier lists, date ranges and basic search forms
//! into Solr query strings, using handlers configured per project in `.solrq.toml`.

#![warn(missing_docs)]

pub mod cli;
