//! Search tree model and Solr query compilation.
//!
//! A search arrives as a tree of conditions and rules:
//!
//! - **Rules**: `field` / `operation` / `values` leaves, e.g. `title does_not_end_with 123`
//! - **Conditions**: `AND` / `OR` junctions over child nodes
//!
//! [`QueryCompiler`] walks the tree and renders each rule with the first applicable
//! [`SearchOperation`] from an [`OperationRegistry`], producing Lucene-style query text.
//! Fragments that do not come from a tree (batched identifier lists, date range filters,
//! basic search arguments) have their own builders.
//!
//! # Example
//!
//! ```
//! use solrq_query::{Condition, Rule, compile};
//!
//! let tree = Condition::and(vec![
//!     Rule::new("type", "equals").with_values(["case"]).into(),
//!     Rule::new("title", "does_not_end_with").with_values(["123", "abc"]).into(),
//! ]);
//! assert_eq!(
//!     compile(&tree.into()),
//!     "type:(case) AND -(title:(*123) OR title:(*abc))"
//! );
//! ```

#![warn(missing_docs)]

mod basic;
mod compile;
mod error;
mod helpers;
mod operations;
mod registry;
mod string_query;
mod tree;

pub use basic::{BasicSearch, Namespaces};
pub use compile::{CompiledQuery, QueryCompiler, UnmatchedPolicy, UnmatchedRule, compile};
pub use error::{QueryError, QueryErrorKind};
pub use helpers::{
    DateRange, QUERY_DEFAULT_ALL, SOLR_DATE_FORMAT, URI_BATCH_SIZE, build_date_range_filter_query,
    build_uri_query, build_uri_query_batched, escape_query_chars, format_solr_date,
};
pub use operations::{
    DEFAULT_ORDER, ExistenceOperation, MatchOperation, RangeBounds, RangeOperation,
    SearchOperation, Wildcard, builtin_operations,
};
pub use registry::{OperationRegistry, RegistryBuilder, default_registry};
pub use string_query::{StringQuery, parse_string_query};
pub use tree::{Condition, Junction, NodeType, Rule, SearchTreeNode};
