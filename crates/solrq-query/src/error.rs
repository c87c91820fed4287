//! Error types for query compilation and the helper builders.

use std::{error::Error, fmt};

/// A unified error type for query construction.
///
/// Carries the kind of failure plus, where available, the input that caused it so the
/// message can point at the problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The offending input (query text, field name), if available.
    pub context: Option<String>,
}

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// A caller supplied an argument the builder cannot use.
    InvalidArgument {
        /// Error message.
        message: String,
    },
    /// A rule operator matched no registered operation.
    UnmatchedOperator {
        /// The operator string, or `None` if the rule had none.
        operator: Option<String>,
        /// Field of the rule.
        field: String,
    },
    /// Two operations claim the same operator string.
    DuplicateOperator {
        /// The contested operator.
        operator: String,
        /// Operation registered first.
        first: String,
        /// Operation that tried to claim it again.
        second: String,
    },
    /// An alias targets an operator that no operation claims.
    UnknownOperator {
        /// The alias being defined.
        alias: String,
        /// The missing target.
        target: String,
    },
    /// A string query could not be split.
    Parse {
        /// Error message.
        message: String,
        /// Byte position in the input.
        position: Option<usize>,
    },
}

impl QueryError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::InvalidArgument {
                message: message.into(),
            },
            context: None,
        }
    }

    /// Creates an unmatched operator error.
    pub fn unmatched(operator: Option<&str>, field: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::UnmatchedOperator {
                operator: operator.map(str::to_string),
                field: field.into(),
            },
            context: None,
        }
    }

    /// Creates a duplicate operator error.
    pub fn duplicate(
        operator: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self {
            kind: QueryErrorKind::DuplicateOperator {
                operator: operator.into(),
                first: first.into(),
                second: second.into(),
            },
            context: None,
        }
    }

    /// Creates an unknown operator error for an alias.
    pub fn unknown_operator(alias: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::UnknownOperator {
                alias: alias.into(),
                target: target.into(),
            },
            context: None,
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>, position: Option<usize>, query: &str) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: message.into(),
                position,
            },
            context: Some(query.to_string()),
        }
    }

    /// Sets the context string for this error.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Returns true for caller errors that should be reported as invalid arguments.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind, QueryErrorKind::InvalidArgument { .. })
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        match &self.kind {
            QueryErrorKind::InvalidArgument { message } | QueryErrorKind::Parse { message, .. } => {
                message.clone()
            }
            QueryErrorKind::UnmatchedOperator { operator, field } => match operator {
                Some(op) => format!("no operation handles operator '{op}' on field '{field}'"),
                None => format!("rule on field '{field}' has no operator"),
            },
            QueryErrorKind::DuplicateOperator {
                operator,
                first,
                second,
            } => format!("operator '{operator}' is claimed by both {first} and {second}"),
            QueryErrorKind::UnknownOperator { alias, target } => {
                format!("alias '{alias}' targets unknown operator '{target}'")
            }
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match &self.kind {
            QueryErrorKind::UnmatchedOperator { .. } => {
                Some("Run 'solrq operators' to list supported operators, or add an alias")
            }
            QueryErrorKind::DuplicateOperator { .. } => {
                Some("Each operator string may be claimed by exactly one operation")
            }
            QueryErrorKind::Parse { message, .. } if message.contains("closing '|'") => {
                Some("Nested parameters are written as |{\"key\":\"value\"}|query")
            }
            QueryErrorKind::InvalidArgument { message } if message.contains("range") => {
                Some("The lower bound of a range must not be after the upper bound")
            }
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match &self.kind {
            QueryErrorKind::Parse { .. } => "query syntax error",
            QueryErrorKind::InvalidArgument { .. } => "invalid argument",
            _ => "query error",
        };
        write!(f, "{prefix}: {}", self.message())?;

        if let Some(context) = &self.context {
            write!(f, "\n  {context}")?;
            if let QueryErrorKind::Parse {
                position: Some(pos),
                ..
            } = &self.kind
            {
                let clamped = (*pos).min(context.len());
                write!(f, "\n  {}^", " ".repeat(clamped))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "\nhint: {suggestion}")?;
        }

        Ok(())
    }
}

impl Error for QueryError {}
