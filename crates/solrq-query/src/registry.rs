//! Operation registry.
//!
//! Holds the set of [`SearchOperation`]s consulted for each rule, ordered by explicit rank.
//! The registry is assembled once through [`RegistryBuilder`] and is read-only afterwards,
//! so a single instance can be shared between threads.

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    sync::LazyLock,
};

use tracing::debug;

use crate::{
    error::QueryError,
    helpers::escape_query_chars,
    operations::{SearchOperation, builtin_operations},
    tree::Rule,
};

/// Process-wide registry of the built-in operations.
static DEFAULT_REGISTRY: LazyLock<OperationRegistry> = LazyLock::new(|| {
    RegistryBuilder::with_builtins()
        .build()
        .expect("built-in operations claim distinct operators")
});

/// Returns the shared registry of built-in operations.
pub fn default_registry() -> &'static OperationRegistry {
    &DEFAULT_REGISTRY
}

/// An immutable, ordered collection of search operations.
pub struct OperationRegistry {
    /// Operations sorted by rank, ties in registration order.
    operations: Vec<Box<dyn SearchOperation>>,
    /// Alias operator -> (index into `operations`, target operator).
    aliases: HashMap<String, (usize, String)>,
    /// Whether rule values are escaped before rendering.
    escape_values: bool,
}

impl OperationRegistry {
    /// Returns the first operation applicable to `rule`.
    ///
    /// Operations are consulted in rank order; aliases are checked last.
    pub fn find(&self, rule: &Rule) -> Option<&dyn SearchOperation> {
        if let Some(op) = self.operations.iter().find(|op| op.is_applicable(rule)) {
            return Some(&**op);
        }
        let operator = rule.operation()?;
        self.aliases
            .get(operator)
            .map(|(index, _)| &*self.operations[*index])
    }

    /// Renders `rule` into `out` using the applicable operation.
    ///
    /// Returns `false` if no operation handles the rule, in which case nothing is written.
    pub fn build_into(&self, out: &mut String, rule: &Rule) -> bool {
        let Some(op) = self.find(rule) else {
            return false;
        };

        // Blank values stay blank so the operation still drops them.
        let rule = if self.escape_values && op.takes_escaped_values() {
            Cow::Owned(Rule {
                values: rule
                    .values
                    .iter()
                    .map(|v| {
                        if v.trim().is_empty() {
                            v.clone()
                        } else {
                            escape_query_chars(v)
                        }
                    })
                    .collect(),
                ..rule.clone()
            })
        } else {
            Cow::Borrowed(rule)
        };

        op.build_operation(out, &rule);
        true
    }

    /// Iterates the operations in consultation order.
    pub fn operations(&self) -> impl Iterator<Item = &dyn SearchOperation> {
        self.operations.iter().map(|op| &**op)
    }

    /// Returns `(alias, target)` pairs sorted by alias.
    pub fn aliases(&self) -> Vec<(&str, &str)> {
        let mut aliases: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(alias, (_, target))| (alias.as_str(), target.as_str()))
            .collect();
        aliases.sort_unstable();
        aliases
    }

    /// Returns true if rule values are escaped before rendering.
    pub fn escapes_values(&self) -> bool {
        self.escape_values
    }

    /// Returns the number of registered operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if no operations are registered.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Assembles an [`OperationRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    /// Registered operations in registration order.
    operations: Vec<Box<dyn SearchOperation>>,
    /// Alias -> target operator, in insertion order.
    aliases: Vec<(String, String)>,
    /// Whether rule values are escaped before rendering.
    escape_values: bool,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-loaded with the built-in operations.
    pub fn with_builtins() -> Self {
        Self {
            operations: builtin_operations(),
            ..Self::default()
        }
    }

    /// Adds an operation.
    pub fn register(mut self, operation: impl SearchOperation + 'static) -> Self {
        self.operations.push(Box::new(operation));
        self
    }

    /// Makes `alias` render like `target`, an operator claimed by some operation.
    pub fn alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.push((alias.into(), target.into()));
        self
    }

    /// Adds several aliases.
    pub fn aliases<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.aliases
            .extend(aliases.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets whether rule values are escaped before rendering.
    pub fn escape_values(mut self, escape: bool) -> Self {
        self.escape_values = escape;
        self
    }

    /// Validates the operator claims and freezes the registry.
    ///
    /// Fails if two operations, or an alias and an operation, claim the same operator, or
    /// if an alias targets an operator nobody claims.
    pub fn build(self) -> Result<OperationRegistry, QueryError> {
        let mut operations = self.operations;
        operations.sort_by_key(|op| op.order());

        let mut claims: BTreeMap<&str, usize> = BTreeMap::new();
        for (index, op) in operations.iter().enumerate() {
            for operator in op.operators() {
                if let Some(&first) = claims.get(operator) {
                    return Err(QueryError::duplicate(
                        *operator,
                        operations[first].name(),
                        op.name(),
                    ));
                }
                claims.insert(*operator, index);
            }
        }

        let mut aliases: HashMap<String, (usize, String)> = HashMap::new();
        for (alias, target) in self.aliases {
            if let Some(&owner) = claims.get(alias.as_str()) {
                return Err(QueryError::duplicate(
                    alias,
                    operations[owner].name(),
                    format!("alias for '{target}'"),
                ));
            }
            if let Some((_, existing)) = aliases.get(&alias) {
                return Err(QueryError::duplicate(
                    alias.as_str(),
                    format!("alias for '{existing}'"),
                    format!("alias for '{target}'"),
                ));
            }
            let Some(&index) = claims.get(target.as_str()) else {
                return Err(QueryError::unknown_operator(alias, target));
            };
            aliases.insert(alias, (index, target));
        }

        debug!(
            operations = operations.len(),
            aliases = aliases.len(),
            escape_values = self.escape_values,
            "built operation registry"
        );

        Ok(OperationRegistry {
            operations,
            aliases,
            escape_values: self.escape_values,
        })
    }
}
