//! Query compiler.
//!
//! Walks a search tree and renders it into query text. Rules are rendered by the first
//! applicable operation in the registry; conditions join their non-empty children with their
//! junction and are parenthesised when nested.

use std::{fmt, str::FromStr};

use tracing::{debug, warn};

use crate::{
    error::QueryError,
    registry::{OperationRegistry, default_registry},
    tree::{Condition, Rule, SearchTreeNode},
};

/// What to do with a rule whose operator no operation handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnmatchedPolicy {
    /// Drop the rule and record it in [`CompiledQuery::unmatched`].
    #[default]
    Skip,
    /// As `Skip`, and also log a warning.
    Warn,
    /// Abort compilation.
    Error,
}

impl UnmatchedPolicy {
    /// All policies, for help text and validation.
    pub const ALL: [Self; 3] = [Self::Skip, Self::Warn, Self::Error];

    /// Returns the configuration name of the policy.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for UnmatchedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnmatchedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown unmatched policy '{s}' (expected skip, warn or error)"))
    }
}

/// A rule that contributed nothing because no operation handles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedRule {
    /// Identifier of the rule, if it had one.
    pub id: Option<String>,
    /// Field of the rule.
    pub field: String,
    /// Operator of the rule, if it had one.
    pub operation: Option<String>,
}

impl From<&Rule> for UnmatchedRule {
    fn from(rule: &Rule) -> Self {
        Self {
            id: rule.id.clone(),
            field: rule.field.clone(),
            operation: rule.operation.clone(),
        }
    }
}

impl fmt::Display for UnmatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation = self.operation.as_deref().unwrap_or("<none>");
        match &self.id {
            Some(id) => write!(f, "{} {operation} (rule {id})", self.field),
            None => write!(f, "{} {operation}", self.field),
        }
    }
}

/// Result of compiling a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledQuery {
    /// Query text. Empty if nothing matched.
    pub query: String,
    /// Rules that were skipped, in tree order.
    pub unmatched: Vec<UnmatchedRule>,
}

impl CompiledQuery {
    /// Returns true if the compiled query text is empty.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }
}

/// Compiles search trees against an operation registry.
#[derive(Clone, Copy)]
pub struct QueryCompiler<'a> {
    /// Operations used to render rules.
    registry: &'a OperationRegistry,
    /// Handling of rules no operation claims.
    unmatched: UnmatchedPolicy,
}

impl<'a> QueryCompiler<'a> {
    /// Creates a compiler that skips unmatched rules.
    pub fn new(registry: &'a OperationRegistry) -> Self {
        Self {
            registry,
            unmatched: UnmatchedPolicy::Skip,
        }
    }

    /// Sets the unmatched-rule policy.
    pub fn unmatched(mut self, policy: UnmatchedPolicy) -> Self {
        self.unmatched = policy;
        self
    }

    /// Compiles `node` into query text.
    ///
    /// The top-level result is never wrapped in parentheses. Fails only under
    /// [`UnmatchedPolicy::Error`].
    pub fn compile(&self, node: &SearchTreeNode) -> Result<CompiledQuery, QueryError> {
        let mut unmatched = Vec::new();
        let query = self.render(node, false, &mut unmatched)?;
        Ok(CompiledQuery { query, unmatched })
    }

    /// Renders a node, parenthesising non-empty nested conditions.
    fn render(
        &self,
        node: &SearchTreeNode,
        nested: bool,
        unmatched: &mut Vec<UnmatchedRule>,
    ) -> Result<String, QueryError> {
        match node {
            SearchTreeNode::Rule(rule) => self.render_rule(rule, unmatched),
            SearchTreeNode::Condition(condition) => {
                self.render_condition(condition, nested, unmatched)
            }
        }
    }

    /// Renders a rule through the registry.
    fn render_rule(
        &self,
        rule: &Rule,
        unmatched: &mut Vec<UnmatchedRule>,
    ) -> Result<String, QueryError> {
        let mut out = String::new();
        if self.registry.build_into(&mut out, rule) {
            return Ok(out);
        }

        let operation = rule.operation();
        match self.unmatched {
            UnmatchedPolicy::Error => {
                return Err(QueryError::unmatched(operation, rule.field.as_str()));
            }
            UnmatchedPolicy::Warn => {
                warn!(field = %rule.field, operation = ?operation, "skipping rule with unhandled operator");
            }
            UnmatchedPolicy::Skip => {
                debug!(field = %rule.field, operation = ?operation, "skipping rule with unhandled operator");
            }
        }
        unmatched.push(UnmatchedRule::from(rule));
        Ok(out)
    }

    /// Joins the non-empty children of a condition.
    fn render_condition(
        &self,
        condition: &Condition,
        nested: bool,
        unmatched: &mut Vec<UnmatchedRule>,
    ) -> Result<String, QueryError> {
        let mut parts = Vec::with_capacity(condition.rules.len());
        for child in &condition.rules {
            let fragment = self.render(child, true, unmatched)?;
            if !fragment.is_empty() {
                parts.push(fragment);
            }
        }

        if parts.is_empty() {
            return Ok(String::new());
        }

        let joined = parts.join(&format!(" {} ", condition.condition));
        if nested {
            Ok(format!("({joined})"))
        } else {
            Ok(joined)
        }
    }
}

/// Compiles `node` with the built-in operations, skipping unmatched rules.
pub fn compile(node: &SearchTreeNode) -> String {
    QueryCompiler::new(default_registry())
        .compile(node)
        .map(|compiled| compiled.query)
        // The skip policy never fails.
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::QueryErrorKind, registry::RegistryBuilder, tree::Junction};

    fn rule(field: &str, op: &str, values: &[&str]) -> SearchTreeNode {
        Rule::new(field, op).with_values(values.iter().copied()).into()
    }

    #[test]
    fn single_rule_is_unwrapped() {
        let tree = rule("title", "does_not_end_with", &["123"]);
        assert_eq!(compile(&tree), "-(title:(*123))");
    }

    #[test]
    fn top_level_condition_joins_children() {
        let tree: SearchTreeNode = Condition::and(vec![
            rule("type", "equals", &["case"]),
            rule("status", "not_in", &["DELETED"]),
        ])
        .into();
        assert_eq!(compile(&tree), "type:(case) AND -(status:(DELETED))");
    }

    #[test]
    fn nested_conditions_are_parenthesised() {
        let tree: SearchTreeNode = Condition::or(vec![
            rule("title", "contains", &["report"]),
            Condition::and(vec![
                rule("type", "equals", &["case"]),
                rule("createdBy", "in", &["emf:admin", "emf:user"]),
            ])
            .into(),
        ])
        .into();
        assert_eq!(
            compile(&tree),
            "title:(*report*) OR (type:(case) AND (createdBy:(emf:admin) OR createdBy:(emf:user)))"
        );
    }

    #[test]
    fn empty_conditions_are_elided() {
        let tree: SearchTreeNode = Condition::and(vec![
            Condition::or(vec![]).into(),
            rule("type", "equals", &["case"]),
            Condition::or(vec![rule("title", "equals", &[])]).into(),
        ])
        .into();
        assert_eq!(compile(&tree), "type:(case)");
    }

    #[test]
    fn empty_tree_compiles_to_empty_string() {
        let tree: SearchTreeNode = Condition::and(vec![]).into();
        let compiled = QueryCompiler::new(default_registry()).compile(&tree).unwrap();
        assert!(compiled.is_empty());
        assert!(compiled.unmatched.is_empty());
    }

    #[test]
    fn unmatched_rules_are_skipped_and_recorded() {
        let tree: SearchTreeNode = Condition::new(
            Junction::Or,
            vec![
                Rule::new("title", "sounds_like")
                    .with_values(["x"])
                    .with_id("r1")
                    .into(),
                rule("type", "equals", &["case"]),
                Rule {
                    field: "status".into(),
                    ..Rule::default()
                }
                .into(),
            ],
        )
        .into();

        let compiled = QueryCompiler::new(default_registry())
            .unmatched(UnmatchedPolicy::Warn)
            .compile(&tree)
            .unwrap();
        assert_eq!(compiled.query, "type:(case)");
        assert_eq!(compiled.unmatched.len(), 2);
        assert_eq!(compiled.unmatched[0].id.as_deref(), Some("r1"));
        assert_eq!(compiled.unmatched[0].to_string(), "title sounds_like (rule r1)");
        assert_eq!(compiled.unmatched[1].operation, None);
    }

    #[test]
    fn error_policy_rejects_unmatched() {
        let tree = rule("title", "sounds_like", &["x"]);
        let err = QueryCompiler::new(default_registry())
            .unmatched(UnmatchedPolicy::Error)
            .compile(&tree)
            .unwrap_err();
        assert!(matches!(
            err.kind,
            QueryErrorKind::UnmatchedOperator { ref field, .. } if field == "title"
        ));
    }

    #[test]
    fn compiling_twice_is_identical() {
        let tree: SearchTreeNode = Condition::or(vec![
            rule("title", "starts_with", &["a", "b"]),
            Condition::and(vec![rule("size", "between", &["1", "5"])]).into(),
        ])
        .into();
        let first = compile(&tree);
        let second = compile(&tree);
        assert_eq!(first, second);
        assert_eq!(first, "(title:(a*) OR title:(b*)) OR (size:[1 TO 5])");
    }

    #[test]
    fn custom_registry_with_alias() {
        let registry = RegistryBuilder::with_builtins()
            .alias("is_not", "does_not_equal")
            .build()
            .unwrap();
        let tree = rule("status", "is_not", &["DRAFT"]);
        let compiled = QueryCompiler::new(&registry).compile(&tree).unwrap();
        assert_eq!(compiled.query, "-(status:(DRAFT))");
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("warn".parse::<UnmatchedPolicy>(), Ok(UnmatchedPolicy::Warn));
        assert_eq!("ERROR".parse::<UnmatchedPolicy>(), Ok(UnmatchedPolicy::Error));
        assert!("loud".parse::<UnmatchedPolicy>().is_err());
        assert_eq!(UnmatchedPolicy::default().to_string(), "skip");
    }
}
