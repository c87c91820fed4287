//! Search criteria tree.
//!
//! A search is described as a tree of [`Condition`] branches and [`Rule`] leaves. Trees arrive
//! from the request layer as JSON and are consumed once by the compiler.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{OneOrMany, serde_as};

/// Discriminates the two node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A field/operator/value leaf.
    Rule,
    /// A junction over child nodes.
    Condition,
}

/// Boolean operator joining the children of a [`Condition`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Junction {
    /// All children must match.
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    /// At least one child must match.
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl Junction {
    /// Returns the query-language keyword for this junction.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Junction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the search tree.
///
/// Children are owned by value, so a node always has exactly one parent and the tree can
/// never contain shared or cyclic references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchTreeNode {
    /// Junction over child nodes. Listed first so that any node carrying `rules` is a condition.
    Condition(Condition),
    /// Field/operator/value leaf.
    Rule(Rule),
}

impl SearchTreeNode {
    /// Returns the variant tag of this node.
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Rule(_) => NodeType::Rule,
            Self::Condition(_) => NodeType::Condition,
        }
    }

    /// Returns the caller-assigned identifier, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Rule(rule) => rule.id.as_deref(),
            Self::Condition(condition) => condition.id.as_deref(),
        }
    }

    /// Parses a tree from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Formats the node as an indented outline at the given depth.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Rule(rule) => {
                let operation = rule.operation.as_deref().unwrap_or("<none>");
                writeln!(
                    f,
                    "{prefix}Rule({} {operation} {:?})",
                    rule.field, rule.values
                )
            }
            Self::Condition(condition) => {
                writeln!(f, "{prefix}{}", condition.condition)?;
                for child in &condition.rules {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for SearchTreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

impl From<Rule> for SearchTreeNode {
    fn from(rule: Rule) -> Self {
        Self::Rule(rule)
    }
}

impl From<Condition> for SearchTreeNode {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}

/// A leaf criterion: match `values` in `field` using `operation`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Opaque caller-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Target field in the search index.
    pub field: String,
    /// Declared value type (e.g. `string`, `date`). Advisory only.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    /// Operator identifier such as `equals` or `does_not_end_with`.
    #[serde(default, alias = "operator")]
    pub operation: Option<String>,
    /// Literal values, in emission order.
    #[serde(default, alias = "value")]
    #[serde_as(as = "OneOrMany<_>")]
    pub values: Vec<String>,
}

impl Rule {
    /// Creates a rule with no values.
    pub fn new(field: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operation: Some(operation.into()),
            ..Self::default()
        }
    }

    /// Replaces the rule values.
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the declared value type.
    pub fn with_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns the operation, or `None` when absent.
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }
}

/// A branch joining its children with a single [`Junction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Opaque caller-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Operator placed between every pair of emitted children.
    #[serde(default)]
    pub condition: Junction,
    /// Child nodes in emission order.
    pub rules: Vec<SearchTreeNode>,
}

impl Condition {
    /// Creates a condition with the given junction and children.
    pub fn new(condition: Junction, rules: Vec<SearchTreeNode>) -> Self {
        Self {
            id: None,
            condition,
            rules,
        }
    }

    /// Creates an `AND` condition.
    pub fn and(rules: Vec<SearchTreeNode>) -> Self {
        Self::new(Junction::And, rules)
    }

    /// Creates an `OR` condition.
    pub fn or(rules: Vec<SearchTreeNode>) -> Self {
        Self::new(Junction::Or, rules)
    }

    /// Appends a child, taking ownership of it.
    pub fn push(&mut self, node: impl Into<SearchTreeNode>) -> &mut Self {
        self.rules.push(node.into());
        self
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns true if the condition has no children.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
