//! Search operations.
//!
//! Each operation owns one or more operator strings and renders a [`Rule`] carrying one of
//! them into a query fragment. Operations are stateless and shared read-only through the
//! [`OperationRegistry`](crate::OperationRegistry).

use crate::tree::Rule;

/// Default ordering rank for operations that do not declare one.
pub const DEFAULT_ORDER: i32 = 100;

/// A handler that renders rules with particular operators.
pub trait SearchOperation: Send + Sync {
    /// Short display name used in diagnostics.
    fn name(&self) -> &str;

    /// Operator strings this operation claims. Matched exactly.
    fn operators(&self) -> &[&str];

    /// Rank within the registry. Lower ranks are consulted first.
    fn order(&self) -> i32 {
        DEFAULT_ORDER
    }

    /// Returns true if this operation renders `rule`.
    ///
    /// A rule without an operation is never applicable.
    fn is_applicable(&self, rule: &Rule) -> bool {
        rule.operation()
            .is_some_and(|op| self.operators().contains(&op))
    }

    /// Returns true if rule values are plain terms that the registry may escape.
    ///
    /// Operations whose values are query syntax, such as range bounds with `*` or date
    /// math, return false.
    fn takes_escaped_values(&self) -> bool {
        true
    }

    /// Appends the fragment for `rule` to `out`.
    ///
    /// Appends nothing when the rule carries no usable values.
    fn build_operation(&self, out: &mut String, rule: &Rule);
}

/// Where wildcards are placed around a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wildcard {
    /// `value`
    None,
    /// `value*`
    Suffix,
    /// `*value`
    Prefix,
    /// `*value*`
    Both,
}

impl Wildcard {
    /// Writes `value` with the wildcard pattern applied.
    fn write(self, out: &mut String, value: &str) {
        if matches!(self, Self::Prefix | Self::Both) {
            out.push('*');
        }
        out.push_str(value);
        if matches!(self, Self::Suffix | Self::Both) {
            out.push('*');
        }
    }
}

/// A value-matching operation: one `field:(value)` clause per value.
///
/// Positive operations emit `field:(v)` for a single value and `(field:(v1) OR field:(v2))`
/// for several. Negated operations always emit `-(field:(v1) OR ...)`.
#[derive(Debug, Clone, Copy)]
pub struct MatchOperation {
    /// Display name.
    name: &'static str,
    /// Claimed operators.
    operators: &'static [&'static str],
    /// Registry rank.
    order: i32,
    /// Whether the whole group is negated.
    negated: bool,
    /// Wildcard placement for each value.
    wildcard: Wildcard,
}

impl MatchOperation {
    /// `equals`, `in`
    pub const EQUALS: Self = Self::new("Equals", &["equals", "in"], 10, false, Wildcard::None);
    /// `does_not_equal`, `not_in`
    pub const DOES_NOT_EQUAL: Self = Self::new(
        "DoesNotEqual",
        &["does_not_equal", "not_in"],
        20,
        true,
        Wildcard::None,
    );
    /// `contains`
    pub const CONTAINS: Self = Self::new("Contains", &["contains"], 30, false, Wildcard::Both);
    /// `does_not_contain`
    pub const DOES_NOT_CONTAIN: Self = Self::new(
        "DoesNotContain",
        &["does_not_contain"],
        40,
        true,
        Wildcard::Both,
    );
    /// `starts_with`
    pub const STARTS_WITH: Self =
        Self::new("StartsWith", &["starts_with"], 50, false, Wildcard::Suffix);
    /// `does_not_start_with`
    pub const DOES_NOT_START_WITH: Self = Self::new(
        "DoesNotStartWith",
        &["does_not_start_with"],
        60,
        true,
        Wildcard::Suffix,
    );
    /// `ends_with`
    pub const ENDS_WITH: Self = Self::new("EndsWith", &["ends_with"], 70, false, Wildcard::Prefix);
    /// `does_not_end_with`
    pub const DOES_NOT_END_WITH: Self = Self::new(
        "DoesNotEndWith",
        &["does_not_end_with"],
        80,
        true,
        Wildcard::Prefix,
    );

    /// Creates a match operation.
    pub const fn new(
        name: &'static str,
        operators: &'static [&'static str],
        order: i32,
        negated: bool,
        wildcard: Wildcard,
    ) -> Self {
        Self {
            name,
            operators,
            order,
            negated,
            wildcard,
        }
    }

    /// Returns true if the rendered group is negated.
    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl SearchOperation for MatchOperation {
    fn name(&self) -> &str {
        self.name
    }

    fn operators(&self) -> &[&str] {
        self.operators
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn build_operation(&self, out: &mut String, rule: &Rule) {
        let values: Vec<&str> = usable_values(rule).collect();
        if values.is_empty() {
            return;
        }

        let grouped = self.negated || values.len() > 1;
        if self.negated {
            out.push('-');
        }
        if grouped {
            out.push('(');
        }
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                out.push_str(" OR ");
            }
            out.push_str(&rule.field);
            out.push_str(":(");
            self.wildcard.write(out, value);
            out.push(')');
        }
        if grouped {
            out.push(')');
        }
    }
}

/// Which bounds of a range come from the rule values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBounds {
    /// First value is the lower bound, second the upper.
    Between,
    /// First value is the lower bound, upper is open.
    From,
    /// First value is the upper bound, lower is open.
    To,
}

/// A range operation: `field:[from TO to]`, with `*` for open bounds.
#[derive(Debug, Clone, Copy)]
pub struct RangeOperation {
    /// Display name.
    name: &'static str,
    /// Claimed operators.
    operators: &'static [&'static str],
    /// Registry rank.
    order: i32,
    /// Bound layout.
    bounds: RangeBounds,
}

impl RangeOperation {
    /// `between`, `range`
    pub const BETWEEN: Self = Self {
        name: "Range",
        operators: &["between", "range"],
        order: 90,
        bounds: RangeBounds::Between,
    };
    /// `after`, `greater_than_or_equal`
    pub const AFTER: Self = Self {
        name: "After",
        operators: &["after", "greater_than_or_equal"],
        order: 100,
        bounds: RangeBounds::From,
    };
    /// `before`, `less_than_or_equal`
    pub const BEFORE: Self = Self {
        name: "Before",
        operators: &["before", "less_than_or_equal"],
        order: 110,
        bounds: RangeBounds::To,
    };
}

impl SearchOperation for RangeOperation {
    fn name(&self) -> &str {
        self.name
    }

    fn operators(&self) -> &[&str] {
        self.operators
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn takes_escaped_values(&self) -> bool {
        false
    }

    fn build_operation(&self, out: &mut String, rule: &Rule) {
        let bound = |index: usize| {
            rule.values
                .get(index)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let (from, to) = match self.bounds {
            RangeBounds::Between => (bound(0), bound(1)),
            RangeBounds::From => (bound(0), None),
            RangeBounds::To => (None, bound(0)),
        };
        if from.is_none() && to.is_none() {
            return;
        }

        out.push_str(&rule.field);
        out.push_str(":[");
        out.push_str(from.unwrap_or("*"));
        out.push_str(" TO ");
        out.push_str(to.unwrap_or("*"));
        out.push(']');
    }
}

/// Field existence: `field:*` or `-field:*`. Values are ignored.
#[derive(Debug, Clone, Copy)]
pub struct ExistenceOperation {
    /// Display name.
    name: &'static str,
    /// Claimed operators.
    operators: &'static [&'static str],
    /// Registry rank.
    order: i32,
    /// True to match documents without the field.
    missing: bool,
}

impl ExistenceOperation {
    /// `not_empty`, `exists`
    pub const EXISTS: Self = Self {
        name: "Exists",
        operators: &["not_empty", "exists"],
        order: 120,
        missing: false,
    };
    /// `empty`, `not_exists`
    pub const MISSING: Self = Self {
        name: "Missing",
        operators: &["empty", "not_exists"],
        order: 130,
        missing: true,
    };
}

impl SearchOperation for ExistenceOperation {
    fn name(&self) -> &str {
        self.name
    }

    fn operators(&self) -> &[&str] {
        self.operators
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn takes_escaped_values(&self) -> bool {
        false
    }

    fn build_operation(&self, out: &mut String, rule: &Rule) {
        if self.missing {
            out.push('-');
        }
        out.push_str(&rule.field);
        out.push_str(":*");
    }
}

/// Returns the built-in operations in registration order.
pub fn builtin_operations() -> Vec<Box<dyn SearchOperation>> {
    vec![
        Box::new(MatchOperation::EQUALS),
        Box::new(MatchOperation::DOES_NOT_EQUAL),
        Box::new(MatchOperation::CONTAINS),
        Box::new(MatchOperation::DOES_NOT_CONTAIN),
        Box::new(MatchOperation::STARTS_WITH),
        Box::new(MatchOperation::DOES_NOT_START_WITH),
        Box::new(MatchOperation::ENDS_WITH),
        Box::new(MatchOperation::DOES_NOT_END_WITH),
        Box::new(RangeOperation::BETWEEN),
        Box::new(RangeOperation::AFTER),
        Box::new(RangeOperation::BEFORE),
        Box::new(ExistenceOperation::EXISTS),
        Box::new(ExistenceOperation::MISSING),
    ]
}

/// Non-blank rule values in order.
fn usable_values(rule: &Rule) -> impl Iterator<Item = &str> {
    rule.values
        .iter()
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(op: &dyn SearchOperation, rule: &Rule) -> String {
        let mut out = String::new();
        op.build_operation(&mut out, rule);
        out
    }

    #[test]
    fn does_not_end_with_single_value() {
        let rule = Rule::new("title", "does_not_end_with").with_values(["123"]);
        assert_eq!(render(&MatchOperation::DOES_NOT_END_WITH, &rule), "-(title:(*123))");
    }

    #[test]
    fn does_not_end_with_multiple_values() {
        let rule = Rule::new("title", "does_not_end_with").with_values(["123", "abc"]);
        assert_eq!(
            render(&MatchOperation::DOES_NOT_END_WITH, &rule),
            "-(title:(*123) OR title:(*abc))"
        );
    }

    #[test]
    fn does_not_equal_claims_both_operators() {
        let op = MatchOperation::DOES_NOT_EQUAL;
        assert!(op.is_applicable(&Rule::new("status", "does_not_equal")));
        assert!(op.is_applicable(&Rule::new("status", "not_in")));
        assert!(!op.is_applicable(&Rule::new("status", "equals")));
    }

    #[test]
    fn missing_operation_is_never_applicable() {
        let rule = Rule {
            field: "title".into(),
            ..Rule::default()
        };
        for op in builtin_operations() {
            assert!(!op.is_applicable(&rule), "{} claimed a bare rule", op.name());
        }
    }

    #[test]
    fn operator_match_is_case_sensitive() {
        assert!(!MatchOperation::EQUALS.is_applicable(&Rule::new("f", "EQUALS")));
    }

    #[test]
    fn equals_single_and_multiple() {
        let single = Rule::new("type", "equals").with_values(["case"]);
        assert_eq!(render(&MatchOperation::EQUALS, &single), "type:(case)");

        let multi = Rule::new("type", "in").with_values(["case", "project"]);
        assert_eq!(
            render(&MatchOperation::EQUALS, &multi),
            "(type:(case) OR type:(project))"
        );
    }

    #[test]
    fn does_not_equal_negates_group() {
        let rule = Rule::new("status", "not_in").with_values(["DELETED", "ARCHIVED"]);
        assert_eq!(
            render(&MatchOperation::DOES_NOT_EQUAL, &rule),
            "-(status:(DELETED) OR status:(ARCHIVED))"
        );
    }

    #[test]
    fn wildcard_placement_per_operator() {
        let rule = |op: &str| Rule::new("title", op).with_values(["abc"]);
        assert_eq!(render(&MatchOperation::CONTAINS, &rule("contains")), "title:(*abc*)");
        assert_eq!(render(&MatchOperation::STARTS_WITH, &rule("starts_with")), "title:(abc*)");
        assert_eq!(render(&MatchOperation::ENDS_WITH, &rule("ends_with")), "title:(*abc)");
        assert_eq!(
            render(&MatchOperation::DOES_NOT_CONTAIN, &rule("does_not_contain")),
            "-(title:(*abc*))"
        );
        assert_eq!(
            render(&MatchOperation::DOES_NOT_START_WITH, &rule("does_not_start_with")),
            "-(title:(abc*))"
        );
    }

    #[test]
    fn match_without_values_emits_nothing() {
        let rule = Rule::new("title", "equals");
        assert_eq!(render(&MatchOperation::EQUALS, &rule), "");

        let blank = Rule::new("title", "equals").with_values(["", "  "]);
        assert_eq!(render(&MatchOperation::EQUALS, &blank), "");
    }

    #[test]
    fn blank_values_are_dropped() {
        let rule = Rule::new("title", "equals").with_values(["", "a"]);
        assert_eq!(render(&MatchOperation::EQUALS, &rule), "title:(a)");
    }

    #[test]
    fn range_bounds() {
        let between = Rule::new("createdOn", "between").with_values(["2024-01-01T00:00:00Z", "NOW"]);
        assert_eq!(
            render(&RangeOperation::BETWEEN, &between),
            "createdOn:[2024-01-01T00:00:00Z TO NOW]"
        );

        let half = Rule::new("size", "range").with_values(["10"]);
        assert_eq!(render(&RangeOperation::BETWEEN, &half), "size:[10 TO *]");

        let upper = Rule::new("size", "between").with_values(["", "20"]);
        assert_eq!(render(&RangeOperation::BETWEEN, &upper), "size:[* TO 20]");

        let after = Rule::new("modifiedOn", "after").with_values(["NOW-1DAY"]);
        assert_eq!(render(&RangeOperation::AFTER, &after), "modifiedOn:[NOW-1DAY TO *]");

        let before = Rule::new("modifiedOn", "before").with_values(["NOW"]);
        assert_eq!(render(&RangeOperation::BEFORE, &before), "modifiedOn:[* TO NOW]");

        let empty = Rule::new("size", "between");
        assert_eq!(render(&RangeOperation::BETWEEN, &empty), "");
    }

    #[test]
    fn existence_ignores_values() {
        let rule = Rule::new("mimetype", "empty").with_values(["ignored"]);
        assert_eq!(render(&ExistenceOperation::MISSING, &rule), "-mimetype:*");
        assert_eq!(render(&ExistenceOperation::EXISTS, &rule), "mimetype:*");
    }

    #[test]
    fn builtin_operators_are_distinct() {
        let mut seen: Vec<String> = Vec::new();
        for op in builtin_operations() {
            for operator in op.operators() {
                assert!(
                    !seen.iter().any(|s| s == operator),
                    "duplicate operator {operator}"
                );
                seen.push(operator.to_string());
            }
        }
    }
}
