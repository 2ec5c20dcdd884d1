//! Condition trees and their translation into WHERE clauses.
//!
//! A [`Condition`] is the typed form of the document-style filter accepted
//! over HTTP:
//!
//! ```text
//! {}                                   -> no filter
//! {"$and": [cond, ...]}                -> (cond) AND (cond) ...
//! {"$or":  [cond, ...]}                -> (cond) OR (cond) ...
//! {"a": 1, "b": {"$gt": 5}}            -> (`a` = 1) AND (`b` > 5)
//! ```
//!
//! # Example
//! ```
//! use condsql::Condition;
//! use serde_json::json;
//!
//! let cond = Condition::from_json(&json!({"$or": [{"a": 1}, {"b": 2}]}))?;
//! assert_eq!(cond.to_where_clause()?, "WHERE (`a` = 1) OR (`b` = 2)");
//! # Ok::<(), condsql::SqlError>(())
//! ```

use crate::error::{SqlError, SqlResult};
use crate::ident::write_identifier;
use crate::value::Scalar;
use serde_json::Value as JsonValue;

/// Maximum nesting of `$and` / `$or` combinators.
pub const MAX_CONDITION_DEPTH: usize = 64;

/// Comparison operator of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Implied when a leaf value is a bare scalar.
    Eq,
    Like,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl Op {
    /// The SQL token for this operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Like => "LIKE",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Lte => "<=",
            Op::Gte => ">=",
        }
    }

    /// Look up an operator object key (`$like`, `$ne`, ...).
    ///
    /// Equality has no key: it is written as a bare scalar.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "$like" => Some(Op::Like),
            "$ne" => Some(Op::Ne),
            "$lt" => Some(Op::Lt),
            "$gt" => Some(Op::Gt),
            "$lte" => Some(Op::Lte),
            "$gte" => Some(Op::Gte),
            _ => None,
        }
    }
}

/// A single `column op value` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub column: String,
    pub op: Op,
    pub value: Scalar,
}

impl Leaf {
    pub fn new(column: impl Into<String>, op: Op, value: impl Into<Scalar>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Parse one `column: LeafValue` pair.
    pub fn from_json(column: &str, value: &JsonValue) -> SqlResult<Self> {
        match value {
            JsonValue::Object(map) => {
                let mut entries = map.iter();
                let (Some((key, rhs)), None) = (entries.next(), entries.next()) else {
                    return Err(SqlError::schema(format!(
                        "invalid condition value for column {column}: expected exactly one operator, got {value}"
                    )));
                };
                let Some(op) = Op::from_key(key) else {
                    return Err(SqlError::schema(format!("invalid operator {key}")));
                };
                Ok(Self::new(column, op, Scalar::from_json(rhs)?))
            }
            other => Ok(Self::new(column, Op::Eq, Scalar::from_json(other)?)),
        }
    }

    /// Render as `` `column` op literal ``.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.column.len() + 16);
        self.write_sql(&mut out);
        out
    }

    fn write_sql(&self, out: &mut String) {
        write_identifier(out, &self.column);
        out.push(' ');
        out.push_str(self.op.as_sql());
        out.push(' ');
        self.value.write_sql(out);
    }
}

/// A filter over rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Condition {
    /// No filter.
    #[default]
    Empty,
    /// Every child must hold. Must not be empty.
    And(Vec<Condition>),
    /// At least one child must hold. Must not be empty.
    Or(Vec<Condition>),
    /// A single comparison.
    Leaf(Leaf),
    /// Several comparisons on one node, implicitly combined with AND.
    Fields(Vec<Leaf>),
}

impl Condition {
    /// Combine conditions with AND.
    pub fn and(children: impl IntoIterator<Item = Condition>) -> Self {
        Condition::And(children.into_iter().collect())
    }

    /// Combine conditions with OR.
    pub fn or(children: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Or(children.into_iter().collect())
    }

    /// Build an implicit-AND node, collapsing zero or one leaves.
    pub fn fields(leaves: impl IntoIterator<Item = Leaf>) -> Self {
        let mut leaves: Vec<Leaf> = leaves.into_iter().collect();
        match leaves.len() {
            0 => Condition::Empty,
            1 => Condition::Leaf(leaves.remove(0)),
            _ => Condition::Fields(leaves),
        }
    }

    pub fn cmp(column: impl Into<String>, op: Op, value: impl Into<Scalar>) -> Self {
        Condition::Leaf(Leaf::new(column, op, value))
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(column, Op::Eq, value)
    }

    pub fn ne(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(column, Op::Ne, value)
    }

    pub fn like(column: impl Into<String>, pattern: impl Into<Scalar>) -> Self {
        Self::cmp(column, Op::Like, pattern)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(column, Op::Lt, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(column, Op::Gt, value)
    }

    pub fn lte(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(column, Op::Lte, value)
    }

    pub fn gte(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(column, Op::Gte, value)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Condition::Empty)
    }

    /// Parse a JSON condition document.
    pub fn from_json(value: &JsonValue) -> SqlResult<Self> {
        Self::parse(value, 0)
    }

    fn parse(value: &JsonValue, depth: usize) -> SqlResult<Self> {
        if depth > MAX_CONDITION_DEPTH {
            return Err(SqlError::schema(format!(
                "condition nested deeper than {MAX_CONDITION_DEPTH} levels"
            )));
        }
        let JsonValue::Object(map) = value else {
            return Err(SqlError::schema(format!(
                "condition must be an object, got {value}"
            )));
        };

        let is_and = map.contains_key("$and");
        let is_or = map.contains_key("$or");
        if is_and || is_or {
            if map.len() > 1 {
                return Err(SqlError::schema(
                    "cannot parse a condition that contains keys other than $and or $or",
                ));
            }
            let key = if is_and { "$and" } else { "$or" };
            let Some(JsonValue::Array(items)) = map.get(key) else {
                return Err(SqlError::schema(format!("{key} expects an array of conditions")));
            };
            if items.is_empty() {
                return Err(SqlError::schema(format!("{key} requires at least one condition")));
            }
            let children = items
                .iter()
                .map(|item| Self::parse(item, depth + 1))
                .collect::<SqlResult<Vec<_>>>()?;
            return Ok(if is_and {
                Condition::And(children)
            } else {
                Condition::Or(children)
            });
        }

        if let Some(key) = map.keys().find(|k| k.starts_with('$')) {
            return Err(SqlError::schema(format!("invalid operator {key}")));
        }

        let leaves = map
            .iter()
            .map(|(column, v)| Leaf::from_json(column, v))
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(Self::fields(leaves))
    }

    /// Translate into a WHERE clause: `WHERE <body>`, or an empty string when
    /// the condition places no constraint.
    pub fn to_where_clause(&self) -> SqlResult<String> {
        let body = self.render(0)?;
        if body.is_empty() {
            Ok(body)
        } else {
            Ok(format!("WHERE {body}"))
        }
    }

    /// Render the clause body (no `WHERE` keyword).
    pub(crate) fn render(&self, depth: usize) -> SqlResult<String> {
        if depth > MAX_CONDITION_DEPTH {
            return Err(SqlError::schema(format!(
                "condition nested deeper than {MAX_CONDITION_DEPTH} levels"
            )));
        }
        match self {
            Condition::Empty => Ok(String::new()),
            Condition::And(children) => render_group(children, "$and", " AND ", depth),
            Condition::Or(children) => render_group(children, "$or", " OR ", depth),
            Condition::Leaf(leaf) => Ok(leaf.to_sql()),
            Condition::Fields(leaves) => match leaves.as_slice() {
                [] => Ok(String::new()),
                [only] => Ok(only.to_sql()),
                many => {
                    let mut out = String::new();
                    for (i, leaf) in many.iter().enumerate() {
                        if i > 0 {
                            out.push_str(" AND ");
                        }
                        out.push('(');
                        leaf.write_sql(&mut out);
                        out.push(')');
                    }
                    Ok(out)
                }
            },
        }
    }
}

fn render_group(
    children: &[Condition],
    key: &str,
    separator: &str,
    depth: usize,
) -> SqlResult<String> {
    if children.is_empty() {
        return Err(SqlError::schema(format!("{key} requires at least one condition")));
    }
    let mut out = String::new();
    for (i, child) in children.iter().enumerate() {
        let part = child.render(depth + 1)?;
        // "()" is not valid SQL.
        if part.is_empty() {
            return Err(SqlError::schema(format!("empty condition inside {key}")));
        }
        if i > 0 {
            out.push_str(separator);
        }
        out.push('(');
        out.push_str(&part);
        out.push(')');
    }
    Ok(out)
}

/// Translate a condition into a WHERE clause (empty when unconstrained).
pub fn translate(condition: &Condition) -> SqlResult<String> {
    condition.to_where_clause()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn where_of(v: JsonValue) -> SqlResult<String> {
        Condition::from_json(&v)?.to_where_clause()
    }

    #[test]
    fn empty_condition_has_no_where() {
        assert_eq!(where_of(json!({})).unwrap(), "");
        assert_eq!(translate(&Condition::Empty).unwrap(), "");
    }

    #[test]
    fn single_leaf_is_not_parenthesized() {
        assert_eq!(where_of(json!({"a": 1})).unwrap(), "WHERE `a` = 1");
    }

    #[test]
    fn implicit_and() {
        assert_eq!(
            where_of(json!({"a": 1, "b": "x"})).unwrap(),
            r#"WHERE (`a` = 1) AND (`b` = "x")"#
        );
    }

    #[test]
    fn explicit_or() {
        assert_eq!(
            where_of(json!({"$or": [{"a": 1}, {"b": 2}]})).unwrap(),
            "WHERE (`a` = 1) OR (`b` = 2)"
        );
    }

    #[test]
    fn nested_combinators_parenthesize() {
        assert_eq!(
            where_of(json!({"$and": [{"$or": [{"a": 1}, {"a": 2}]}, {"b": {"$gt": 5}}]})).unwrap(),
            "WHERE ((`a` = 1) OR (`a` = 2)) AND (`b` > 5)"
        );
    }

    #[test]
    fn single_child_combinator_keeps_parens() {
        assert_eq!(
            where_of(json!({"$and": [{"a": 1}]})).unwrap(),
            "WHERE (`a` = 1)"
        );
    }

    #[test]
    fn all_operators() {
        let sql = where_of(json!({
            "a": {"$like": "%x%"},
            "b": {"$ne": 1},
            "c": {"$lt": 2},
            "d": {"$gt": 3},
            "e": {"$lte": 4},
            "f": {"$gte": 5.5},
        }))
        .unwrap();
        assert_eq!(
            sql,
            r#"WHERE (`a` LIKE "%x%") AND (`b` != 1) AND (`c` < 2) AND (`d` > 3) AND (`e` <= 4) AND (`f` >= 5.5)"#
        );
    }

    #[test]
    fn null_equality_renders_null_literal() {
        assert_eq!(where_of(json!({"a": null})).unwrap(), "WHERE `a` = NULL");
    }

    #[test]
    fn string_values_are_escaped() {
        assert_eq!(
            where_of(json!({"name": "Bob\" OR 1=1 --"})).unwrap(),
            r#"WHERE `name` = "Bob\" OR 1=1 --""#
        );
    }

    #[test]
    fn mixed_and_or_rejected() {
        let err = where_of(json!({"$and": [{"a": 1}], "$or": [{"b": 1}]})).unwrap_err();
        assert!(err.is_schema_violation());
        let err = where_of(json!({"$and": [{"a": 1}], "b": 1})).unwrap_err();
        assert!(err.is_schema_violation());
    }

    #[test]
    fn empty_combinator_rejected() {
        assert!(where_of(json!({"$and": []})).unwrap_err().is_schema_violation());
        assert!(where_of(json!({"$or": []})).unwrap_err().is_schema_violation());
        assert!(
            translate(&Condition::Or(vec![]))
                .unwrap_err()
                .is_schema_violation()
        );
    }

    #[test]
    fn empty_child_rejected() {
        assert!(where_of(json!({"$or": [{}, {"a": 1}]})).unwrap_err().is_schema_violation());
    }

    #[test]
    fn combinator_must_be_array() {
        assert!(where_of(json!({"$and": {"a": 1}})).unwrap_err().is_schema_violation());
    }

    #[test]
    fn invalid_operator_rejected() {
        assert!(where_of(json!({"$foo": 1})).unwrap_err().is_schema_violation());
        assert!(where_of(json!({"a": {"$foo": 1}})).unwrap_err().is_schema_violation());
        assert!(where_of(json!({"a": {"$eq": 1}})).unwrap_err().is_schema_violation());
    }

    #[test]
    fn multiple_operator_keys_rejected() {
        let err = where_of(json!({"a": {"$gt": 1, "$lt": 5}})).unwrap_err();
        assert!(err.is_schema_violation());
        assert!(where_of(json!({"a": {}})).unwrap_err().is_schema_violation());
    }

    #[test]
    fn non_scalar_values_rejected() {
        assert!(where_of(json!({"a": [1, 2]})).unwrap_err().is_schema_violation());
        assert!(where_of(json!({"a": true})).unwrap_err().is_schema_violation());
        assert!(where_of(json!({"a": {"$gt": [1]}})).unwrap_err().is_schema_violation());
        assert!(where_of(json!([{"a": 1}])).unwrap_err().is_schema_violation());
    }

    #[test]
    fn deep_nesting_rejected() {
        let mut v = json!({"a": 1});
        for _ in 0..(MAX_CONDITION_DEPTH + 2) {
            v = json!({"$and": [v]});
        }
        assert!(where_of(v).unwrap_err().is_schema_violation());
    }

    #[test]
    fn translation_is_deterministic() {
        let v = json!({"$or": [{"b": 2, "a": {"$like": "x%"}}, {"c": {"$lte": 1}}]});
        let first = where_of(v.clone()).unwrap();
        let second = where_of(v).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            r#"WHERE ((`b` = 2) AND (`a` LIKE "x%")) OR (`c` <= 1)"#
        );
    }

    #[test]
    fn typed_constructors_match_json() {
        let typed = Condition::and([
            Condition::or([Condition::eq("a", 1), Condition::eq("a", 2)]),
            Condition::gt("b", 5),
        ]);
        let parsed =
            Condition::from_json(&json!({"$and": [{"$or": [{"a": 1}, {"a": 2}]}, {"b": {"$gt": 5}}]}))
                .unwrap();
        assert_eq!(typed, parsed);
    }

    #[test]
    fn fields_collapses() {
        assert_eq!(Condition::fields(Vec::new()), Condition::Empty);
        assert_eq!(
            Condition::fields([Leaf::new("a", Op::Eq, 1)]),
            Condition::eq("a", 1)
        );
    }
}
