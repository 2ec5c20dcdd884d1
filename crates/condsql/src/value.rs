//! Scalar values, rows and their SQL literal form.
//!
//! Values are embedded in the statement text rather than bound as
//! parameters:
//!
//! - numbers render as bare numeric literals (`42`, `3.5`)
//! - strings render JSON-encoded (`"it\"s"`), which MySQL reads as a
//!   double-quoted string literal
//! - `Null` renders as `NULL`

use crate::error::{SqlError, SqlResult};
use serde_json::{Number, Value as JsonValue};
use std::fmt;

/// A scalar value that can appear on the right-hand side of a condition or
/// in an inserted/updated row.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// SQL NULL
    Null,
    /// Integer or floating point number
    Number(Number),
    /// Text
    String(String),
}

impl Scalar {
    /// Create a number from a float. Returns `None` for NaN and infinities,
    /// which have no SQL literal.
    pub fn from_f64(v: f64) -> Option<Self> {
        Number::from_f64(v).map(Scalar::Number)
    }

    /// Convert a JSON value into a scalar.
    ///
    /// Booleans, arrays and objects are not scalars and are rejected.
    pub fn from_json(value: &JsonValue) -> SqlResult<Self> {
        match value {
            JsonValue::Null => Ok(Scalar::Null),
            JsonValue::Number(n) => Ok(Scalar::Number(n.clone())),
            JsonValue::String(s) => Ok(Scalar::String(s.clone())),
            JsonValue::Bool(_) => Err(SqlError::schema(format!(
                "unsupported boolean value {value}"
            ))),
            JsonValue::Array(_) | JsonValue::Object(_) => Err(SqlError::schema(format!(
                "non-scalar value {value} is not supported"
            ))),
        }
    }

    /// Render this value as SQL literal text.
    pub fn to_sql_literal(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        match self {
            Scalar::Null => out.push_str("NULL"),
            Scalar::Number(n) => out.push_str(&n.to_string()),
            Scalar::String(s) => out.push_str(&JsonValue::from(s.as_str()).to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

/// Serialize a scalar into SQL literal text.
pub fn serialize_value(value: &Scalar) -> String {
    value.to_sql_literal()
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql_literal())
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

macro_rules! scalar_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Scalar::Number(Number::from(v))
                }
            }
        )*
    };
}

scalar_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Scalar::Null, Into::into)
    }
}

/// An ordered mapping from column name to value, used for INSERT rows and
/// UPDATE assignments.
///
/// Column order follows insertion order; setting an existing column replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Scalar)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value (builder style).
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Scalar>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Parse a JSON object of column to scalar.
    pub fn from_json(value: &JsonValue) -> SqlResult<Self> {
        let JsonValue::Object(map) = value else {
            return Err(SqlError::schema(format!("row must be an object, got {value}")));
        };
        let mut row = Row::new();
        for (column, v) in map {
            row.insert(column.as_str(), Scalar::from_json(v)?);
        }
        Ok(row)
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.entries.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Scalar> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Into<String>, V: Into<Scalar>> FromIterator<(C, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (c, v) in iter {
            row.insert(c, v);
        }
        row
    }
}

/// A value returned by the executor.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Number(Number),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        match v {
            Scalar::Null => Value::Null,
            Scalar::Number(n) => Value::Number(n),
            Scalar::String(s) => Value::Text(s),
        }
    }
}

/// One result row: column names mapped to values, in result-set order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.push((column.into(), value.into()));
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_numbers_bare() {
        assert_eq!(serialize_value(&Scalar::from(42)), "42");
        assert_eq!(serialize_value(&Scalar::from(-7i64)), "-7");
        assert_eq!(serialize_value(&Scalar::from_f64(2.5).unwrap()), "2.5");
    }

    #[test]
    fn serialize_strings_json_encoded() {
        assert_eq!(serialize_value(&Scalar::from("abc")), r#""abc""#);
        assert_eq!(serialize_value(&Scalar::from(r#"a"b"#)), r#""a\"b""#);
        assert_eq!(serialize_value(&Scalar::from(r"a\b")), r#""a\\b""#);
        assert_eq!(serialize_value(&Scalar::from("line\nbreak")), r#""line\nbreak""#);
    }

    #[test]
    fn serialize_null() {
        assert_eq!(serialize_value(&Scalar::Null), "NULL");
        assert_eq!(Scalar::from(None::<i32>), Scalar::Null);
    }

    #[test]
    fn non_finite_floats_have_no_literal() {
        assert!(Scalar::from_f64(f64::NAN).is_none());
        assert!(Scalar::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn scalar_from_json_rejects_non_scalars() {
        assert!(Scalar::from_json(&json!(true)).unwrap_err().is_schema_violation());
        assert!(Scalar::from_json(&json!([1])).unwrap_err().is_schema_violation());
        assert!(Scalar::from_json(&json!({"a": 1})).unwrap_err().is_schema_violation());
        assert_eq!(Scalar::from_json(&json!(null)).unwrap(), Scalar::Null);
    }

    #[test]
    fn row_preserves_insertion_order_and_replaces() {
        let row = Row::new().set("b", 1).set("a", "x").set("b", 2);
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(row.get("b"), Some(&Scalar::from(2)));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn row_from_json_keeps_key_order() {
        let row = Row::from_json(&json!({"z": 1, "a": "q", "m": null})).unwrap();
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert!(Row::from_json(&json!([1, 2])).is_err());
        assert!(Row::from_json(&json!({"a": {"b": 1}})).is_err());
    }

    #[test]
    fn record_lookup() {
        let rec = Record::new()
            .with("name", Scalar::from("Rex"))
            .with("photo", Value::Bytes(vec![1, 2]));
        assert_eq!(rec.get("name"), Some(&Value::Text("Rex".into())));
        assert_eq!(rec.get("photo"), Some(&Value::Bytes(vec![1, 2])));
        assert!(rec.get("missing").is_none());
    }
}
