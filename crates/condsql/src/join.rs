//! Table references and two-table joins.
//!
//! A plain [`TableRef`] names one table and is quoted on emission. Joining two
//! references yields a *composite* reference whose name is the join expression
//! itself; composite names are emitted verbatim and can only be read from.

use crate::error::{SqlError, SqlResult};
use crate::ident::write_identifier;
use serde_json::Value as JsonValue;

/// A table, or the result of joining tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    name: String,
    composite: bool,
}

/// How two tables are joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinCondition {
    /// `NATURAL JOIN`
    Natural,
    /// Equality join: exactly two `(table, column)` entries.
    On(Vec<(String, String)>),
}

impl JoinCondition {
    /// Equality join of `left_table.left_column = right_table.right_column`.
    pub fn on(
        left_table: impl Into<String>,
        left_column: impl Into<String>,
        right_table: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Self {
        JoinCondition::On(vec![
            (left_table.into(), left_column.into()),
            (right_table.into(), right_column.into()),
        ])
    }

    /// Parse `"natural"` or an object mapping each table name to its join
    /// column, e.g. `{"Pet": "breed_name", "Breed": "name"}`.
    pub fn from_json(value: &JsonValue) -> SqlResult<Self> {
        match value {
            JsonValue::String(s) if s == "natural" => Ok(JoinCondition::Natural),
            JsonValue::Object(map) => {
                let mut pairs = Vec::with_capacity(map.len());
                for (table, column) in map {
                    let JsonValue::String(column) = column else {
                        return Err(SqlError::schema(format!(
                            "join column for {table} must be a string, got {column}"
                        )));
                    };
                    pairs.push((table.clone(), column.clone()));
                }
                Ok(JoinCondition::On(pairs))
            }
            other => Err(SqlError::schema(format!("invalid join condition {other}"))),
        }
    }
}

impl TableRef {
    /// Reference a single table by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            composite: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this reference is a join expression.
    pub fn is_composite(&self) -> bool {
        self.composite
    }

    /// Render for use after `FROM` / `INTO` / `UPDATE`.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 2);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        if self.composite {
            out.push_str(&self.name);
        } else {
            write_identifier(out, &self.name);
        }
    }

    /// Join with another reference.
    pub fn join(&self, right: &TableRef, condition: &JoinCondition) -> SqlResult<TableRef> {
        match condition {
            JoinCondition::Natural => Ok(self.natural_join(right)),
            JoinCondition::On(pairs) => {
                let [(t1, c1), (t2, c2)] = pairs.as_slice() else {
                    return Err(SqlError::schema(format!(
                        "equality join requires exactly two table/column entries, got {}",
                        pairs.len()
                    )));
                };
                if t1 == t2 {
                    return Err(SqlError::schema(format!(
                        "equality join entries must name two different tables, got {t1} twice"
                    )));
                }
                // A plain table must be named by one of the entries.
                for side in [self, right] {
                    if !side.composite && *t1 != side.name && *t2 != side.name {
                        return Err(SqlError::schema(format!(
                            "join keys name {t1} and {t2} but not the joined table {}",
                            side.name
                        )));
                    }
                }
                let mut name = String::new();
                self.write_sql(&mut name);
                name.push_str(" JOIN ");
                right.write_sql(&mut name);
                name.push_str(" ON ");
                write_qualified(&mut name, t1, c1);
                name.push_str(" = ");
                write_qualified(&mut name, t2, c2);
                Ok(TableRef::composite(name))
            }
        }
    }

    /// Equality join on `self.left_key = right.right_key`.
    ///
    /// Both sides must be plain tables so their names can qualify the join
    /// columns; join composites with [`TableRef::join`] and an explicit
    /// [`JoinCondition::On`].
    pub fn equality_join(
        &self,
        right: &TableRef,
        left_key: &str,
        right_key: &str,
    ) -> SqlResult<TableRef> {
        if self.composite || right.composite {
            return Err(SqlError::schema(
                "equality_join needs plain tables; use join() with explicit table names",
            ));
        }
        self.join(
            right,
            &JoinCondition::on(&self.name, left_key, &right.name, right_key),
        )
    }

    /// `left NATURAL JOIN right`.
    pub fn natural_join(&self, right: &TableRef) -> TableRef {
        let mut name = String::new();
        self.write_sql(&mut name);
        name.push_str(" NATURAL JOIN ");
        right.write_sql(&mut name);
        TableRef::composite(name)
    }

    fn composite(name: String) -> Self {
        Self {
            name,
            composite: true,
        }
    }
}

fn write_qualified(out: &mut String, table: &str, column: &str) {
    write_identifier(out, table);
    out.push('.');
    write_identifier(out, column);
}
