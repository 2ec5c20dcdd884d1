//! Sort / limit / offset directives.
//!
//! JSON form: `{"$sort": {"col": 1 | -1, ...}, "$limit": n, "$offset": n}`.
//! Sort keys keep their declared order.

use crate::error::{SqlError, SqlResult};
use crate::ident::write_identifier;
use serde_json::Value as JsonValue;

/// Sort direction of one ORDER BY column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Map the document form (`1` / `-1`) to a direction.
    pub fn from_json(value: &JsonValue) -> SqlResult<Self> {
        match value.as_i64() {
            Some(1) => Ok(SortDirection::Asc),
            Some(-1) => Ok(SortDirection::Desc),
            _ => Err(SqlError::schema(format!(
                "invalid sort direction {value}, expected 1 or -1"
            ))),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Post-selection directives: ORDER BY, LIMIT and OFFSET.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostProcess {
    pub sort: Vec<(String, SortDirection)>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PostProcess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push((column.into(), direction));
        self
    }

    pub fn sort_asc(self, column: impl Into<String>) -> Self {
        self.sort(column, SortDirection::Asc)
    }

    pub fn sort_desc(self, column: impl Into<String>) -> Self {
        self.sort(column, SortDirection::Desc)
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Select the half-open row range `[start, end)`.
    pub fn range(start: u64, end: u64) -> SqlResult<Self> {
        if end < start {
            return Err(SqlError::schema(format!(
                "invalid row range {start}-{end}: end is before start"
            )));
        }
        Ok(Self::new().offset(start).limit(end - start))
    }

    pub fn is_empty(&self) -> bool {
        self.sort.is_empty() && self.limit.is_none() && self.offset.is_none()
    }

    /// Parse the JSON document form.
    pub fn from_json(value: &JsonValue) -> SqlResult<Self> {
        let JsonValue::Object(map) = value else {
            return Err(SqlError::schema(format!(
                "post-process directives must be an object, got {value}"
            )));
        };

        let mut out = PostProcess::new();
        for (key, v) in map {
            match key.as_str() {
                "$sort" => {
                    let JsonValue::Object(columns) = v else {
                        return Err(SqlError::schema(format!(
                            "$sort expects an object of column to 1 or -1, got {v}"
                        )));
                    };
                    for (column, direction) in columns {
                        out.sort.push((column.clone(), SortDirection::from_json(direction)?));
                    }
                }
                "$limit" => out.limit = Some(non_negative(key, v)?),
                "$offset" => out.offset = Some(non_negative(key, v)?),
                other => {
                    return Err(SqlError::schema(format!(
                        "unknown post-process directive {other}"
                    )));
                }
            }
        }
        Ok(out)
    }

    /// Compile into `ORDER BY ... LIMIT n OFFSET n`; segments that are not
    /// set are omitted.
    pub fn to_sql(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(3);
        if !self.sort.is_empty() {
            let mut order = String::from("ORDER BY ");
            for (i, (column, direction)) in self.sort.iter().enumerate() {
                if i > 0 {
                    order.push_str(", ");
                }
                write_identifier(&mut order, column);
                order.push(' ');
                order.push_str(direction.as_sql());
            }
            parts.push(order);
        }
        if let Some(limit) = self.limit {
            parts.push(format!("LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            parts.push(format!("OFFSET {offset}"));
        }
        parts.join(" ")
    }
}

fn non_negative(key: &str, v: &JsonValue) -> SqlResult<u64> {
    if let Some(n) = v.as_u64() {
        return Ok(n);
    }
    match v.as_i64() {
        Some(n) if n < 0 => Err(SqlError::schema(format!("{key} must not be negative, got {n}"))),
        _ => Err(SqlError::schema(format!(
            "{key} must be a non-negative integer, got {v}"
        ))),
    }
}

/// Compile a post-process document straight to SQL.
pub fn compile(value: &JsonValue) -> SqlResult<String> {
    Ok(PostProcess::from_json(value)?.to_sql())
}
