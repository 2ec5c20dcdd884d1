//! Keyword search over a configured set of columns.
//!
//! A [`SearchSchema`] lists, per table, which columns a keyword is matched
//! against, which columns are returned and which columns need an exact match
//! instead of a substring match. [`SearchSchema::plan`] turns a
//! [`SearchRequest`] into the pieces of a SELECT statement.
//!
//! The schema can be loaded from TOML:
//!
//! ```toml
//! [tables.Pet]
//! searchable = ["name", "sex", "color"]
//! output = ["name", "sex", "color", "price"]
//! exact = ["sex"]
//! ```

use crate::condition::{Condition, Leaf, Op};
use crate::error::{SqlError, SqlResult};
use crate::join::TableRef;
use crate::post_process::PostProcess;
use crate::statement::build_select;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Table searched when a request names none.
pub const DEFAULT_SEARCH_TABLE: &str = "Pet";

/// Search settings for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchTable {
    /// Columns the keyword is matched against.
    pub searchable: Vec<String>,
    /// Columns returned by a search. Empty means every column.
    #[serde(default)]
    pub output: Vec<String>,
    /// Searchable columns compared with `=` instead of `LIKE`.
    #[serde(default)]
    pub exact: Vec<String>,
}

impl SearchTable {
    pub fn new<S: Into<String>>(searchable: impl IntoIterator<Item = S>) -> Self {
        Self {
            searchable: searchable.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn output<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.output = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn exact<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.exact = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_searchable(&self, column: &str) -> bool {
        self.searchable.iter().any(|c| c == column)
    }

    pub fn is_exact(&self, column: &str) -> bool {
        self.exact.iter().any(|c| c == column)
    }

    fn match_column(&self, column: &str, word: &str) -> Condition {
        if self.is_exact(column) {
            Condition::eq(column, word)
        } else {
            Condition::Leaf(Leaf::new(column, Op::Like, format!("%{word}%")))
        }
    }

    fn validate(&self, table: &str) -> SqlResult<()> {
        if self.searchable.is_empty() {
            return Err(SqlError::config(format!(
                "table {table} has no searchable columns"
            )));
        }
        let mut all = self.searchable.iter().chain(&self.output).chain(&self.exact);
        if let Some(blank) = all.find(|c| c.is_empty()) {
            return Err(SqlError::config(format!(
                "table {table} has an empty column name {blank:?}"
            )));
        }
        if let Some(column) = self.exact.iter().find(|c| !self.is_searchable(c)) {
            return Err(SqlError::config(format!(
                "exact-match column {column} of table {table} is not searchable"
            )));
        }
        Ok(())
    }
}

/// Per-table search configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSchema {
    #[serde(default)]
    pub tables: BTreeMap<String, SearchTable>,
}

impl SearchSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: impl Into<String>, table: SearchTable) -> Self {
        self.tables.insert(name.into(), table);
        self
    }

    /// The pet shop schema: shops, pets and reviews.
    pub fn pet_shop() -> Self {
        Self::new()
            .table(
                "PetShop",
                SearchTable::new(["name", "location"]).output(["name", "location"]),
            )
            .table(
                "Pet",
                SearchTable::new([
                    "name",
                    "sex",
                    "height",
                    "color",
                    "favorite_food",
                    "description",
                    "pet_shop_name",
                    "breed_name",
                ])
                .output([
                    "name",
                    "sex",
                    "height",
                    "weight",
                    "date_of_birth",
                    "color",
                    "favorite_food",
                    "description",
                    "price",
                    "image_url",
                    "pet_shop_name",
                    "breed_name",
                ])
                .exact(["sex"]),
            )
            .table(
                "Review",
                SearchTable::new(["content", "pet_shop_name"]).output([
                    "rating",
                    "review_date",
                    "content",
                    "customer_email",
                    "pet_shop_name",
                ]),
            )
    }

    /// Parse and validate a schema from TOML text.
    pub fn from_toml_str(raw: &str) -> SqlResult<Self> {
        let schema: SearchSchema = toml::from_str(raw)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Read, parse and validate a schema file.
    pub fn load(path: impl AsRef<Path>) -> SqlResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SqlError::config(format!("failed to read search schema {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            SqlError::Config(msg) => {
                SqlError::config(format!("invalid search schema {}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn validate(&self) -> SqlResult<()> {
        if self.tables.is_empty() {
            return Err(SqlError::config("search schema defines no tables"));
        }
        for (name, table) in &self.tables {
            if name.is_empty() {
                return Err(SqlError::config("search schema has an empty table name"));
            }
            table.validate(name)?;
        }
        Ok(())
    }

    pub fn get(&self, table: &str) -> Option<&SearchTable> {
        self.tables.get(table)
    }

    /// Turn a request into the table, condition, projection and paging of a
    /// SELECT.
    pub fn plan(&self, request: &SearchRequest) -> SqlResult<SearchPlan> {
        let table = self
            .get(&request.table)
            .ok_or_else(|| SqlError::schema(format!("cannot search in table {}", request.table)))?;

        if let Some(column) = &request.column
            && !table.is_searchable(column)
        {
            return Err(SqlError::schema(format!(
                "invalid column {column} of table {}",
                request.table
            )));
        }

        let condition = if request.keyword.is_empty() {
            Condition::Empty
        } else if let Some(column) = &request.column {
            table.match_column(column, &request.keyword)
        } else {
            // Every word must hit at least one column.
            Condition::and(request.keyword.split(' ').map(|word| {
                Condition::or(
                    table
                        .searchable
                        .iter()
                        .map(|column| table.match_column(column, word)),
                )
            }))
        };

        let post_process = match request.limit {
            Some(limit) => PostProcess::new().limit(limit),
            None => PostProcess::new(),
        };

        tracing::debug!(
            target: "condsql.search",
            table = %request.table,
            keyword = %request.keyword,
            column = ?request.column,
            "planned search"
        );

        Ok(SearchPlan {
            table: request.table.clone(),
            condition,
            columns: table.output.clone(),
            post_process,
        })
    }
}

/// A keyword search against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Space-separated words. Empty returns every row.
    pub keyword: String,
    pub table: String,
    /// Restrict matching to one searchable column.
    pub column: Option<String>,
    pub limit: Option<u64>,
}

impl SearchRequest {
    /// Search [`DEFAULT_SEARCH_TABLE`] for `keyword`.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            table: DEFAULT_SEARCH_TABLE.to_string(),
            column: None,
            limit: None,
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// The SELECT a search runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlan {
    pub table: String,
    pub condition: Condition,
    pub columns: Vec<String>,
    pub post_process: PostProcess,
}

impl SearchPlan {
    pub fn to_sql(&self) -> SqlResult<String> {
        build_select(
            &TableRef::new(self.table.as_str()),
            &self.condition,
            self.columns.as_slice(),
            &self.post_process,
        )
    }
}
