//! Table handles bound to an executor.
//!
//! [`Database`] owns the executor and hands out [`Table`] handles. A handle
//! builds its statements with the functions in [`crate::statement`] and sends
//! the resulting SQL to the executor.
//!
//! # Example
//!
//! ```ignore
//! use condsql::{Condition, Database, PostProcess};
//!
//! let db = Database::new(executor);
//! let rows = db
//!     .table("Pet")
//!     .select(&Condition::eq("sex", "F"), &["name"], &PostProcess::new().limit(10))
//!     .await?;
//! ```

use crate::client::Executor;
use crate::condition::Condition;
use crate::error::SqlResult;
use crate::join::{JoinCondition, TableRef};
use crate::post_process::PostProcess;
use crate::search::{SearchRequest, SearchSchema};
use crate::statement::{build_delete, build_insert, build_select, build_update};
use crate::value::{Record, Row};

/// Entry point holding the executor.
#[derive(Debug, Clone)]
pub struct Database<E> {
    executor: E,
}

impl<E: Executor> Database<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Get a handle on a single table.
    pub fn table(&self, name: impl Into<String>) -> Table<'_, E> {
        Table {
            table: TableRef::new(name),
            db: self,
        }
    }

    /// Run raw SQL (hand-written reports and stored procedure calls).
    pub async fn execute_sql(&self, sql: &str) -> SqlResult<Vec<Record>> {
        tracing::debug!(target: "condsql.exec", sql = %sql, "executing SQL");
        let rows = self.executor.execute_sql(sql).await?;
        tracing::trace!(target: "condsql.exec", rows = rows.len(), "statement finished");
        Ok(rows)
    }

    /// Run a keyword search planned by `schema`.
    pub async fn search(
        &self,
        schema: &SearchSchema,
        request: &SearchRequest,
    ) -> SqlResult<Vec<Record>> {
        let plan = schema.plan(request)?;
        self.execute_sql(&plan.to_sql()?).await
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }
}

/// A table (or joined tables) of a [`Database`].
#[derive(Debug)]
pub struct Table<'a, E> {
    table: TableRef,
    db: &'a Database<E>,
}

impl<E> Clone for Table<'_, E> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            db: self.db,
        }
    }
}

impl<'a, E: Executor> Table<'a, E> {
    pub fn table_ref(&self) -> &TableRef {
        &self.table
    }

    pub fn name(&self) -> &str {
        self.table.name()
    }

    /// Whether this handle is a join, and therefore read-only.
    pub fn is_joined(&self) -> bool {
        self.table.is_composite()
    }

    /// Join with another handle, e.g. `{"Pet": "breed_name", "Breed": "name"}`
    /// or [`JoinCondition::Natural`].
    pub fn join(&self, other: &Table<'_, E>, condition: &JoinCondition) -> SqlResult<Table<'a, E>> {
        Ok(Table {
            table: self.table.join(&other.table, condition)?,
            db: self.db,
        })
    }

    pub fn natural_join(&self, other: &Table<'_, E>) -> Table<'a, E> {
        Table {
            table: self.table.natural_join(&other.table),
            db: self.db,
        }
    }

    pub async fn insert(&self, row: &Row) -> SqlResult<Vec<Record>> {
        let sql = build_insert(&self.table, row)?;
        self.db.execute_sql(&sql).await
    }

    /// Select rows; an empty `columns` slice selects `*`.
    pub async fn select<C: AsRef<str> + Sync>(
        &self,
        condition: &Condition,
        columns: &[C],
        post_process: &PostProcess,
    ) -> SqlResult<Vec<Record>> {
        let sql = build_select(&self.table, condition, columns, post_process)?;
        self.db.execute_sql(&sql).await
    }

    pub async fn update(&self, condition: &Condition, updates: &Row) -> SqlResult<Vec<Record>> {
        let sql = build_update(&self.table, condition, updates)?;
        self.db.execute_sql(&sql).await
    }

    pub async fn delete(&self, condition: &Condition) -> SqlResult<Vec<Record>> {
        let sql = build_delete(&self.table, condition)?;
        self.db.execute_sql(&sql).await
    }
}
