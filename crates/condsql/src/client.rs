//! Executor trait: the boundary to whatever runs the finished SQL.

use crate::error::SqlResult;
use crate::value::Record;
use std::sync::Arc;

/// Runs finished SQL text and returns the result rows.
///
/// Failures (connectivity, constraint violations, ...) are reported as
/// [`SqlError::Execution`](crate::SqlError::Execution); they are passed on to
/// callers untouched.
pub trait Executor: Send + Sync {
    /// Execute one statement and return all rows it produced.
    fn execute_sql(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = SqlResult<Vec<Record>>> + Send;
}

impl<E: Executor> Executor for &E {
    fn execute_sql(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = SqlResult<Vec<Record>>> + Send {
        (**self).execute_sql(sql)
    }
}

impl<E: Executor> Executor for Arc<E> {
    fn execute_sql(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = SqlResult<Vec<Record>>> + Send {
        (**self).execute_sql(sql)
    }
}
