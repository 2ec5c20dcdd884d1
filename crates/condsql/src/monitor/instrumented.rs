use super::{Execution, Outcome, QueryMonitor, StatementKind};
use crate::client::Executor;
use crate::error::{SqlError, SqlResult};
use crate::value::Record;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// An [`Executor`] that times each statement, enforces an optional timeout
/// and reports to a monitor.
///
/// Errors from the wrapped executor are returned unchanged. A statement that
/// outlives the timeout is dropped and fails with [`SqlError::Timeout`].
pub struct InstrumentedClient<E> {
    inner: E,
    monitor: Option<Arc<dyn QueryMonitor>>,
    timeout: Option<Duration>,
}

impl<E: Executor> InstrumentedClient<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            monitor: None,
            timeout: None,
        }
    }

    /// Report every statement to `monitor`, replacing any previous one.
    ///
    /// Pass an `Arc` to keep a handle, e.g. on a [`StatsMonitor`](super::StatsMonitor).
    pub fn with_monitor<M: QueryMonitor + 'static>(mut self, monitor: M) -> Self {
        self.monitor = Some(Arc::new(monitor));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    async fn run(&self, sql: &str) -> SqlResult<Vec<Record>> {
        let started = Instant::now();
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.inner.execute_sql(sql))
                .await
                .unwrap_or_else(|_| Err(SqlError::Timeout(limit))),
            None => self.inner.execute_sql(sql).await,
        };

        if let Some(monitor) = &self.monitor {
            let outcome = match &result {
                Ok(rows) => Outcome::Rows(rows.len()),
                Err(err) => Outcome::Failed(err),
            };
            monitor.record(&Execution {
                sql,
                kind: StatementKind::of(sql),
                elapsed: started.elapsed(),
                outcome,
            });
        }
        result
    }
}

impl<E: Executor> Executor for InstrumentedClient<E> {
    fn execute_sql(&self, sql: &str) -> impl Future<Output = SqlResult<Vec<Record>>> + Send {
        self.run(sql)
    }
}
