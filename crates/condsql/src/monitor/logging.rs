use super::{Execution, Outcome, QueryMonitor};
use std::borrow::Cow;
use std::time::Duration;

/// Reports statements as `tracing` events under target `condsql.monitor`.
///
/// Failures and statements slower than the threshold log at `warn`,
/// everything else at `debug`.
#[derive(Debug, Clone)]
pub struct LoggingMonitor {
    slow_threshold: Option<Duration>,
    max_sql_len: Option<usize>,
}

impl Default for LoggingMonitor {
    fn default() -> Self {
        Self {
            slow_threshold: None,
            max_sql_len: Some(256),
        }
    }
}

impl LoggingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = Some(threshold);
        self
    }

    /// Cut logged SQL after this many bytes. `None` logs it whole.
    pub fn max_sql_len(mut self, len: Option<usize>) -> Self {
        self.max_sql_len = len;
        self
    }

    pub(crate) fn shorten<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        let Some(max) = self.max_sql_len.filter(|max| sql.len() > *max) else {
            return Cow::Borrowed(sql);
        };
        let mut end = max;
        while !sql.is_char_boundary(end) {
            end -= 1;
        }
        Cow::Owned(format!("{}...", &sql[..end]))
    }

    pub(super) fn is_slow(&self, elapsed: Duration) -> bool {
        self.slow_threshold.is_some_and(|limit| elapsed > limit)
    }
}

impl QueryMonitor for LoggingMonitor {
    fn record(&self, execution: &Execution<'_>) {
        let sql = self.shorten(execution.sql);
        let kind = execution.kind.as_str();
        let elapsed = execution.elapsed;
        match execution.outcome {
            Outcome::Failed(error) => tracing::warn!(
                target: "condsql.monitor",
                kind,
                ?elapsed,
                error = %error,
                sql = %sql,
                "statement failed"
            ),
            Outcome::Rows(rows) if self.is_slow(elapsed) => tracing::warn!(
                target: "condsql.monitor",
                kind,
                ?elapsed,
                rows,
                sql = %sql,
                "slow statement"
            ),
            Outcome::Rows(rows) => tracing::debug!(
                target: "condsql.monitor",
                kind,
                ?elapsed,
                rows,
                sql = %sql,
                "statement executed"
            ),
        }
    }
}
