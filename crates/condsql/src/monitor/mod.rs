//! Timing and outcome reporting around an [`Executor`](crate::Executor).
//!
//! [`InstrumentedClient`] wraps any executor, optionally bounds each
//! statement with a timeout and hands every finished statement to a
//! [`QueryMonitor`].
//!
//! ```ignore
//! use condsql::monitor::{InstrumentedClient, LoggingMonitor};
//! use std::time::Duration;
//!
//! let executor = InstrumentedClient::new(mysql_executor)
//!     .with_timeout(Duration::from_secs(30))
//!     .with_monitor(LoggingMonitor::new().slow_threshold(Duration::from_secs(2)));
//! let db = condsql::Database::new(executor);
//! ```

mod instrumented;
mod logging;
mod stats;


pub use instrumented::InstrumentedClient;
pub use logging::LoggingMonitor;
pub use stats::{StatementStats, StatsMonitor};

use crate::error::SqlError;
use std::sync::Arc;
use std::time::Duration;

/// Statement kind, read from the leading keyword of the SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    /// Raw SQL such as `CALL` or DDL.
    Other,
}

impl StatementKind {
    pub const ALL: [StatementKind; 5] = [
        StatementKind::Select,
        StatementKind::Insert,
        StatementKind::Update,
        StatementKind::Delete,
        StatementKind::Other,
    ];

    pub fn of(sql: &str) -> Self {
        let keyword = sql
            .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or_default();
        match keyword.to_ascii_uppercase().as_str() {
            "SELECT" => StatementKind::Select,
            "INSERT" => StatementKind::Insert,
            "UPDATE" => StatementKind::Update,
            "DELETE" => StatementKind::Delete,
            _ => StatementKind::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::Other => "other",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// How a statement ended.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    Rows(usize),
    Failed(&'a SqlError),
}

/// One finished statement.
#[derive(Debug, Clone, Copy)]
pub struct Execution<'a> {
    pub sql: &'a str,
    pub kind: StatementKind,
    pub elapsed: Duration,
    pub outcome: Outcome<'a>,
}

/// Receives every statement an [`InstrumentedClient`] runs.
pub trait QueryMonitor: Send + Sync {
    fn record(&self, execution: &Execution<'_>);
}

impl<M: QueryMonitor + ?Sized> QueryMonitor for Arc<M> {
    fn record(&self, execution: &Execution<'_>) {
        (**self).record(execution)
    }
}
