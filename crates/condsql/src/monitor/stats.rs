use super::{Execution, Outcome, QueryMonitor, StatementKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counts statements per kind, failures, timeouts and time spent.
#[derive(Debug, Default)]
pub struct StatsMonitor {
    by_kind: [AtomicU64; 5],
    failed: AtomicU64,
    timed_out: AtomicU64,
    total_nanos: AtomicU64,
    max_nanos: AtomicU64,
}

/// Snapshot of a [`StatsMonitor`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementStats {
    pub executed: u64,
    /// Includes timeouts.
    pub failed: u64,
    pub timed_out: u64,
    pub total_time: Duration,
    pub max_time: Duration,
    by_kind: [u64; 5],
}

impl StatementStats {
    pub fn count(&self, kind: StatementKind) -> u64 {
        self.by_kind[kind.index()]
    }
}

impl StatsMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatementStats {
        let by_kind = StatementKind::ALL.map(|kind| self.by_kind[kind.index()].load(Ordering::Relaxed));
        StatementStats {
            executed: by_kind.iter().sum(),
            failed: self.failed.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            total_time: Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed)),
            max_time: Duration::from_nanos(self.max_nanos.load(Ordering::Relaxed)),
            by_kind,
        }
    }

    pub fn reset(&self) {
        let counters = self.by_kind.iter().chain([
            &self.failed,
            &self.timed_out,
            &self.total_nanos,
            &self.max_nanos,
        ]);
        for counter in counters {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl QueryMonitor for StatsMonitor {
    fn record(&self, execution: &Execution<'_>) {
        self.by_kind[execution.kind.index()].fetch_add(1, Ordering::Relaxed);
        if let Outcome::Failed(err) = execution.outcome {
            self.failed.fetch_add(1, Ordering::Relaxed);
            if err.is_timeout() {
                self.timed_out.fetch_add(1, Ordering::Relaxed);
            }
        }

        let nanos = u64::try_from(execution.elapsed.as_nanos()).unwrap_or(u64::MAX);
        // Saturates instead of wrapping.
        let _ = self
            .total_nanos
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| {
                Some(total.saturating_add(nanos))
            });
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);
    }
}
