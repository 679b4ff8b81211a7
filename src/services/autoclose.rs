//! Background sweep that cancels tasks whose deadline has passed.
//!
//! The sweep lists overdue, non-terminal tasks and marks each one
//! `cancelled` individually so a single bad row cannot poison the whole
//! run. Re-running a sweep is safe: closed tasks are no longer overdue
//! and are never touched again.

use crate::error::RepositoryResult;
use crate::ports::TaskRepository;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Default pause between scheduled sweeps.
pub const DEFAULT_RUN_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Outcome of a single auto-close sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoCloseReport {
    /// Number of tasks transitioned to `cancelled`.
    pub closed: u64,
    /// Number of tasks whose close attempt failed and was skipped.
    pub failed: u64,
}

/// Job that closes overdue tasks, either once or on a schedule.
#[derive(Clone)]
pub struct AutoCloseJob<T, C>
where
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<T, C> AutoCloseJob<T, C>
where
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new auto-close job.
    #[must_use]
    pub const fn new(tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self { tasks, clock }
    }

    /// Runs one sweep against the given instant.
    ///
    /// Tasks that fail to close are logged and skipped; the sweep carries
    /// on and reports them in [`AutoCloseReport::failed`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::Connection`] and abandons
    /// the sweep when the storage backend becomes unreachable; partial
    /// progress before the failure is kept.
    pub async fn run(&self, now: DateTime<Utc>) -> RepositoryResult<AutoCloseReport> {
        let overdue = self.tasks.list_overdue(now).await?;
        if overdue.is_empty() {
            tracing::debug!("auto-close sweep at {now}: no overdue tasks");
            return Ok(AutoCloseReport::default());
        }

        let total = overdue.len();
        let mut report = AutoCloseReport::default();
        for task in overdue {
            match self.tasks.mark_closed(task.id(), now).await {
                Ok(true) => {
                    report.closed += 1;
                    tracing::info!(
                        "auto-closed overdue task {} in project {}",
                        task.id(),
                        task.project_id(),
                    );
                }
                Ok(false) => {
                    // Listed as overdue but finished (or vanished) before the
                    // close landed; nothing to do.
                    tracing::debug!("task {} no longer eligible for auto-close", task.id());
                }
                Err(err) if err.is_connection() => {
                    tracing::error!(
                        "auto-close sweep aborted after {} of {total} tasks: {err}",
                        report.closed,
                    );
                    return Err(err);
                }
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!("failed to auto-close task {}: {err}", task.id());
                }
            }
        }

        tracing::info!(
            "auto-close sweep closed {} of {total} overdue tasks",
            report.closed,
        );
        Ok(report)
    }

    /// Runs one sweep against the injected clock's current time.
    ///
    /// # Errors
    ///
    /// Propagates the same connection failures as [`Self::run`].
    pub async fn tick(&self) -> RepositoryResult<AutoCloseReport> {
        self.run(self.clock.utc()).await
    }

    /// Sweeps immediately, then repeats every `period` until the owning
    /// task is dropped. Failed sweeps are logged and the schedule keeps
    /// going; a sweep that overruns its slot skips the missed ticks
    /// rather than bunching them up.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero, per [`tokio::time::interval`].
    pub async fn run_every(&self, period: Duration) {
        let mut ticks = tokio::time::interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticks.tick().await;
            if let Err(err) = self.tick().await {
                tracing::error!("scheduled auto-close sweep failed: {err}");
            }
        }
    }
}
