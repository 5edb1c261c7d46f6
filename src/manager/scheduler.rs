//! Fixed-rate scheduling of periodic tasks on the tokio runtime

use super::ManagerError;
use crate::task::PeriodicTask;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Delay before the first run and between runs, in both cases 60 seconds
pub const DEFAULT_TASK_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    initial_delay: Duration,
    period: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_TASK_INTERVAL,
            period: DEFAULT_TASK_INTERVAL,
        }
    }
}

impl ScheduleConfig {
    pub fn new(initial_delay: Duration, period: Duration) -> Result<Self, ManagerError> {
        if period.is_zero() {
            return Err(ManagerError::invalid("task period must be greater than zero"));
        }
        Ok(Self {
            initial_delay,
            period,
        })
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

/// Owns the spawned loops of every scheduled task.
///
/// Each task runs at a fixed rate: ticks missed while a run overran are
/// caught up immediately. Dropping the scheduler cancels it.
pub struct Scheduler {
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawn one loop per task. Must be called within a tokio runtime.
    pub fn start(tasks: &[Arc<dyn PeriodicTask>], schedule: ScheduleConfig) -> Self {
        let cancel = CancellationToken::new();
        let start = Instant::now() + schedule.initial_delay;

        let handles = tasks
            .iter()
            .map(|task| {
                let task = Arc::clone(task);
                let cancel = cancel.clone();

                tokio::spawn(async move {
                    debug!("Scheduling periodic task: {}", task.name());

                    let mut timer = interval_at(start, schedule.period);
                    timer.set_missed_tick_behavior(MissedTickBehavior::Burst);
                    loop {
                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => break,
                            _ = timer.tick() => {}
                        }

                        if let Err(e) = task.run().await {
                            error!("Error running periodic task '{}': {:#}", task.name(), e);
                        }
                    }

                    debug!("Periodic task stopped: {}", task.name());
                })
            })
            .collect();

        Self { cancel, handles }
    }

    pub fn task_count(&self) -> usize {
        self.handles.len()
    }

    pub fn is_shutdown(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Request termination. No run starts after this returns; a run already
    /// in progress is allowed to finish and is not awaited.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("tasks", &self.handles.len())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}
