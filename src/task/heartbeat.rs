use super::PeriodicTask;
use crate::engine::MonitoringEngine;
use crate::level::MonitoringLevel;
use crate::monitor::EventMonitor;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Fires a monitor named after the task, counting its beats
pub struct HeartbeatTask {
    name: String,
    level: MonitoringLevel,
    engine: Arc<MonitoringEngine>,
    count: AtomicU64,
}

impl HeartbeatTask {
    pub fn new(name: impl Into<String>, level: MonitoringLevel, engine: Arc<MonitoringEngine>) -> Self {
        Self {
            name: name.into(),
            level,
            engine,
            count: AtomicU64::new(0),
        }
    }

    pub fn beats(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PeriodicTask for HeartbeatTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> Result<()> {
        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;

        let mut monitor = EventMonitor::new(self.name.clone(), self.level);
        monitor.set("eventType", "heartbeat").set("count", count);
        monitor.fire(&self.engine).await;
        Ok(())
    }
}

impl std::fmt::Debug for HeartbeatTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeartbeatTask")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("count", &self.beats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_heartbeat_counts_runs() {
        let engine = Arc::new(MonitoringEngine::new());
        let task = HeartbeatTask::new("app.heartbeat", MonitoringLevel::Info, engine);

        task.run().await.unwrap();
        task.run().await.unwrap();
        assert_eq!(task.beats(), 2);
        assert_eq!(task.name(), "app.heartbeat");
    }
}
