use crate::engine::MonitoringEngine;
use crate::level::MonitoringLevel;
use crate::task::{CommandTask, HeartbeatTask, PeriodicTask};
use anyhow::Result;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Command,
    Heartbeat,
}

// YAML structure for loading periodic task configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TaskConfig {
    pub name: String,
    pub kind: TaskKind,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub level: MonitoringLevel,
}

impl TaskConfig {
    /// Build the runtime task; heartbeats fire into `engine`
    pub fn build(&self, engine: &Arc<MonitoringEngine>) -> Result<Arc<dyn PeriodicTask>> {
        let task: Arc<dyn PeriodicTask> = match self.kind {
            TaskKind::Command => {
                let command = self
                    .command
                    .as_deref()
                    .filter(|c| !c.trim().is_empty())
                    .ok_or_else(|| {
                        anyhow::anyhow!("command task '{}' requires 'command'", self.name)
                    })?;
                Arc::new(CommandTask::new(&self.name, command))
            }
            TaskKind::Heartbeat => Arc::new(HeartbeatTask::new(
                &self.name,
                self.level,
                Arc::clone(engine),
            )),
        };

        Ok(task)
    }
}
