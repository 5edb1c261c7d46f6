pub mod helper;
pub mod processors_config;
pub mod tasks_config;

use crate::config::helper::parse_duration;
use crate::config::processors_config::ProcessorConfig;
use crate::config::tasks_config::TaskConfig;
use crate::engine::MonitoringEngine;
use crate::level::MonitoringLevel;
use crate::manager::{MonitoringEngineManager, ScheduleConfig};
use crate::processor::{MonitorProcessor, SimpleMonitorProcessorFactory};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Main configuration structure matching erma.yaml format
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub processors: Vec<ProcessorConfig>,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MonitoringConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub event_pattern_level: MonitoringLevel,
    /// Monitor-name prefix -> level overrides applied before startup
    #[serde(default)]
    pub monitor_levels: BTreeMap<String, MonitoringLevel>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    #[serde(default = "default_interval")]
    pub initial_delay: String,
    #[serde(default = "default_interval")]
    pub period: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            event_pattern_level: MonitoringLevel::default(),
            monitor_levels: BTreeMap::new(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_delay: default_interval(),
            period: default_interval(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> String {
    "60s".to_string()
}

impl SchedulerConfig {
    pub fn schedule(&self) -> Result<ScheduleConfig> {
        let initial_delay = parse_duration(&self.initial_delay)
            .with_context(|| format!("Invalid scheduler.initial_delay: {}", self.initial_delay))?;
        let period = parse_duration(&self.period)
            .with_context(|| format!("Invalid scheduler.period: {}", self.period))?;
        Ok(ScheduleConfig::new(initial_delay, period)?)
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_yaml(&content)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!(
                "Config file not found, using defaults: {}",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::from_file(config_path)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config =
            serde_yaml::from_str(content).with_context(|| "Failed to parse YAML config file")?;
        Ok(config)
    }

    /// Build processors, rejecting names that collide case-insensitively
    pub fn parse_processors(&self) -> Result<Vec<Arc<dyn MonitorProcessor>>> {
        let mut processors: Vec<Arc<dyn MonitorProcessor>> = Vec::new();
        for processor_config in &self.processors {
            let processor = processor_config
                .build()
                .with_context(|| format!("Failed to build processor: {}", processor_config.name))?;

            if processors
                .iter()
                .any(|p| p.name().eq_ignore_ascii_case(processor.name()))
            {
                anyhow::bail!("Duplicate processor name: {}", processor_config.name);
            }
            processors.push(processor);
        }
        Ok(processors)
    }

    /// Build a manager driving `engine`, with every configured level applied
    pub async fn build_manager(
        &self,
        engine: Arc<MonitoringEngine>,
    ) -> Result<MonitoringEngineManager> {
        let processors = self.parse_processors()?;
        let factory = Arc::new(SimpleMonitorProcessorFactory::new(processors));

        let mut tasks = Vec::new();
        for task_config in &self.tasks {
            let task = task_config
                .build(&engine)
                .with_context(|| format!("Failed to build task: {}", task_config.name))?;
            tasks.push(task);
        }

        let mut manager = MonitoringEngineManager::with_factory(factory)
            .with_engine(engine)
            .with_schedule(self.scheduler.schedule()?);
        manager.set_monitoring_enabled(self.monitoring.enabled);
        manager.set_periodic_tasks(tasks);

        manager
            .update_event_pattern_monitoring_level(self.monitoring.event_pattern_level.as_str())
            .await?;
        for (prefix, level) in &self.monitoring.monitor_levels {
            manager
                .update_level_for_monitor(Some(prefix.as_str()), Some(level.as_str()))
                .await?;
        }
        for processor_config in &self.processors {
            if let Some(level) = processor_config.level {
                manager
                    .add_level_for_processor(Some(processor_config.name.as_str()), Some(level.as_str()))
                    .await?;
            }
        }

        Ok(manager)
    }
}
