//! Management surface over the monitoring engine's lifecycle and levels
//!
//! The manager owns:
//! - the enabled flag pushed into the engine at startup
//! - the periodic tasks and the scheduler that runs them
//! - the processor factory and decomposer handed to the engine

pub mod error;
pub mod scheduler;

pub use error::ManagerError;
pub use scheduler::{ScheduleConfig, Scheduler, DEFAULT_TASK_INTERVAL};

use crate::decomposer::{AttributeDecomposer, Decomposer};
use crate::engine::MonitoringEngine;
use crate::level::MonitoringLevel;
use crate::monitor::EventMonitor;
use crate::processor::{MonitorProcessorFactory, SimpleMonitorProcessorFactory};
use crate::task::PeriodicTask;
use std::sync::Arc;
use tracing::{info, warn};

/// Name of the monitor fired on startup, shutdown and reload
pub const LIFECYCLE_MONITOR: &str = "MonitoringEngineManager.lifecycle";

pub struct MonitoringEngineManager {
    engine: Arc<MonitoringEngine>,
    factory: Arc<dyn MonitorProcessorFactory>,
    decomposer: Arc<dyn Decomposer>,
    periodic_tasks: Vec<Arc<dyn PeriodicTask>>,
    monitoring_enabled: bool,
    schedule: ScheduleConfig,
    scheduler: Option<Scheduler>,
}

impl Default for MonitoringEngineManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitoringEngineManager {
    /// Manager over the global engine with no processors
    pub fn new() -> Self {
        Self::with_factory(Arc::new(SimpleMonitorProcessorFactory::default()))
    }

    pub fn with_factory(factory: Arc<dyn MonitorProcessorFactory>) -> Self {
        Self::with_collaborators(factory, None)
    }

    /// A missing decomposer defaults to [`AttributeDecomposer`]
    pub fn with_collaborators(
        factory: Arc<dyn MonitorProcessorFactory>,
        decomposer: Option<Arc<dyn Decomposer>>,
    ) -> Self {
        let decomposer = decomposer.unwrap_or_else(|| Arc::new(AttributeDecomposer::new()));

        Self {
            engine: MonitoringEngine::global(),
            factory,
            decomposer,
            periodic_tasks: Vec::new(),
            monitoring_enabled: true,
            schedule: ScheduleConfig::default(),
            scheduler: None,
        }
    }

    /// Drive `engine` instead of the global one
    pub fn with_engine(mut self, engine: Arc<MonitoringEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_schedule(mut self, schedule: ScheduleConfig) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn engine(&self) -> &Arc<MonitoringEngine> {
        &self.engine
    }

    pub fn is_started(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Configure the engine, start it, and schedule every periodic task.
    ///
    /// Calling this again registers the tasks again on a fresh scheduler.
    pub async fn startup(&mut self) {
        self.engine
            .set_monitoring_enabled(self.monitoring_enabled)
            .await;
        self.engine
            .set_processor_factory(Arc::clone(&self.factory))
            .await;
        self.engine
            .set_decomposer(Arc::clone(&self.decomposer))
            .await;

        self.engine.startup().await;
        self.fire_lifecycle("startup").await;

        if let Some(previous) = self.scheduler.take() {
            warn!(
                "Startup called while running; replacing scheduler with {} tasks",
                previous.task_count()
            );
            previous.shutdown();
        }

        let scheduler = Scheduler::start(&self.periodic_tasks, self.schedule);
        info!(
            "🚀 Monitoring engine manager started ({} periodic tasks)",
            scheduler.task_count()
        );
        self.scheduler = Some(scheduler);
    }

    /// Stop the scheduler, then the engine. Fails when not started.
    pub async fn shutdown(&mut self) -> Result<(), ManagerError> {
        let scheduler = self.scheduler.take().ok_or(ManagerError::NotStarted)?;
        scheduler.shutdown();

        self.fire_lifecycle("shutdown").await;
        self.engine.shutdown().await;

        info!("🛑 Monitoring engine manager stopped");
        Ok(())
    }

    /// Restart the engine in place; scheduled tasks keep running
    pub async fn reload(&self) {
        self.fire_lifecycle("reload").await;
        self.engine.restart().await;
        info!("🔄 Monitoring engine reloaded");
    }

    pub fn periodic_tasks(&self) -> &[Arc<dyn PeriodicTask>] {
        &self.periodic_tasks
    }

    /// Replace the task list; takes effect at the next startup
    pub fn set_periodic_tasks(&mut self, tasks: Vec<Arc<dyn PeriodicTask>>) {
        self.periodic_tasks = tasks;
    }

    /// Enable or disable recording of all monitors; applied at startup
    pub fn set_monitoring_enabled(&mut self, enabled: bool) {
        self.monitoring_enabled = enabled;
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring_enabled
    }

    /// Set the level at which monitors are counted into event patterns
    pub async fn update_event_pattern_monitoring_level(
        &self,
        level: &str,
    ) -> Result<(), ManagerError> {
        let level = parse_level(Some(level))?;
        self.engine.set_event_pattern_monitoring_level(level).await;
        Ok(())
    }

    pub async fn event_pattern_monitoring_level(&self) -> String {
        self.engine
            .event_pattern_monitoring_level()
            .await
            .to_string()
    }

    pub async fn override_monitor_levels_listing(&self) -> String {
        self.engine.override_monitor_levels_listing().await
    }

    pub async fn override_processor_levels_listing(&self) -> String {
        self.engine.override_processor_levels_listing().await
    }

    /// Override the level of every monitor whose name starts with `name_starts_with`
    pub async fn update_level_for_monitor(
        &self,
        name_starts_with: Option<&str>,
        level: Option<&str>,
    ) -> Result<(), ManagerError> {
        let prefix =
            name_starts_with.ok_or_else(|| ManagerError::invalid("name prefix cannot be null"))?;
        let level = parse_level(level)?;

        self.engine.add_monitor_level(prefix, level).await;
        info!(
            "Added: {} -> {} to map of monitor level overrides",
            prefix, level
        );
        Ok(())
    }

    /// Assign a level to the processor named `name` (case-insensitive).
    ///
    /// Unknown processor names are ignored.
    pub async fn add_level_for_processor(
        &self,
        name: Option<&str>,
        level: Option<&str>,
    ) -> Result<(), ManagerError> {
        let name = name.ok_or_else(|| ManagerError::invalid("processor name cannot be null"))?;
        let level = parse_level(level)?;

        let known = self
            .factory
            .all_processors()
            .iter()
            .any(|processor| processor.name().eq_ignore_ascii_case(name));
        if known {
            self.engine.add_processor_level(name, level).await;
            info!("Changed processor level: {} -> {}", name, level);
        }
        Ok(())
    }

    async fn fire_lifecycle(&self, event_type: &str) {
        let mut monitor = EventMonitor::new(LIFECYCLE_MONITOR, MonitoringLevel::Essential);
        monitor.set("eventType", event_type);
        monitor.fire(&self.engine).await;
    }
}

fn parse_level(level: Option<&str>) -> Result<MonitoringLevel, ManagerError> {
    level
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ManagerError::invalid("level must match an existing monitoring level"))
}

impl std::fmt::Debug for MonitoringEngineManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoringEngineManager")
            .field("monitoring_enabled", &self.monitoring_enabled)
            .field(
                "periodic_tasks",
                &self.periodic_tasks.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .field("schedule", &self.schedule)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
