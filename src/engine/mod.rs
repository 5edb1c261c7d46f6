//! The monitoring engine: level filtering and dispatch of fired monitors

pub mod overrides;

pub use overrides::LevelOverrides;

use crate::decomposer::{AttributeDecomposer, Decomposer};
use crate::level::MonitoringLevel;
use crate::monitor::{EventMonitor, ProcessedMonitor};
use crate::processor::{MonitorProcessor, MonitorProcessorFactory, SimpleMonitorProcessorFactory};
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use tokio::sync::RwLock;
use tracing::{debug, error, info, trace};

/// Attribute added to every processed monitor: whether its effective level
/// reaches the event pattern level.
pub const EVENT_PATTERN_ATTRIBUTE: &str = "eventPatternIncluded";

static GLOBAL_ENGINE: OnceLock<Arc<MonitoringEngine>> = OnceLock::new();

struct EngineState {
    enabled: bool,
    running: bool,
    factory: Arc<dyn MonitorProcessorFactory>,
    decomposer: Arc<dyn Decomposer>,
    event_pattern_level: MonitoringLevel,
    monitor_levels: LevelOverrides,
    processor_levels: LevelOverrides,
}

pub struct MonitoringEngine {
    state: RwLock<EngineState>,
}

impl Default for MonitoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitoringEngine {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(EngineState {
                enabled: true,
                running: false,
                factory: Arc::new(SimpleMonitorProcessorFactory::default()),
                decomposer: Arc::new(AttributeDecomposer::new()),
                event_pattern_level: MonitoringLevel::default(),
                monitor_levels: LevelOverrides::new(),
                processor_levels: LevelOverrides::new(),
            }),
        }
    }

    /// Process-wide engine shared by every manager that does not bring its own
    pub fn global() -> Arc<MonitoringEngine> {
        GLOBAL_ENGINE
            .get_or_init(|| Arc::new(MonitoringEngine::new()))
            .clone()
    }

    pub async fn set_monitoring_enabled(&self, enabled: bool) {
        self.state.write().await.enabled = enabled;
    }

    pub async fn is_monitoring_enabled(&self) -> bool {
        self.state.read().await.enabled
    }

    pub async fn is_running(&self) -> bool {
        self.state.read().await.running
    }

    pub async fn set_processor_factory(&self, factory: Arc<dyn MonitorProcessorFactory>) {
        self.state.write().await.factory = factory;
    }

    pub async fn set_decomposer(&self, decomposer: Arc<dyn Decomposer>) {
        self.state.write().await.decomposer = decomposer;
    }

    /// Start every processor and begin accepting monitors
    pub async fn startup(&self) {
        let processors = self.state.read().await.factory.all_processors();
        for processor in &processors {
            if let Err(e) = processor.on_startup().await {
                error!("Processor '{}' failed to start: {:#}", processor.name(), e);
            }
        }

        self.state.write().await.running = true;
        info!("Monitoring engine started with {} processors", processors.len());
    }

    /// Stop accepting monitors and shut every processor down
    pub async fn shutdown(&self) {
        let processors = {
            let mut state = self.state.write().await;
            state.running = false;
            state.factory.all_processors()
        };

        for processor in &processors {
            if let Err(e) = processor.on_shutdown().await {
                error!("Processor '{}' failed to shut down: {:#}", processor.name(), e);
            }
        }
        info!("Monitoring engine stopped");
    }

    pub async fn restart(&self) {
        debug!("Restarting monitoring engine");
        self.shutdown().await;
        self.startup().await;
    }

    pub async fn set_event_pattern_monitoring_level(&self, level: MonitoringLevel) {
        self.state.write().await.event_pattern_level = level;
    }

    pub async fn event_pattern_monitoring_level(&self) -> MonitoringLevel {
        self.state.read().await.event_pattern_level
    }

    /// Override the level of every monitor whose name starts with `prefix`
    pub async fn add_monitor_level(&self, prefix: &str, level: MonitoringLevel) {
        self.state.write().await.monitor_levels.insert(prefix, level);
    }

    /// Set the minimum level a processor receives; replaces any override for
    /// the same name in different case
    pub async fn add_processor_level(&self, name: &str, level: MonitoringLevel) {
        self.state
            .write()
            .await
            .processor_levels
            .insert_ignore_case(name, level);
    }

    pub async fn override_monitor_levels_listing(&self) -> String {
        self.state.read().await.monitor_levels.listing()
    }

    pub async fn override_processor_levels_listing(&self) -> String {
        self.state.read().await.processor_levels.listing()
    }

    /// Apply level overrides and decomposition, then dispatch to processors
    pub async fn process(&self, monitor: EventMonitor) {
        let (targets, processed) = {
            let state = self.state.read().await;
            if !state.enabled || !state.running {
                trace!("Dropping monitor '{}': engine inactive", monitor.name());
                return;
            }

            let level = state
                .monitor_levels
                .longest_prefix_match(monitor.name())
                .unwrap_or_else(|| monitor.level());

            let mut attributes = state.decomposer.decompose(monitor.attributes());
            attributes.insert(
                EVENT_PATTERN_ATTRIBUTE.to_string(),
                Value::Bool(level.passes(state.event_pattern_level)),
            );

            let targets: Vec<Arc<dyn MonitorProcessor>> = state
                .factory
                .all_processors()
                .into_iter()
                .filter(|processor| {
                    let threshold = state
                        .processor_levels
                        .get_ignore_case(processor.name())
                        .unwrap_or(MonitoringLevel::Debug);
                    level.passes(threshold)
                })
                .collect();

            let name = monitor.name().to_string();
            (targets, ProcessedMonitor::new(name, level, attributes))
        };

        for processor in targets {
            if let Err(e) = processor.process(&processed).await {
                error!(
                    "Processor '{}' failed on monitor '{}': {:#}",
                    processor.name(),
                    processed.name,
                    e
                );
            }
        }
    }
}

impl std::fmt::Debug for MonitoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoringEngine").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        name: String,
        seen: Mutex<Vec<ProcessedMonitor>>,
        startups: AtomicUsize,
        shutdowns: AtomicUsize,
    }

    impl Recorder {
        fn named(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                ..Default::default()
            })
        }

        async fn names(&self) -> Vec<String> {
            self.seen.lock().await.iter().map(|m| m.name.clone()).collect()
        }
    }

    #[async_trait]
    impl MonitorProcessor for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        async fn on_startup(&self) -> Result<()> {
            self.startups.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn on_shutdown(&self) -> Result<()> {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn process(&self, monitor: &ProcessedMonitor) -> Result<()> {
            self.seen.lock().await.push(monitor.clone());
            Ok(())
        }
    }

    async fn engine_with(processors: Vec<Arc<Recorder>>) -> MonitoringEngine {
        let engine = MonitoringEngine::new();
        let processors = processors
            .into_iter()
            .map(|p| p as Arc<dyn MonitorProcessor>)
            .collect();
        engine
            .set_processor_factory(Arc::new(SimpleMonitorProcessorFactory::new(processors)))
            .await;
        engine
    }

    #[tokio::test]
    async fn test_monitors_dropped_until_started() {
        let recorder = Recorder::named("rec");
        let engine = engine_with(vec![recorder.clone()]).await;

        EventMonitor::new("early", MonitoringLevel::Essential)
            .fire(&engine)
            .await;
        engine.startup().await;
        EventMonitor::new("late", MonitoringLevel::Essential)
            .fire(&engine)
            .await;

        assert_eq!(recorder.names().await, vec!["late"]);
        assert_eq!(recorder.startups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_engine_ignores_monitors() {
        let recorder = Recorder::named("rec");
        let engine = engine_with(vec![recorder.clone()]).await;
        engine.set_monitoring_enabled(false).await;
        engine.startup().await;

        EventMonitor::new("ignored", MonitoringLevel::Essential)
            .fire(&engine)
            .await;
        assert!(recorder.names().await.is_empty());
        assert!(!engine.is_monitoring_enabled().await);
    }

    #[tokio::test]
    async fn test_processor_level_filters_case_insensitively() {
        let quiet = Recorder::named("Quiet");
        let loud = Recorder::named("loud");
        let engine = engine_with(vec![quiet.clone(), loud.clone()]).await;
        engine.add_processor_level("quiet", MonitoringLevel::Essential).await;
        engine.startup().await;

        EventMonitor::new("info.event", MonitoringLevel::Info)
            .fire(&engine)
            .await;
        EventMonitor::new("essential.event", MonitoringLevel::Essential)
            .fire(&engine)
            .await;

        assert_eq!(quiet.names().await, vec!["essential.event"]);
        assert_eq!(loud.names().await, vec!["info.event", "essential.event"]);
    }

    #[tokio::test]
    async fn test_latest_processor_level_wins_across_casing() {
        let recorder = Recorder::named("FileLogger");
        let engine = engine_with(vec![recorder.clone()]).await;
        engine.add_processor_level("FileLogger", MonitoringLevel::Debug).await;
        engine.add_processor_level("filelogger", MonitoringLevel::Essential).await;
        engine.startup().await;

        EventMonitor::new("info.event", MonitoringLevel::Info)
            .fire(&engine)
            .await;
        EventMonitor::new("essential.event", MonitoringLevel::Essential)
            .fire(&engine)
            .await;

        assert_eq!(recorder.names().await, vec!["essential.event"]);
        assert_eq!(
            engine.override_processor_levels_listing().await,
            "filelogger -> ESSENTIAL"
        );
    }

    #[tokio::test]
    async fn test_monitor_prefix_override_sets_effective_level() {
        let recorder = Recorder::named("rec");
        let engine = engine_with(vec![recorder.clone()]).await;
        engine.add_processor_level("rec", MonitoringLevel::Info).await;
        engine.add_monitor_level("search", MonitoringLevel::Debug).await;
        engine.add_monitor_level("search.index", MonitoringLevel::Essential).await;
        engine.startup().await;

        EventMonitor::new("search.query", MonitoringLevel::Essential)
            .fire(&engine)
            .await;
        EventMonitor::new("search.index.rebuild", MonitoringLevel::Debug)
            .fire(&engine)
            .await;

        let seen = recorder.seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].name, "search.index.rebuild");
        assert_eq!(seen[0].level, MonitoringLevel::Essential);
    }

    #[tokio::test]
    async fn test_event_pattern_attribute_and_decomposition() {
        let recorder = Recorder::named("rec");
        let engine = engine_with(vec![recorder.clone()]).await;
        engine
            .set_event_pattern_monitoring_level(MonitoringLevel::Essential)
            .await;
        engine.startup().await;

        let mut monitor = EventMonitor::new("order", MonitoringLevel::Info);
        monitor.set("detail", serde_json::json!({"id": 9}));
        monitor.fire(&engine).await;
        EventMonitor::new("order.done", MonitoringLevel::Essential)
            .fire(&engine)
            .await;

        let seen = recorder.seen.lock().await;
        assert_eq!(seen[0].get("detail.id"), Some(&serde_json::json!(9)));
        assert_eq!(seen[0].get(EVENT_PATTERN_ATTRIBUTE), Some(&Value::Bool(false)));
        assert_eq!(seen[1].get(EVENT_PATTERN_ATTRIBUTE), Some(&Value::Bool(true)));
    }

    #[tokio::test]
    async fn test_restart_cycles_processors() {
        let recorder = Recorder::named("rec");
        let engine = engine_with(vec![recorder.clone()]).await;
        engine.startup().await;
        engine.restart().await;

        assert!(engine.is_running().await);
        assert_eq!(recorder.startups.load(Ordering::SeqCst), 2);
        assert_eq!(recorder.shutdowns.load(Ordering::SeqCst), 1);

        engine.shutdown().await;
        assert!(!engine.is_running().await);
    }

    #[tokio::test]
    async fn test_listings_and_defaults() {
        let engine = MonitoringEngine::new();
        assert_eq!(
            engine.event_pattern_monitoring_level().await,
            MonitoringLevel::Info
        );
        assert_eq!(engine.override_monitor_levels_listing().await, "");

        engine.add_monitor_level("a", MonitoringLevel::Debug).await;
        engine.add_processor_level("p", MonitoringLevel::Essential).await;
        assert_eq!(engine.override_monitor_levels_listing().await, "a -> DEBUG");
        assert_eq!(engine.override_processor_levels_listing().await, "p -> ESSENTIAL");
    }

    #[test]
    fn test_global_is_shared() {
        assert!(Arc::ptr_eq(&MonitoringEngine::global(), &MonitoringEngine::global()));
    }
}
