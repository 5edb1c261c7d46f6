pub mod cli;
pub mod config;
pub mod decomposer;
pub mod engine;
pub mod level;
pub mod manager;
pub mod monitor;
pub mod processor;
pub mod task;

// Public API
pub use config::Config;
pub use decomposer::{AttributeDecomposer, Decomposer};
pub use engine::MonitoringEngine;
pub use level::{LevelParseError, MonitoringLevel};
pub use manager::{ManagerError, MonitoringEngineManager, ScheduleConfig, Scheduler};
pub use monitor::{Attributes, EventMonitor, ProcessedMonitor};
pub use processor::{MonitorProcessor, MonitorProcessorFactory, SimpleMonitorProcessorFactory};
pub use task::PeriodicTask;
