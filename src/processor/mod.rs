//! Monitor processors and the factories that supply them to the engine

pub mod factory;
pub mod json_file;
pub mod logging;

pub use factory::SimpleMonitorProcessorFactory;
pub use json_file::JsonFileProcessor;
pub use logging::LoggingProcessor;

use crate::monitor::ProcessedMonitor;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A pluggable consumer of monitoring events, identified by name
#[async_trait]
pub trait MonitorProcessor: Send + Sync {
    fn name(&self) -> &str;

    async fn on_startup(&self) -> Result<()> {
        Ok(())
    }

    async fn on_shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn process(&self, monitor: &ProcessedMonitor) -> Result<()>;
}

/// Supplies the processors the engine dispatches to
pub trait MonitorProcessorFactory: Send + Sync {
    /// Every processor known to the factory, in registration order
    fn all_processors(&self) -> Vec<Arc<dyn MonitorProcessor>>;
}
