use super::{MonitorProcessor, MonitorProcessorFactory};
use std::sync::Arc;

/// Factory over a fixed list of processors
#[derive(Default, Clone)]
pub struct SimpleMonitorProcessorFactory {
    processors: Vec<Arc<dyn MonitorProcessor>>,
}

impl SimpleMonitorProcessorFactory {
    pub fn new(processors: Vec<Arc<dyn MonitorProcessor>>) -> Self {
        Self { processors }
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl MonitorProcessorFactory for SimpleMonitorProcessorFactory {
    fn all_processors(&self) -> Vec<Arc<dyn MonitorProcessor>> {
        self.processors.clone()
    }
}

impl std::fmt::Debug for SimpleMonitorProcessorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleMonitorProcessorFactory")
            .field(
                "processors",
                &self.processors.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
