use super::MonitorProcessor;
use crate::monitor::ProcessedMonitor;
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Writes every monitor it receives to the tracing log
#[derive(Debug, Clone)]
pub struct LoggingProcessor {
    name: String,
}

impl LoggingProcessor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl MonitorProcessor for LoggingProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn process(&self, monitor: &ProcessedMonitor) -> Result<()> {
        let attributes = serde_json::to_string(&monitor.attributes)?;
        info!(
            processor = %self.name,
            level = %monitor.level,
            "📈 {} {}",
            monitor.name,
            attributes
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::MonitoringLevel;
    use crate::monitor::Attributes;

    #[tokio::test]
    async fn test_logging_processor_accepts_monitors() {
        let processor = LoggingProcessor::new("log");
        let monitor = ProcessedMonitor::new(
            "a.b".to_string(),
            MonitoringLevel::Info,
            Attributes::new(),
        );

        assert_eq!(processor.name(), "log");
        assert!(processor.on_startup().await.is_ok());
        assert!(processor.process(&monitor).await.is_ok());
        assert!(processor.on_shutdown().await.is_ok());
    }
}
