use crate::level::MonitoringLevel;
use crate::processor::{JsonFileProcessor, LoggingProcessor, MonitorProcessor};
use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorKind {
    Logging,
    JsonFile,
}

// YAML structure for loading processor configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ProcessorConfig {
    pub name: String,
    pub kind: ProcessorKind,
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Minimum level this processor receives
    #[serde(default)]
    pub level: Option<MonitoringLevel>,
}

impl ProcessorConfig {
    /// Build the runtime processor described by this entry
    pub fn build(&self) -> Result<Arc<dyn MonitorProcessor>> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Processor name cannot be empty");
        }

        let processor: Arc<dyn MonitorProcessor> = match self.kind {
            ProcessorKind::Logging => Arc::new(LoggingProcessor::new(&self.name)),
            ProcessorKind::JsonFile => {
                let path = self.path.as_ref().ok_or_else(|| {
                    anyhow::anyhow!("json_file processor '{}' requires 'path'", self.name)
                })?;
                Arc::new(JsonFileProcessor::new(&self.name, path))
            }
        };

        Ok(processor)
    }
}
