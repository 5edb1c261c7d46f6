//! Append-only JSON-lines processor

use super::MonitorProcessor;
use crate::monitor::ProcessedMonitor;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Appends each monitor as one JSON object per line
pub struct JsonFileProcessor {
    name: String,
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl JsonFileProcessor {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open monitor log: {}", self.path.display()))
    }
}

#[async_trait]
impl MonitorProcessor for JsonFileProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn on_startup(&self) -> Result<()> {
        let mut guard = self.file.lock().await;
        if guard.is_none() {
            *guard = Some(self.open().await?);
            info!("Opened monitor log: {}", self.path.display());
        }
        Ok(())
    }

    async fn on_shutdown(&self) -> Result<()> {
        let mut guard = self.file.lock().await;
        if let Some(mut file) = guard.take() {
            file.flush().await?;
            debug!("Closed monitor log: {}", self.path.display());
        }
        Ok(())
    }

    async fn process(&self, monitor: &ProcessedMonitor) -> Result<()> {
        let mut line = serde_json::to_string(monitor)?;
        line.push('\n');

        let mut guard = self.file.lock().await;
        if guard.is_none() {
            *guard = Some(self.open().await?);
        }
        if let Some(file) = guard.as_mut() {
            file.write_all(line.as_bytes()).await?;
            file.flush().await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for JsonFileProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileProcessor")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}
