use super::PeriodicTask;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs a shell command on every tick
#[derive(Debug, Clone)]
pub struct CommandTask {
    name: String,
    command: String,
}

impl CommandTask {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl PeriodicTask for CommandTask {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> Result<()> {
        debug!("Executing task command: {}", self.command);

        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to spawn command: {}", self.command))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Command failed with status {}: {} (stderr: {})",
                output.status,
                self.command,
                stderr.trim()
            );
        }

        debug!(
            "Task '{}' produced {} bytes of output",
            self.name,
            output.stdout.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_command() {
        let task = CommandTask::new("echo", "echo hello");
        assert_eq!(task.name(), "echo");
        assert_eq!(task.command(), "echo hello");
        assert!(task.run().await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_command_reports_stderr() {
        let task = CommandTask::new("fails", "echo broken >&2; exit 3");
        let err = task.run().await.unwrap_err().to_string();
        assert!(err.contains("Command failed"));
        assert!(err.contains("broken"));
    }
}
