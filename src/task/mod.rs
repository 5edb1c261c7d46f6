//! Background jobs run by the manager's scheduler

pub mod command;
pub mod heartbeat;

pub use command::CommandTask;
pub use heartbeat::HeartbeatTask;

use anyhow::Result;
use async_trait::async_trait;

/// A unit of work run at a fixed rate once the manager has started
#[async_trait]
pub trait PeriodicTask: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> Result<()>;
}
