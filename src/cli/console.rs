//! Line-oriented operations console driving the manager

use crate::level::MonitoringLevel;
use crate::manager::MonitoringEngineManager;
use crate::monitor::EventMonitor;
use anyhow::{anyhow, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

const HELP: &str = "\
commands:
  startup                      start the engine and scheduled tasks
  shutdown                     stop scheduled tasks and the engine
  reload                       restart the engine in place
  enabled [true|false]         show or set monitoring (applied at startup)
  pattern-level [LEVEL]        show or set the event pattern level
  monitor-level PREFIX LEVEL   override level for monitors starting with PREFIX
  processor-level NAME LEVEL   set the minimum level for a processor
  monitor-levels               list monitor level overrides
  processor-levels             list processor level overrides
  tasks                        list periodic tasks
  fire NAME [LEVEL]            fire a test monitor
  help                         show this text
  quit                         leave the console";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Empty,
    Startup,
    Shutdown,
    Reload,
    Enabled(Option<bool>),
    PatternLevel(Option<String>),
    MonitorLevel {
        prefix: Option<String>,
        level: Option<String>,
    },
    ProcessorLevel {
        name: Option<String>,
        level: Option<String>,
    },
    MonitorLevels,
    ProcessorLevels,
    Tasks,
    Fire {
        name: Option<String>,
        level: Option<String>,
    },
    Help,
    Quit,
}

/// Parse one console line. Missing arguments are kept as `None` so the
/// manager can reject them.
pub fn parse_command(line: &str) -> Result<ConsoleCommand> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(ConsoleCommand::Empty);
    };
    let mut arg = || parts.next().map(str::to_string);

    let command = match verb.to_ascii_lowercase().as_str() {
        "startup" | "start" => ConsoleCommand::Startup,
        "shutdown" | "stop" => ConsoleCommand::Shutdown,
        "reload" => ConsoleCommand::Reload,
        "enabled" => {
            let value = match arg() {
                None => None,
                Some(v) => Some(
                    v.parse::<bool>()
                        .map_err(|_| anyhow!("enabled expects 'true' or 'false', got: {}", v))?,
                ),
            };
            ConsoleCommand::Enabled(value)
        }
        "pattern-level" => ConsoleCommand::PatternLevel(arg()),
        "monitor-level" => ConsoleCommand::MonitorLevel {
            prefix: arg(),
            level: arg(),
        },
        "processor-level" => ConsoleCommand::ProcessorLevel {
            name: arg(),
            level: arg(),
        },
        "monitor-levels" => ConsoleCommand::MonitorLevels,
        "processor-levels" => ConsoleCommand::ProcessorLevels,
        "tasks" => ConsoleCommand::Tasks,
        "fire" => ConsoleCommand::Fire {
            name: arg(),
            level: arg(),
        },
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(anyhow!("Unknown command: {} (try 'help')", other)),
    };

    Ok(command)
}

/// Run a parsed command against the manager and describe the outcome
pub async fn execute_command(
    manager: &mut MonitoringEngineManager,
    command: ConsoleCommand,
) -> Result<String> {
    debug!("Console command: {:?}", command);

    let output = match command {
        ConsoleCommand::Empty => String::new(),
        ConsoleCommand::Startup => {
            manager.startup().await;
            "started".to_string()
        }
        ConsoleCommand::Shutdown => {
            manager.shutdown().await?;
            "stopped".to_string()
        }
        ConsoleCommand::Reload => {
            manager.reload().await;
            "reloaded".to_string()
        }
        ConsoleCommand::Enabled(None) => manager.monitoring_enabled().to_string(),
        ConsoleCommand::Enabled(Some(enabled)) => {
            manager.set_monitoring_enabled(enabled);
            format!("enabled = {} (applied at next startup)", enabled)
        }
        ConsoleCommand::PatternLevel(None) => manager.event_pattern_monitoring_level().await,
        ConsoleCommand::PatternLevel(Some(level)) => {
            manager.update_event_pattern_monitoring_level(&level).await?;
            format!("event pattern level = {}", manager.event_pattern_monitoring_level().await)
        }
        ConsoleCommand::MonitorLevel { prefix, level } => {
            manager
                .update_level_for_monitor(prefix.as_deref(), level.as_deref())
                .await?;
            manager.override_monitor_levels_listing().await
        }
        ConsoleCommand::ProcessorLevel { name, level } => {
            manager
                .add_level_for_processor(name.as_deref(), level.as_deref())
                .await?;
            manager.override_processor_levels_listing().await
        }
        ConsoleCommand::MonitorLevels => manager.override_monitor_levels_listing().await,
        ConsoleCommand::ProcessorLevels => manager.override_processor_levels_listing().await,
        ConsoleCommand::Tasks => manager
            .periodic_tasks()
            .iter()
            .map(|task| task.name().to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        ConsoleCommand::Fire { name, level } => {
            let name = name.ok_or_else(|| anyhow!("fire requires a monitor name"))?;
            let level = match level {
                Some(level) => level.parse::<MonitoringLevel>()?,
                None => MonitoringLevel::Info,
            };
            let mut monitor = EventMonitor::new(name.clone(), level);
            monitor.set("eventType", "console");
            monitor.fire(manager.engine()).await;
            format!("fired {} at {}", name, level)
        }
        ConsoleCommand::Help => HELP.to_string(),
        ConsoleCommand::Quit => String::new(),
    };

    Ok(output)
}

/// Read commands from `input` until EOF or `quit`, writing replies to `output`.
///
/// Command errors are reported on `output` and do not end the session.
pub async fn run_console<R, W>(
    manager: &mut MonitoringEngineManager,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let reply = match parse_command(&line) {
            Ok(ConsoleCommand::Quit) => break,
            Ok(command) => match execute_command(manager, command).await {
                Ok(reply) => reply,
                Err(e) => format!("error: {}", e),
            },
            Err(e) => format!("error: {}", e),
        };

        if !reply.is_empty() {
            output.write_all(reply.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
        }
    }
    Ok(())
}
