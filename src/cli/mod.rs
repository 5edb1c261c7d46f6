pub mod args;
pub mod console;

pub use args::Cli;
pub use console::{execute_command, parse_command, run_console, ConsoleCommand};
