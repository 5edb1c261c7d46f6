use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file
    #[arg(long, default_value = "erma.yaml")]
    pub config: PathBuf,

    /// Wait for an explicit `startup` command instead of starting immediately
    #[arg(long)]
    pub manual: bool,

    /// Enable debug logging for internal details
    #[arg(short, long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["erma"]);
        assert_eq!(cli.config, PathBuf::from("erma.yaml"));
        assert!(!cli.manual);
        assert!(!cli.debug);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["erma", "--config", "ops.yaml", "--manual", "-d"]);
        assert_eq!(cli.config, PathBuf::from("ops.yaml"));
        assert!(cli.manual);
        assert!(cli.debug);
    }
}
