//! CLI interface for poly-spike
//!
//! Provides subcommands for:
//! - `run`: Start the scanner (default)
//! - `config`: Print the resolved configuration

mod run;

pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "poly-spike")]
#[command(about = "Momentum alert daemon for Polymarket prediction markets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the scanner
    Run(RunArgs),
    /// Print the resolved configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults() {
        let cli = Cli::try_parse_from(["poly-spike"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_run_with_config_path() {
        let cli = Cli::try_parse_from(["poly-spike", "--config", "/etc/spike.toml", "run"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Run(_))));
        assert_eq!(cli.config, "/etc/spike.toml");
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["poly-spike", "backtest"]).is_err());
    }
}
