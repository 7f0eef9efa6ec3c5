use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::Config;
use crate::tui;
use super::render::RenderCommand;

/// Dialog Stack - step through a stack of modal dialogs in your terminal
#[derive(Debug, Parser)]
#[command(
    name = "dialog-stack",
    version,
    about = "Step through a stack of modal dialogs in your terminal",
    long_about = r#"Dialog Stack shows a sequence of dialogs as a cascading stack.
Each earlier dialog peeks out from behind the active one.

Examples:
  dialog-stack                                   # Start interactive mode
  dialog-stack render --actions open,next,next   # Print the stack after three steps
  dialog-stack --config ./dialogs.json           # Use a custom dialog sequence"#
)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the stack to stdout after a series of actions
    Render(RenderCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        // Initialize configuration
        let config = Config::init(self.config.as_deref()).await?;
        debug!(dialogs = config.dialogs.len(), "Configuration initialized");

        match self.command {
            Some(Commands::Render(render_cmd)) => render_cmd.execute(&config).await,
            None => self.start_interactive_mode(&config).await,
        }
    }

    async fn start_interactive_mode(&self, config: &Config) -> Result<()> {
        info!("Starting interactive mode");

        tui::run(config).await?;

        info!("Application finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["dialog-stack", "--debug"]).unwrap();
        assert!(cli.debug);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["dialog-stack", "render", "--config", "dialogs.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dialogs.json")));
        assert!(matches!(cli.command, Some(Commands::Render(_))));
    }
}
