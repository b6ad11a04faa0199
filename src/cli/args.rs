//! CLI argument definitions using clap

use clap::{Parser, Subcommand};

/// Application front controller: dispatches by program name, translates failures per frontend
#[derive(Parser, Debug)]
#[command(name = "appfront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show lookup settings and whether config files exist
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// List registered commands and the command map
    Commands,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show config file locations
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_config_show_when_parsed_then_subcommand_matched() {
        let cli = Cli::try_parse_from(["appfront", "config", "show"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: ConfigCommands::Show
            })
        ));
    }
}
