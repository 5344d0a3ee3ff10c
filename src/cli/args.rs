//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Placeline address autocomplete CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: placeline.toml)
    #[arg(short = 'C', long, global = true, default_value = "placeline.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Provider API key (overrides config and PLACELINE_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Print cache hits, stale drops and other pipeline details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Type an address and list the suggestions
    #[command(visible_alias = "s")]
    Search {
        /// Text typed into the field
        text: String,

        /// Commit the n-th suggestion (1-based) and print the address as JSON
        #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
        pick: Option<u16>,
    },

    /// Resolve the configured device position to an address
    #[command(visible_alias = "l")]
    Locate,

    /// Drive a widget interactively
    #[command(visible_alias = "r")]
    Repl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_with_pick() {
        let cli = Cli::try_parse_from(["placeline", "search", "1600 Amphi", "--pick", "2"]).unwrap();
        match cli.command {
            Commands::Search { text, pick } => {
                assert_eq!(text, "1600 Amphi");
                assert_eq!(pick, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from("placeline.toml"));
    }

    #[test]
    fn test_pick_is_one_based() {
        assert!(Cli::try_parse_from(["placeline", "search", "x", "--pick", "0"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["placeline", "locate", "--api-key", "k", "-v"]).unwrap();
        assert!(matches!(cli.command, Commands::Locate));
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert!(cli.verbose);
    }
}
