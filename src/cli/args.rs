//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Inspect and edit nested UI component layouts (jsLayout)
#[derive(Parser, Debug)]
#[command(name = "jslayout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Root component to operate on (default: config `root`, or the only root)
    #[arg(short, long, global = true)]
    pub root: Option<String>,

    /// Separator between component names in paths (default: config `separator`)
    #[arg(short, long, global = true)]
    pub separator: Option<String>,

    /// Directory searched for a local .jslayout.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the component hierarchy as a tree
    Tree {
        /// Layout JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Only show the subtree at this path
        path: Option<String>,
    },

    /// List the path of every component
    Paths {
        /// Layout JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Only list components without children
        #[arg(long)]
        leaves: bool,
    },

    /// Print a component as JSON
    Get {
        /// Layout JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Component path (default: the root)
        path: Option<String>,
        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Set an attribute of a component
    Set {
        /// Layout JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Component path ("" for the root)
        path: String,
        /// Attribute key, e.g. label or sortOrder
        key: String,
        /// Value as JSON; anything that is not valid JSON is taken as a string
        value: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Remove an attribute of a component
    Unset {
        /// Layout JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Component path ("" for the root)
        path: String,
        /// Attribute key
        key: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Remove a component with all its descendants
    Remove {
        /// Layout JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Component path
        path: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Move a component below another component
    Move {
        /// Layout JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Path of the component to move
        source: String,
        /// Path of the new parent
        destination: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Where edited documents go.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Rewrite the input file instead of printing the document
    #[arg(short, long)]
    pub in_place: bool,

    /// Write compact JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Print a template config file
    Template,
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
    fn given_move_args_when_parsing_then_fields_set() {
        let cli = Cli::try_parse_from([
            "jslayout",
            "--root",
            "checkout",
            "move",
            "layout.json",
            "steps.shipping-step.shippingAddress",
            "steps",
            "--in-place",
        ])
        .unwrap();

        assert_eq!(cli.root.as_deref(), Some("checkout"));
        match cli.command {
            Some(Commands::Move {
                source,
                destination,
                output,
                ..
            }) => {
                assert_eq!(source, "steps.shipping-step.shippingAddress");
                assert_eq!(destination, "steps");
                assert!(output.in_place);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn given_get_with_compact_when_parsing_then_flag_set() {
        let cli = Cli::try_parse_from(["jslayout", "get", "layout.json", "steps", "--compact"])
            .unwrap();

        match cli.command {
            Some(Commands::Get { path, compact, .. }) => {
                assert_eq!(path.as_deref(), Some("steps"));
                assert!(compact);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn given_repeated_debug_flag_when_parsing_then_counts() {
        let cli = Cli::try_parse_from(["jslayout", "-ddd", "config", "show"]).unwrap();
        assert_eq!(cli.debug, 3);
    }
}
