//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::application::{AlgorithmKind, OutputFormat};
use crate::domain::Branch;

/// Decision-tree generator: enumerate every comparison outcome of a sorting algorithm
#[derive(Parser, Debug)]
#[command(name = "dtgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory for local config (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Algorithm and dataset shared by the enumeration commands.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Algorithm to enumerate (default from config)
    #[arg(short, long, value_enum)]
    pub algorithm: Option<AlgorithmKind>,

    /// Dataset, in initial order
    #[arg(required = false)]
    pub elements: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the decision tree
    Tree {
        #[command(flatten)]
        input: InputArgs,

        /// Output format (default from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// List every root-to-leaf decision path
    Leaves {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show tree statistics
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Replay one decision path and show the comparisons asked
    Trace {
        #[command(flatten)]
        input: InputArgs,

        /// Decisions in order, comma separated (yes/no)
        #[arg(short, long, value_delimiter = ',')]
        path: Vec<Branch>,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },
}
