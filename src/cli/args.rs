//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Hierarchical world region editor: schema-validated XML region trees
#[derive(Parser, Debug)]
#[command(name = "rsworld")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Raise verbosity: -d info, -dd debug, -ddd trace
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new empty world document
    New {
        /// World name (default from settings)
        name: Option<String>,
        /// Output file (default: <name>.xml)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show summary information for a world document
    Info {
        /// World file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the region hierarchy as a tree
    Tree {
        /// World file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the path from the root to a region
    Path {
        /// World file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Region id
        id: String,
    },

    /// List the direct children of a region, sorted by id
    Children {
        /// World file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Region id
        id: String,
    },

    /// Validate a world document against the schema
    Validate {
        /// World file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Add a region to a world document
    Add {
        /// World file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Parent region id (the world name for top-level regions)
        parent: String,
        /// New region id
        #[arg(long)]
        id: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Region type: Continent, Nation, State or County
        #[arg(long = "type")]
        kind: String,
        /// Capital city
        #[arg(long)]
        capital: Option<String>,
    },

    /// Remove a region and its entire subtree
    Remove {
        /// World file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Region id
        id: String,
    },

    /// Rename a region
    Rename {
        /// World file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Region id
        id: String,
        /// New display name
        name: String,
    },

    /// Set or clear a region's capital
    SetCapital {
        /// World file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Region id
        id: String,
        /// Capital city (omit to clear)
        capital: Option<String>,
    },

    /// List world documents in the worlds directory
    List {
        /// Directory to scan (default from settings)
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
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

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Print the global config file path
    Path,
}
