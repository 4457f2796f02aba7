use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tree-navigator")]
#[command(about = "Search, expand, pin and keyboard-navigate a JSON file/folder tree")]
pub struct Cli {
    /// Path to a JSON configuration file (keybindings, storage)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the initial navigator snapshot for a tree
    Snapshot {
        /// Path to the JSON tree (array of nodes)
        #[arg(short, long)]
        tree: PathBuf,
        /// Output file for the snapshot (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep pins in memory only
        #[arg(long)]
        no_persist: bool,
    },
    /// Execute commands against a tree and print the resulting snapshot
    Execute {
        /// Path to the JSON tree (array of nodes)
        #[arg(short, long)]
        tree: PathBuf,
        /// Command to execute (e.g. "down", "open:f1", "search:report"); repeatable
        #[arg(short = 'x', long = "command")]
        commands: Vec<String>,
        /// Script file with one command per line, run before any -x commands
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// Output file for the snapshot (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep pins in memory only
        #[arg(long)]
        no_persist: bool,
    },
}
