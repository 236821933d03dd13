// src/cli/args.rs
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (default: <config dir>/tana-cli/config.toml)
    #[arg(long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Show what would be produced or sent without sending
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Suppress hints after successful output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute (add, paste, validate, or config)
    #[command(subcommand)]
    pub command: Command,
}

/// Tags, fields and template shared by `add` and `paste`
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct NoteArgs {
    /// Supertag to apply (repeatable)
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Field as name:value (repeatable); with --template these fill the template fields
    #[arg(short, long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Built-in template (note, meeting, task)
    #[arg(long, value_name = "TEMPLATE")]
    pub template: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a note via Tana Paste or the Input API
    Add {
        /// Note content (read from --file or stdin when omitted)
        #[arg(value_name = "CONTENT")]
        content: Option<String>,

        #[command(flatten)]
        note: NoteArgs,

        /// Send through the Input API
        #[arg(long, conflicts_with = "paste")]
        api: bool,

        /// Produce Tana Paste output
        #[arg(long)]
        paste: bool,

        /// Target node for API mode (default from config)
        #[arg(long, value_name = "NODE_ID")]
        target: Option<String>,

        /// Read content from file
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// JSON array of notes to send in batches (API mode)
        #[arg(long, value_name = "PATH", conflicts_with_all = ["content", "file"])]
        notes_file: Option<PathBuf>,

        /// Nodes per API call for --notes-file
        #[arg(long, value_name = "N", default_value_t = crate::constants::DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Print a note in Tana Paste format
    Paste {
        /// Note content
        #[arg(value_name = "CONTENT")]
        content: String,

        #[command(flatten)]
        note: NoteArgs,
    },

    /// Validate paste files, API JSON files or template names
    #[command(arg_required_else_help = true)]
    Validate {
        /// Tana Paste file to check
        #[arg(long, value_name = "PATH")]
        paste_file: Option<PathBuf>,

        /// API JSON file to check
        #[arg(long, value_name = "PATH")]
        api_file: Option<PathBuf>,

        /// Template name to check
        #[arg(long, value_name = "TEMPLATE")]
        template: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Write a default config file
    Init,
    /// Print one value by dotted key (e.g. api.token)
    Get {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Set one value by dotted key
    Set {
        #[arg(value_name = "KEY")]
        key: String,
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Print the full configuration
    Show,
}
