//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use galleria::SourceSettings;
use std::path::PathBuf;

/// Galleria - image galleries from remote folders or local uploads
#[derive(Parser, Debug)]
#[command(name = "galleria")]
#[command(about = "Image gallery with remote discovery and a durable local store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Extra configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the gallery in the configured mode
    Show {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Discover the images of a remote folder
    Discover {
        /// Remote folder, overriding the [source] table
        #[command(flatten)]
        source: SourceArgs,

        /// Ignore any cached snapshot
        #[arg(long)]
        fresh: bool,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Re-discover a remote folder periodically until interrupted
    Watch {
        /// Remote folder, overriding the [source] table
        #[command(flatten)]
        source: SourceArgs,

        /// Seconds between refreshes (defaults to [gallery] refresh_interval_secs)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Local store commands
    #[command(subcommand)]
    Local(LocalCommands),
}

/// Remote folder coordinates given on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Repository owner
    #[arg(long)]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch holding the images
    #[arg(long)]
    pub branch: Option<String>,

    /// Folder inside the repository
    #[arg(long)]
    pub folder: Option<String>,

    /// Static-pages mirror root
    #[arg(long)]
    pub pages_url: Option<String>,
}

impl From<SourceArgs> for SourceSettings {
    fn from(args: SourceArgs) -> Self {
        SourceSettings::new(args.owner, args.repo, args.branch, args.folder, args.pages_url)
    }
}

/// Local store subcommands
#[derive(Subcommand, Debug)]
pub enum LocalCommands {
    /// List stored images
    List {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Add image files
    Add {
        /// Files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete one image by key
    Delete {
        /// Record key (lowercased file name)
        key: String,
    },

    /// Remove every stored image
    Clear {
        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },

    /// Drop corrupt records
    Repair,

    /// Report storage usage
    Health {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Write a backup document
    Export {
        /// Names and metadata only, without image data
        #[arg(long)]
        compact: bool,

        /// Destination file (defaults to a dated name in the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Restore images from a full backup document
    Import {
        /// Backup file to read
        file: PathBuf,

        /// Confirm adding the images to the store
        #[arg(long)]
        yes: bool,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
