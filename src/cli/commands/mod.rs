//! CLI command definitions and dispatch.
//!
//! Each subcommand family lives in its own submodule:
//! - `read`: merged, per-format and single-key reads, plus the key table
//! - `write`: updates and deletions
//! - `config`: show or initialize the config file

mod config;
mod read;
mod write;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{self as settings, Config};
use crate::metadata::{ReadOptions, UpdateOptions};
use crate::model::{Id3v2Version, TagFormat, UnifiedKey};

pub use config::cmd_config;
pub use read::{cmd_get, cmd_keys, cmd_read};
pub use write::{cmd_delete, cmd_write, parse_assignment};

/// Read and write audio tags through one set of keys
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "UNITAG_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Rating scale flags shared by reads and writes
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct RatingArgs {
    /// Caller rating scale (default from config, usually 100)
    #[arg(long, value_name = "N")]
    pub rating_max: Option<u32>,

    /// Use raw stored rating values
    #[arg(long, conflicts_with = "rating_max")]
    pub raw_rating: bool,
}

impl RatingArgs {
    fn resolve(&self, configured: Option<u32>) -> Option<u32> {
        if self.raw_rating {
            None
        } else {
            self.rating_max.or(configured)
        }
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Print all metadata as JSON
    Read {
        /// Path to the audio file
        path: PathBuf,
        /// Only read this tag format
        #[arg(short, long)]
        format: Option<TagFormat>,
        #[command(flatten)]
        rating: RatingArgs,
    },
    /// Print one key
    Get {
        /// Path to the audio file
        path: PathBuf,
        /// Unified key, e.g. TITLE or ARTISTS_NAMES
        key: UnifiedKey,
        /// Only read this tag format
        #[arg(short, long)]
        format: Option<TagFormat>,
        #[command(flatten)]
        rating: RatingArgs,
    },
    /// Set or delete keys in one tag format
    Write {
        /// Path to the audio file
        path: PathBuf,
        /// KEY=VALUE; list values are split on ; , / \ |
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Key to remove
        #[arg(long = "delete", value_name = "KEY")]
        delete: Vec<UnifiedKey>,
        /// Target tag format (default: the container's native format)
        #[arg(short, long)]
        format: Option<TagFormat>,
        /// ID3v2 revision to write: 2.3 or 2.4
        #[arg(long)]
        id3v2_version: Option<Id3v2Version>,
        #[command(flatten)]
        rating: RatingArgs,
    },
    /// Remove tags from a file (ID3v1 trailers are kept)
    Delete {
        /// Path to the audio file
        path: PathBuf,
        /// Only remove this tag format
        #[arg(short, long)]
        format: Option<TagFormat>,
    },
    /// List unified keys and which formats store them
    Keys {
        /// Only list keys this format stores
        #[arg(short, long)]
        format: Option<TagFormat>,
    },
    /// Print the effective config as TOML
    Config {
        /// Also write it to the config file
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => settings::load_from(path),
        None => settings::load(),
    };

    match &cli.command {
        Commands::Read {
            path,
            format,
            rating,
        } => cmd_read(path, *format, &read_options(&config, rating)),
        Commands::Get {
            path,
            key,
            format,
            rating,
        } => cmd_get(path, *key, *format, &read_options(&config, rating)),
        Commands::Write {
            path,
            set,
            delete,
            format,
            id3v2_version,
            rating,
        } => {
            let defaults = UpdateOptions::from(&config);
            let options = UpdateOptions {
                format: format.or(defaults.format),
                normalized_rating_max_value: rating
                    .resolve(defaults.normalized_rating_max_value),
                id3v2_version: id3v2_version.unwrap_or(defaults.id3v2_version),
            };
            cmd_write(path, set, delete, &options)
        }
        Commands::Delete { path, format } => cmd_delete(path, *format),
        Commands::Keys { format } => cmd_keys(*format),
        Commands::Config { init } => cmd_config(&config, cli.config.as_deref(), *init),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

fn read_options(config: &Config, rating: &RatingArgs) -> ReadOptions {
    let defaults = ReadOptions::from(config);
    ReadOptions {
        normalized_rating_max_value: rating.resolve(defaults.normalized_rating_max_value),
    }
}
