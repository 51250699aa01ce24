use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "zato-connection-registry")]
#[command(about = "Load, back up and restore your Zato HTTP connections")]
#[command(version)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.zato-registry)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save every non-internal HTTP channel of a cluster to a JSON file
    Backup {
        /// Zato address (e.g., http://localhost:11223)
        address: String,

        /// API credentials as user:password
        credentials: String,

        /// Backup file to write (default: zato-channels-<timestamp>.json)
        to_file: Option<PathBuf>,
    },

    /// Recreate the channels of a backup file on a cluster
    Restore {
        /// Zato address (e.g., http://localhost:11223)
        address: String,

        /// API credentials as user:password
        credentials: String,

        /// Backup file to read
        from_file: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., remote.cluster_id)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., remote.cluster_id)
        key: String,

        /// Value to set (e.g., "2" or "/zato/json/{}")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Create config file with commented defaults
    Init,
}
