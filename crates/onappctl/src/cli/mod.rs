//! CLI structure and command definitions

use clap::{Parser, Subcommand};

pub mod resources;

pub use resources::*;

/// Command-line client for the OnApp control panel API
#[derive(Parser, Debug)]
#[command(name = "onappctl")]
#[command(version, about = "Command-line client for the OnApp control panel API")]
#[command(long_about = "
Command-line client for the OnApp control panel API

Manages disks, data stores, roles and backups, and follows the background
transactions the control panel runs for them.

EXAMPLES:
    # Set up a profile (the API key is prompted for)
    onappctl profile set prod --url https://cp.example.com --username admin@example.com

    # List disks as a table
    onappctl disk list

    # Delete a disk and wait for the control panel to finish
    onappctl disk delete 42 --wait

    # Filter output with JMESPath
    onappctl transaction list -q \"[?status=='failed'].id\"

For more help on a specific command, run:
    onappctl <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "ONAPPCTL_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "ONAPPCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// JMESPath query to filter output
    #[arg(long, short = 'q', global = true)]
    pub query: Option<String>,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Tables for humans, JSON when a query is given
    Auto,
    Json,
    Yaml,
    /// Human-readable table format
    Table,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Virtual machine disks
    #[command(subcommand)]
    Disk(DiskCommands),

    /// Data stores backing disks
    #[command(subcommand, name = "data-store", visible_alias = "ds")]
    DataStore(DataStoreCommands),

    /// User roles
    #[command(subcommand)]
    Role(RoleCommands),

    /// Disk backups
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Background transactions
    #[command(subcommand, visible_alias = "tx")]
    Transaction(TransactionCommands),

    /// Profile management
    #[command(subcommand, visible_alias = "prof", visible_alias = "pr")]
    Profile(ProfileCommands),

    /// Show version information
    #[command(visible_alias = "ver", visible_alias = "v")]
    Version,

    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    # Bash
    onappctl completions bash > ~/.local/share/bash-completion/completions/onappctl

    # Zsh
    onappctl completions zsh > ~/.zfunc/_onappctl
")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List all configured profiles
    #[command(visible_alias = "ls")]
    List,

    /// Show the path to the configuration file
    Path,

    /// Show details of a specific profile
    #[command(visible_alias = "get")]
    Show {
        /// Profile name to show
        name: String,
    },

    /// Set or create a profile
    #[command(visible_alias = "add")]
    #[command(after_help = "EXAMPLES:
    # API key is prompted for when omitted
    onappctl profile set prod --url https://cp.example.com --username admin@example.com

    # Self-signed certificate, longer timeout
    onappctl profile set lab --url https://10.0.0.5 --username admin \\
        --api-key KEY --insecure --timeout 120

    # Reference an environment variable instead of storing the key
    onappctl profile set ci --url https://cp.example.com --username ci \\
        --api-key '${ONAPP_CI_KEY}'
")]
    Set {
        /// Profile name
        name: String,

        /// Control panel URL
        #[arg(long)]
        url: String,

        /// Login of the API user
        #[arg(long)]
        username: String,

        /// API key (prompted for when omitted)
        #[arg(long)]
        api_key: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Skip TLS certificate verification
        #[arg(long)]
        insecure: bool,

        /// How many transactions to fetch when resolving a delete
        #[arg(long)]
        transaction_search_limit: Option<u32>,

        /// Store the API key in the OS keyring
        #[cfg(feature = "secure-storage")]
        #[arg(long)]
        use_keyring: bool,
    },

    /// Remove a profile
    #[command(visible_alias = "rm", visible_alias = "delete")]
    Remove {
        /// Profile name to remove
        name: String,
    },

    /// Set the default profile
    #[command(visible_alias = "def")]
    Default {
        /// Profile name to set as default
        name: String,
    },
}
