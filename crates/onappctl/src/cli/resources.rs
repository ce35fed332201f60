//! Resource and transaction subcommands

use clap::{Args, Subcommand};
use onapp_core::ListOptions;

/// Paging flags shared by every `list`
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u32>,

    /// Items per page
    #[arg(long)]
    pub per_page: Option<u32>,
}

impl ListArgs {
    pub fn options(&self) -> Option<ListOptions> {
        if self.page.is_none() && self.per_page.is_none() {
            return None;
        }
        Some(ListOptions {
            page: self.page,
            per_page: self.per_page,
        })
    }
}

/// Flags for deletes that run as a background transaction
#[derive(Args, Debug, Clone)]
pub struct WaitArgs {
    /// Wait for the transaction to finish
    #[arg(long)]
    pub wait: bool,

    /// Maximum time to wait in seconds
    #[arg(long, default_value = "300", requires = "wait")]
    pub wait_timeout: u64,

    /// Polling interval in seconds
    #[arg(long, default_value = "5", requires = "wait")]
    pub wait_interval: u64,
}

#[derive(Subcommand, Debug)]
pub enum DiskCommands {
    /// List disks
    #[command(visible_alias = "ls")]
    List(#[command(flatten)] ListArgs),

    /// Get a disk
    Get { id: i64 },

    /// Add a disk to a virtual machine
    #[command(after_help = "EXAMPLES:
    onappctl disk create --vm-id 12 --data '{\"label\":\"data\",\"disk_size\":20,\"data_store_id\":3}'
    onappctl disk create --vm-id 12 --data @disk.json
")]
    Create {
        /// Virtual machine the disk is attached to
        #[arg(long)]
        vm_id: i64,

        /// Disk fields as JSON, or @file
        #[arg(long)]
        data: String,
    },

    /// Delete a disk
    #[command(visible_alias = "rm")]
    Delete {
        id: i64,

        #[command(flatten)]
        wait: WaitArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum DataStoreCommands {
    /// List data stores
    #[command(visible_alias = "ls")]
    List(#[command(flatten)] ListArgs),

    /// Get a data store
    Get { id: i64 },

    /// Create a data store
    Create {
        /// Data store fields as JSON, or @file
        #[arg(long)]
        data: String,
    },

    /// Delete a data store
    #[command(visible_alias = "rm")]
    Delete {
        id: i64,

        /// Delete even if disks still reference it
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        wait: WaitArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum RoleCommands {
    /// List roles
    #[command(visible_alias = "ls")]
    List(#[command(flatten)] ListArgs),

    /// Get a role
    Get { id: i64 },

    /// Create a role
    #[command(after_help = "EXAMPLES:
    onappctl role create --data '{\"label\":\"Support\",\"permission_ids\":[1,2,3]}'
")]
    Create {
        /// Role fields as JSON, or @file
        #[arg(long)]
        data: String,
    },

    /// Delete a role
    #[command(visible_alias = "rm")]
    Delete {
        id: i64,

        /// Delete even if users still hold it
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// List backups
    #[command(visible_alias = "ls")]
    List(#[command(flatten)] ListArgs),

    /// Get a backup
    Get { id: i64 },

    /// Back up a disk
    Create {
        /// Disk to back up
        #[arg(long)]
        disk_id: i64,

        /// Free-form note stored with the backup
        #[arg(long)]
        note: Option<String>,

        /// Take the backup even if the disk is busy
        #[arg(long)]
        force: bool,
    },

    /// Delete a backup
    #[command(visible_alias = "rm")]
    Delete {
        id: i64,

        #[command(flatten)]
        wait: WaitArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// List transactions
    #[command(visible_alias = "ls")]
    List(#[command(flatten)] ListArgs),

    /// Get a transaction
    Get { id: i64 },

    /// Latest transaction recorded for a resource
    #[command(after_help = "EXAMPLES:
    onappctl transaction latest --parent-id 42 --parent-type Disk
")]
    Latest {
        #[arg(long)]
        parent_id: i64,

        /// Disk, DataStore, Backup, ...
        #[arg(long)]
        parent_type: String,
    },

    /// Wait for a transaction to finish
    Wait {
        id: i64,

        /// Maximum time to wait in seconds
        #[arg(long, default_value = "300")]
        timeout: u64,

        /// Polling interval in seconds
        #[arg(long, default_value = "5")]
        interval: u64,
    },
}
