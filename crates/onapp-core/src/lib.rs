//! # onapp-core
//!
//! Typed async client for the OnApp cloud control panel REST API.
//!
//! The crate is built around one generic service. [`ResourceService`] knows
//! how to list, fetch, create and delete anything that follows OnApp's
//! envelope convention (`{"disk": {...}}`). Each resource type describes its
//! envelope key and paths through [`ResourceKind`] and [`CrudKind`].
//!
//! Some deletes are queued server-side as background transactions. For those
//! kinds `delete` also looks up the most recent [`Transaction`] recorded for
//! the deleted resource and returns it in a [`TrackedDeletion`].
//!
//! ```rust,no_run
//! use onapp_core::{Client, ListOptions};
//!
//! # async fn run() -> onapp_core::Result<()> {
//! let client = Client::builder("https://cp.example.com")
//!     .credentials("admin@example.com", "api-key")
//!     .build()?;
//!
//! let (disks, meta) = client.disks().list(Some(&ListOptions::page(1, 50))).await?;
//! println!("{} disks, last page: {}", disks.len(), meta.links.is_last_page());
//!
//! let deletion = client.disks().delete(disks[0].id, None).await?;
//! if let Some(transaction) = deletion.transaction {
//!     println!("transaction {} is {:?}", transaction.id, transaction.status);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! - [`transport`] - the HTTP seam and response metadata
//! - [`resource`] - the generic service and kind traits
//! - [`resources`] - disks, data stores, roles and backups
//! - [`transactions`] - transactions and the latest-transaction lookup
//! - [`progress`] / [`workflows`] - waiting for transactions to finish
//! - [`config`] - profiles and credentials

pub mod client;
pub mod config;
pub mod error;
pub mod progress;
pub mod resource;
pub mod resources;
pub mod transactions;
pub mod transport;
pub mod workflows;

pub use client::{Client, ClientBuilder, DEFAULT_TRANSACTION_SEARCH_LIMIT};
pub use config::{Config, ConfigError, Profile};
pub use error::{OnAppError, Result, TransportError};
pub use progress::{ProgressCallback, TransactionProgressEvent, wait_for_transaction};
pub use resource::{
    CrudKind, DeleteOptions, DeletionMode, ListOptions, NoFilter, ResourceKind, ResourceService,
    Tracked, TrackedDeletion, Untracked,
};
pub use resources::{
    Backup, BackupCreateRequest, DataStore, DataStoreCreateRequest, Disk, DiskCreateRequest,
    IntegratedStorageCacheSettings, IoLimits, Permission, PermissionEntry, Role,
    RoleCreateRequest,
};
pub use transactions::{ParentGroup, Transaction, TransactionsService};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Links, Response, Transport};
pub use workflows::delete_and_wait;
