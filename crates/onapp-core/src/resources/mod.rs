//! Resource kinds served by [`ResourceService`](crate::resource::ResourceService)
//!
//! | kind | envelope | collection | delete |
//! |------|----------|------------|--------|
//! | [`Disk`] | `disk` | `settings/disks` | tracked (`Disk`) |
//! | [`DataStore`] | `data_store` | `settings/data_stores` | tracked (`DataStore`) |
//! | [`Backup`] | `backup` | `backups` | tracked (`Backup`) |
//! | [`Role`] | `role` | `roles` | untracked |

pub mod backup;
pub mod common;
pub mod data_store;
pub mod disk;
pub mod role;

pub use backup::{Backup, BackupCreateRequest};
pub use common::{IntegratedStorageCacheSettings, IoLimits};
pub use data_store::{DataStore, DataStoreCreateRequest};
pub use disk::{Disk, DiskCreateRequest};
pub use role::{Permission, PermissionEntry, Role, RoleCreateRequest};

/// Virtual machines own disks; disk creation is nested under them
pub const VIRTUAL_MACHINE_BASE_PATH: &str = "virtual_machines";
