//! Disk backups
//!
//! Backups are listed and fetched under `backups`, taken against a disk
//! (`settings/disks/<id>/backups.json`), and deleted as a background
//! transaction with parent type `Backup`.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resource::{API_FORMAT, CrudKind, NoFilter, ResourceKind, Tracked, check_id};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Backup {
    pub id: i64,
    pub identifier: Option<String>,
    pub allow_resize_without_reboot: Option<bool>,
    pub allowed_hot_migrate: Option<bool>,
    pub allowed_swap: Option<bool>,
    pub backup_server_id: Option<i64>,
    pub backup_size: Option<i64>,
    pub backup_type: Option<String>,
    pub built: Option<bool>,
    pub built_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub data_store_type: Option<String>,
    pub disk_id: Option<i64>,
    pub initiated: Option<String>,
    pub iqn: Option<String>,
    pub locked: Option<bool>,
    pub marked_for_delete: Option<bool>,
    /// Smallest disk, in GB, the backup can be restored onto
    pub min_disk_size: Option<i64>,
    pub min_memory_size: Option<i64>,
    pub note: Option<String>,
    pub operating_system: Option<String>,
    pub operating_system_distro: Option<String>,
    pub target_id: Option<i64>,
    pub target_type: Option<String>,
    pub template_id: Option<i64>,
    pub user_id: Option<i64>,
    pub volume_id: Option<i64>,
}

/// Request to back up one disk; `disk_id` only appears in the path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupCreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,

    #[serde(skip)]
    pub disk_id: i64,
}

impl BackupCreateRequest {
    #[must_use]
    pub fn for_disk(disk_id: i64) -> Self {
        Self {
            disk_id,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl ResourceKind for Backup {
    const ENVELOPE: &'static str = "backup";
    const BASE_PATH: &'static str = "backups";
}

impl CrudKind for Backup {
    type CreateRequest = BackupCreateRequest;
    type DeleteFilter = NoFilter;
    type Deletion = Tracked;

    const PARENT_TYPE: &'static str = "Backup";

    fn create_path(request: &BackupCreateRequest) -> Result<String> {
        check_id("disk_id", request.disk_id)?;
        Ok(format!(
            "settings/disks/{}/backups{}",
            request.disk_id, API_FORMAT
        ))
    }
}
