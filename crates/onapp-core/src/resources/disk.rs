//! Virtual machine disks
//!
//! Disks are listed and fetched under `settings/disks` but created under the
//! owning virtual machine (`virtual_machines/<id>/disks.json`). Deleting a
//! disk runs as a background transaction with parent type `Disk`.

use serde::{Deserialize, Serialize};

use super::VIRTUAL_MACHINE_BASE_PATH;
use super::common::{IntegratedStorageCacheSettings, IoLimits};
use crate::error::Result;
use crate::resource::{API_FORMAT, CrudKind, NoFilter, ResourceKind, Tracked, check_id};

/// A disk attached to a virtual machine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Disk {
    pub id: i64,
    pub identifier: Option<String>,
    pub label: Option<String>,
    pub add_to_freebsd_fstab: Option<String>,
    pub add_to_linux_fstab: Option<String>,
    pub built: Option<bool>,
    pub burst_bw: Option<i64>,
    pub burst_iops: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub data_store_id: Option<i64>,
    pub disk_size: Option<i64>,
    pub disk_vm_number: Option<i64>,
    pub file_system: Option<String>,
    pub has_autobackups: Option<bool>,
    pub integrated_storage_cache_enabled: Option<bool>,
    pub integrated_storage_cache_override: Option<bool>,
    pub integrated_storage_cache_settings: Option<IntegratedStorageCacheSettings>,
    pub io_limits: Option<IoLimits>,
    pub io_limits_override: Option<bool>,
    pub iqn: Option<String>,
    pub is_swap: Option<bool>,
    pub locked: Option<bool>,
    pub max_bw: Option<i64>,
    pub max_iops: Option<i64>,
    pub min_iops: Option<i64>,
    pub mount_point: Option<String>,
    pub mounted: Option<bool>,
    pub openstack_id: Option<i64>,
    pub primary: Option<bool>,
    pub temporary_virtual_machine_id: Option<i64>,
    pub virtual_machine_id: Option<i64>,
    pub volume_id: Option<i64>,
}

/// Fields accepted when adding a disk to a virtual machine
///
/// `virtual_machine_id` selects the owning machine and only appears in the
/// request path. Booleans are always sent; everything else only when set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskCreateRequest {
    pub primary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<i64>,
    /// `ext3` or `ext4`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_store_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub require_format_disk: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_point: Option<String>,
    pub hot_attach: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_iops: Option<i64>,
    pub mounted: bool,

    #[serde(skip)]
    pub virtual_machine_id: i64,
}

impl DiskCreateRequest {
    /// Create a request with the required fields
    #[must_use]
    pub fn new(virtual_machine_id: i64, label: impl Into<String>, disk_size: i64) -> Self {
        Self {
            virtual_machine_id,
            label: Some(label.into()),
            disk_size: Some(disk_size),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_data_store(mut self, data_store_id: i64) -> Self {
        self.data_store_id = Some(data_store_id);
        self
    }

    /// Format the disk with `file_system` and mount it at `mount_point`
    #[must_use]
    pub fn with_filesystem(
        mut self,
        file_system: impl Into<String>,
        mount_point: impl Into<String>,
    ) -> Self {
        self.file_system = Some(file_system.into());
        self.mount_point = Some(mount_point.into());
        self.require_format_disk = true;
        self.mounted = true;
        self
    }

    #[must_use]
    pub fn with_hot_attach(mut self, hot_attach: bool) -> Self {
        self.hot_attach = hot_attach;
        self
    }

    #[must_use]
    pub fn with_min_iops(mut self, min_iops: i64) -> Self {
        self.min_iops = Some(min_iops);
        self
    }
}

impl ResourceKind for Disk {
    const ENVELOPE: &'static str = "disk";
    const BASE_PATH: &'static str = "settings/disks";
}

impl CrudKind for Disk {
    type CreateRequest = DiskCreateRequest;
    type DeleteFilter = NoFilter;
    type Deletion = Tracked;

    const PARENT_TYPE: &'static str = "Disk";

    fn create_path(request: &DiskCreateRequest) -> Result<String> {
        check_id("virtual_machine_id", request.virtual_machine_id)?;
        Ok(format!(
            "{}/{}/disks{}",
            VIRTUAL_MACHINE_BASE_PATH, request.virtual_machine_id, API_FORMAT
        ))
    }

    fn is_empty_request(request: &DiskCreateRequest) -> bool {
        let payload = DiskCreateRequest {
            virtual_machine_id: 0,
            ..request.clone()
        };
        payload == DiskCreateRequest::default()
    }
}
