//! Data stores backing virtual machine disks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{IntegratedStorageCacheSettings, IoLimits, int_or_string};
use crate::resource::{CrudKind, DeleteOptions, ResourceKind, Tracked};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataStore {
    pub id: i64,
    pub label: Option<String>,
    pub identifier: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "int_or_string")]
    pub local_hypervisor_id: Option<i64>,
    #[serde(deserialize_with = "int_or_string")]
    pub data_store_size: Option<i64>,
    pub zombie_disks_size: Option<i64>,
    pub ip: Option<String>,
    #[serde(deserialize_with = "int_or_string")]
    pub data_store_group_id: Option<i64>,
    pub enabled: Option<bool>,
    pub data_store_type: Option<String>,
    pub iscsi_ip: Option<String>,
    pub hypervisor_group_id: Option<i64>,
    pub vdc_id: Option<i64>,
    pub integrated_storage_cache_enabled: Option<bool>,
    pub integrated_storage_cache_settings: Option<IntegratedStorageCacheSettings>,
    pub auto_healing: Option<bool>,
    pub io_limits: Option<IoLimits>,
    pub epoch: Option<bool>,
    pub default: Option<bool>,
    pub usage: Option<i64>,
}

/// Fields accepted when creating a data store
///
/// Group, hypervisor and size travel as strings on this endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataStoreCreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_store_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_hypervisor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_store_size: Option<String>,
    /// e.g. `lvm`, `solidfire`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_store_type: Option<String>,
}

impl ResourceKind for DataStore {
    const ENVELOPE: &'static str = "data_store";
    const BASE_PATH: &'static str = "settings/data_stores";
}

impl CrudKind for DataStore {
    type CreateRequest = DataStoreCreateRequest;
    type DeleteFilter = DeleteOptions;
    type Deletion = Tracked;

    const PARENT_TYPE: &'static str = "DataStore";
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_create_request_sends_strings() {
        let request = DataStoreCreateRequest {
            label: Some("lvm-01".to_string()),
            data_store_group_id: Some("2".to_string()),
            data_store_size: Some("500".to_string()),
            enabled: true,
            data_store_type: Some("lvm".to_string()),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "label": "lvm-01",
                "data_store_group_id": "2",
                "enabled": true,
                "data_store_size": "500",
                "data_store_type": "lvm"
            })
        );
    }

    #[test]
    fn test_string_ids_decode_as_integers() {
        let data_store: DataStore = serde_json::from_value(json!({
            "id": 4,
            "data_store_group_id": "2",
            "local_hypervisor_id": 9,
            "data_store_size": "500"
        }))
        .unwrap();

        assert_eq!(data_store.data_store_group_id, Some(2));
        assert_eq!(data_store.local_hypervisor_id, Some(9));
        assert_eq!(data_store.data_store_size, Some(500));
    }

    #[test]
    fn test_data_store_timestamps() {
        let data_store: DataStore = serde_json::from_value(json!({
            "id": 4,
            "label": "lvm-01",
            "created_at": "2019-03-12T14:35:18.000+02:00",
            "default": true
        }))
        .unwrap();

        assert_eq!(
            data_store.created_at,
            Some(Utc.with_ymd_and_hms(2019, 3, 12, 12, 35, 18).unwrap())
        );
        assert_eq!(data_store.default, Some(true));
        assert_eq!(data_store.updated_at, None);
    }

    #[test]
    fn test_kind_configuration() {
        assert_eq!(DataStore::collection_path(), "settings/data_stores.json");
        assert_eq!(DataStore::PARENT_TYPE, "DataStore");
    }
}
