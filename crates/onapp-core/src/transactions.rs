//! Background transactions and the latest-transaction lookup
//!
//! Long-running OnApp operations (deleting a disk, destroying a data store)
//! are queued as transactions grouped by the resource they act on. The group
//! is identified by `parent_id` and `parent_type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::client::Client;
use crate::error::{OnAppError, Result};
use crate::resource::{ListOptions, ResourceKind, ResourceService, check_id};
use crate::transport::Response;

/// Status reported by the server once a transaction finished
pub const STATUS_COMPLETE: &str = "complete";
pub const STATUS_FAILED: &str = "failed";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_RUNNING: &str = "running";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub id: i64,
    pub identifier: Option<String>,
    pub action: Option<String>,
    pub actor: Option<String>,
    pub allowed_cancel: Option<bool>,
    pub associated_object_id: Option<i64>,
    pub associated_object_type: Option<String>,
    pub chain_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub dependent_transaction_id: Option<i64>,
    pub lock_version: Option<i64>,
    pub params: Option<Value>,
    pub parent_id: Option<i64>,
    pub parent_type: Option<String>,
    pub pid: Option<i64>,
    pub priority: Option<i64>,
    pub scheduler_task_id: Option<String>,
    pub start_after: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub user_id: Option<i64>,
}

impl Transaction {
    fn status_is(&self, expected: &str) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case(expected))
    }

    pub fn is_complete(&self) -> bool {
        self.status_is(STATUS_COMPLETE)
    }

    pub fn is_failed(&self) -> bool {
        self.status_is(STATUS_FAILED)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status_is(STATUS_CANCELLED)
    }

    /// Queued or currently running
    pub fn is_pending(&self) -> bool {
        self.status_is(STATUS_PENDING) || self.status_is(STATUS_RUNNING)
    }

    /// No further status change is expected
    pub fn is_finished(&self) -> bool {
        self.is_complete() || self.is_failed() || self.is_cancelled()
    }
}

impl ResourceKind for Transaction {
    const ENVELOPE: &'static str = "transaction";
    const BASE_PATH: &'static str = "transactions";
}

/// The resource a group of transactions acts on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentGroup {
    pub parent_id: i64,
    pub parent_type: String,
}

impl ParentGroup {
    pub fn new(parent_id: i64, parent_type: impl Into<String>) -> Self {
        Self {
            parent_id,
            parent_type: parent_type.into(),
        }
    }
}

impl std::fmt::Display for ParentGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.parent_type, self.parent_id)
    }
}

/// Read access to `transactions`
#[derive(Debug, Clone)]
pub struct TransactionsService {
    client: Client,
    inner: ResourceService<Transaction>,
}

impl TransactionsService {
    pub fn new(client: Client) -> Self {
        Self {
            inner: ResourceService::new(client.clone()),
            client,
        }
    }

    pub async fn list(&self, options: Option<&ListOptions>) -> Result<(Vec<Transaction>, Response)> {
        self.inner.list(options).await
    }

    pub async fn get(&self, id: i64) -> Result<Transaction> {
        self.inner.get(id).await
    }

    /// Transactions recorded for one parent resource, newest first
    pub async fn list_by_group(
        &self,
        parent: &ParentGroup,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Transaction>, Response)> {
        check_id("parent_id", parent.parent_id)?;
        self.inner.list_filtered(parent, options).await
    }

    /// The most recent transaction recorded for `parent`
    ///
    /// Takes the head of the server's list. Another operation on the same
    /// parent may have queued a newer transaction in the meantime, in which
    /// case that one is returned.
    pub async fn resolve(&self, parent: &ParentGroup) -> Result<Transaction> {
        let options = ListOptions {
            page: None,
            per_page: Some(self.client.transaction_search_limit()),
        };
        let (transactions, _) = self.list_by_group(parent, Some(&options)).await?;

        match transactions.into_iter().next() {
            Some(transaction) => {
                debug!(
                    "Resolved transaction {} ({}) for {}",
                    transaction.id,
                    transaction.status.as_deref().unwrap_or("unknown"),
                    parent
                );
                Ok(transaction)
            }
            None => {
                debug!("No transaction recorded for {}", parent);
                Err(OnAppError::NotFound {
                    parent_id: parent.parent_id,
                    parent_type: parent.parent_type.clone(),
                })
            }
        }
    }
}
