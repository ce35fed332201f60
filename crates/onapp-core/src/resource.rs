//! Generic typed resource service
//!
//! Every OnApp resource follows the same shape: a collection endpoint that
//! returns `[{"<name>": {...}}, ...]`, a member endpoint that returns
//! `{"<name>": {...}}`, creation by POSTing the same envelope, and deletion by
//! DELETE on the member path. [`ResourceService`] implements that once; each
//! resource type plugs in its envelope key and paths through [`ResourceKind`]
//! and [`CrudKind`].
//!
//! Deletion comes in two flavours, chosen per kind through
//! [`CrudKind::Deletion`]:
//!
//! - [`Untracked`] returns only the transport [`Response`].
//! - [`Tracked`] follows the DELETE with a transaction lookup for the deleted
//!   resource and returns a [`TrackedDeletion`].

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use tracing::debug;

use crate::client::Client;
use crate::error::{OnAppError, Result, TransportError};
use crate::transactions::{ParentGroup, Transaction};
use crate::transport::{ApiRequest, Response};

/// Suffix appended to every API path
pub const API_FORMAT: &str = ".json";

/// Pagination options for collection endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ListOptions {
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

/// Typed filter for kinds whose DELETE takes no parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoFilter {}

/// Query flags accepted when deleting data stores and roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

impl DeleteOptions {
    pub fn force() -> Self {
        Self { force: Some(true) }
    }
}

/// A resource that can be listed and fetched
pub trait ResourceKind: DeserializeOwned + Serialize + Send + Sync + 'static {
    /// Singular name wrapping the fields on the wire, e.g. `disk`
    const ENVELOPE: &'static str;
    /// Collection path without the format suffix, e.g. `settings/disks`
    const BASE_PATH: &'static str;

    fn collection_path() -> String {
        format!("{}{}", Self::BASE_PATH, API_FORMAT)
    }

    fn member_path(id: i64) -> String {
        format!("{}/{}{}", Self::BASE_PATH, id, API_FORMAT)
    }
}

/// A resource that can also be created and deleted
pub trait CrudKind: ResourceKind {
    type CreateRequest: Serialize + Default + PartialEq + Send + Sync;
    /// Query parameters accepted by DELETE
    type DeleteFilter: Serialize + Send + Sync;
    /// Whether DELETE resolves a background transaction
    type Deletion: DeletionMode;

    /// `parent_type` recorded on transactions created for this resource
    const PARENT_TYPE: &'static str;

    /// Path to POST a create request to. Kinds nested under a parent
    /// validate the parent id here.
    fn create_path(_request: &Self::CreateRequest) -> Result<String> {
        Ok(Self::collection_path())
    }

    /// A request equal to its default carries nothing to create
    fn is_empty_request(request: &Self::CreateRequest) -> bool {
        *request == Self::CreateRequest::default()
    }
}

/// Completes a DELETE once the server acknowledged it
#[async_trait]
pub trait DeletionMode: Send + Sync + 'static {
    type Output: Send;

    async fn complete(
        client: &Client,
        parent: ParentGroup,
        response: Response,
    ) -> Result<Self::Output>;
}

/// DELETE is fire-and-forget: only transport metadata comes back
#[derive(Debug, Clone, Copy)]
pub struct Untracked;

#[async_trait]
impl DeletionMode for Untracked {
    type Output = Response;

    async fn complete(
        _client: &Client,
        _parent: ParentGroup,
        response: Response,
    ) -> Result<Self::Output> {
        Ok(response)
    }
}

/// DELETE triggers a background job that is looked up afterwards
#[derive(Debug, Clone, Copy)]
pub struct Tracked;

#[async_trait]
impl DeletionMode for Tracked {
    type Output = TrackedDeletion;

    async fn complete(
        client: &Client,
        parent: ParentGroup,
        response: Response,
    ) -> Result<Self::Output> {
        let transaction = match client.transactions().resolve(&parent).await {
            Ok(transaction) => Some(transaction),
            Err(OnAppError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };

        Ok(TrackedDeletion {
            response,
            parent,
            transaction,
        })
    }
}

/// Result of deleting a resource backed by a background job
///
/// `transaction` is the latest transaction recorded for the deleted resource
/// at lookup time. A concurrent operation on the same resource may have
/// produced it, so treat it as "latest known", not "caused by this call".
///
/// A failed lookup surfaces as an error from `delete` even though the server
/// already accepted the DELETE; check the resource before retrying.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedDeletion {
    /// Metadata of the DELETE call
    pub response: Response,
    pub parent: ParentGroup,
    pub transaction: Option<Transaction>,
}

impl TrackedDeletion {
    /// The DELETE went through but no transaction was recorded for the parent
    pub fn transaction_not_found(&self) -> bool {
        self.transaction.is_none()
    }

    /// Take the transaction, turning its absence into [`OnAppError::NotFound`]
    pub fn into_transaction(self) -> Result<Transaction> {
        self.transaction.ok_or(OnAppError::NotFound {
            parent_id: self.parent.parent_id,
            parent_type: self.parent.parent_type,
        })
    }
}

/// Pull the value stored under `key` out of a single-key envelope
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(
    key: &str,
    mut envelope: Map<String, Value>,
) -> std::result::Result<T, TransportError> {
    let inner = envelope.remove(key).ok_or_else(|| {
        TransportError::Decode(<serde_json::Error as serde::de::Error>::custom(
            format!("missing '{}' envelope", key),
        ))
    })?;
    serde_json::from_value(inner).map_err(TransportError::Decode)
}

/// Wrap `value` in a single-key envelope
pub(crate) fn wrap_envelope<T: Serialize + ?Sized>(
    key: &str,
    value: &T,
) -> std::result::Result<Value, TransportError> {
    let inner = serde_json::to_value(value).map_err(|e| TransportError::Encode(e.to_string()))?;
    let mut envelope = Map::new();
    envelope.insert(key.to_string(), inner);
    Ok(Value::Object(envelope))
}

pub(crate) fn check_id(argument: &str, id: i64) -> Result<()> {
    if id < 1 {
        return Err(OnAppError::invalid_argument(
            argument,
            "cannot be less than 1",
        ));
    }
    Ok(())
}

/// Typed List/Get/Create/Delete over one resource kind
pub struct ResourceService<K> {
    client: Client,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for ResourceService<K> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> std::fmt::Debug for ResourceService<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceService")
            .field("kind", &std::any::type_name::<K>())
            .finish()
    }
}

impl<K: ResourceKind> ResourceService<K> {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    /// List the collection, preserving server order
    pub async fn list(&self, options: Option<&ListOptions>) -> Result<(Vec<K>, Response)> {
        self.list_filtered(&NoFilter {}, options).await
    }

    /// List the collection with extra query parameters
    pub async fn list_filtered<F: Serialize + ?Sized>(
        &self,
        filter: &F,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<K>, Response)> {
        let mut request = ApiRequest::get(K::collection_path()).with_query(filter)?;
        if let Some(options) = options {
            request = request.with_query(options)?;
        }

        let response = self.client.execute(request).await?;
        let entries: Vec<Map<String, Value>> = response.decode()?;
        let items = entries
            .into_iter()
            .map(|entry| unwrap_envelope(K::ENVELOPE, entry))
            .collect::<std::result::Result<Vec<K>, _>>()?;

        debug!("Listed {} {} entries", items.len(), K::ENVELOPE);
        Ok((items, response.meta))
    }

    /// Fetch one resource by id
    pub async fn get(&self, id: i64) -> Result<K> {
        check_id("id", id)?;

        let response = self.client.execute(ApiRequest::get(K::member_path(id))).await?;
        let envelope: Map<String, Value> = response.decode()?;
        Ok(unwrap_envelope(K::ENVELOPE, envelope)?)
    }
}

impl<K: CrudKind> ResourceService<K> {
    /// Create a resource and return the server's view of it
    pub async fn create(&self, request: &K::CreateRequest) -> Result<K> {
        if K::is_empty_request(request) {
            return Err(OnAppError::invalid_argument(
                format!("{} createRequest", K::ENVELOPE),
                "cannot be empty",
            ));
        }
        let path = K::create_path(request)?;

        let body = wrap_envelope(K::ENVELOPE, request)?;
        let api_request = ApiRequest::post(path).with_body(&body)?;
        debug!("Creating {}", K::ENVELOPE);

        let response = self.client.execute(api_request).await?;
        let envelope: Map<String, Value> = response.decode()?;
        Ok(unwrap_envelope(K::ENVELOPE, envelope)?)
    }

    /// Delete a resource.
    ///
    /// Returns a [`Response`] for untracked kinds and a [`TrackedDeletion`]
    /// for kinds whose deletion runs as a background transaction.
    ///
    /// For tracked kinds the transaction lookup runs after the DELETE has
    /// been accepted. An error from that lookup is returned as is, and does
    /// not mean the resource still exists.
    pub async fn delete(
        &self,
        id: i64,
        filter: Option<&K::DeleteFilter>,
    ) -> Result<<K::Deletion as DeletionMode>::Output> {
        check_id("id", id)?;

        let mut request = ApiRequest::delete(K::member_path(id));
        if let Some(filter) = filter {
            request = request.with_query(filter)?;
        }

        debug!("Deleting {} {}", K::ENVELOPE, id);
        let response = self.client.execute(request).await?;

        K::Deletion::complete(
            &self.client,
            ParentGroup::new(id, K::PARENT_TYPE),
            response.meta,
        )
        .await
    }
}
