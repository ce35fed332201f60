//! Shared client handle
//!
//! A [`Client`] is a cheap, cloneable handle around one [`Transport`]. It holds
//! no mutable state, so one client can back any number of services and tasks.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::resource::ResourceService;
use crate::resources::{Backup, DataStore, Disk, Role};
use crate::transactions::TransactionsService;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

/// How many transactions the resolver asks for when looking up a parent group
pub const DEFAULT_TRANSACTION_SEARCH_LIMIT: u32 = 10;

/// Handle used by every service to reach the API
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    transaction_search_limit: u32,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("transaction_search_limit", &self.transaction_search_limit)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Wrap any transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    /// Wrap a transport that is already shared
    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            transaction_search_limit: DEFAULT_TRANSACTION_SEARCH_LIMIT,
        }
    }

    /// Start building a client backed by [`HttpTransport`]
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            base_url: base_url.into(),
            username: String::new(),
            api_key: String::new(),
            timeout: None,
            insecure: false,
            transaction_search_limit: DEFAULT_TRANSACTION_SEARCH_LIMIT,
        }
    }

    /// Override the page size used when resolving transactions
    #[must_use]
    pub fn with_transaction_search_limit(mut self, limit: u32) -> Self {
        self.transaction_search_limit = limit.max(1);
        self
    }

    pub fn transaction_search_limit(&self) -> u32 {
        self.transaction_search_limit
    }

    /// Execute one request through the transport
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        Ok(self.transport.execute(request).await?)
    }

    pub fn disks(&self) -> ResourceService<Disk> {
        ResourceService::new(self.clone())
    }

    pub fn data_stores(&self) -> ResourceService<DataStore> {
        ResourceService::new(self.clone())
    }

    pub fn roles(&self) -> ResourceService<Role> {
        ResourceService::new(self.clone())
    }

    pub fn backups(&self) -> ResourceService<Backup> {
        ResourceService::new(self.clone())
    }

    pub fn transactions(&self) -> TransactionsService {
        TransactionsService::new(self.clone())
    }
}

/// Builder for an HTTP-backed [`Client`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    username: String,
    api_key: String,
    timeout: Option<Duration>,
    insecure: bool,
    transaction_search_limit: u32,
}

impl ClientBuilder {
    /// Login and API key used for HTTP basic auth
    pub fn credentials(mut self, username: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.username = username.into();
        self.api_key = api_key.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn transaction_search_limit(mut self, limit: u32) -> Self {
        self.transaction_search_limit = limit;
        self
    }

    pub fn build(self) -> Result<Client> {
        let mut transport = HttpTransport::builder(self.base_url)
            .credentials(self.username, self.api_key)
            .insecure(self.insecure);
        if let Some(timeout) = self.timeout {
            transport = transport.timeout(timeout);
        }
        let transport = transport.build()?;

        Ok(Client::new(transport).with_transaction_search_limit(self.transaction_search_limit))
    }
}
