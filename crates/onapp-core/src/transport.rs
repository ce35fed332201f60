//! HTTP transport for the OnApp REST API
//!
//! Services never talk to `reqwest` directly. They build an [`ApiRequest`],
//! hand it to a [`Transport`], and decode the [`ApiResponse`] body. The
//! production implementation is [`HttpTransport`]; tests substitute their own.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, LINK};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, trace};
use url::Url;

use crate::error::TransportError;

/// User agent sent with every request
const USER_AGENT: &str = concat!("onapp-core/", env!("CARGO_PKG_VERSION"));

/// Maximum length of response body to log
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate a response body and strip control characters before logging it
fn sanitize_for_log(body: &str) -> String {
    let char_count = body.chars().count();
    let truncated = if char_count > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// A request ready to be executed against the API
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, e.g. `settings/disks/5.json`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append the url-encoded fields of `params` to the query string.
    ///
    /// Fields that serialize to nothing (`None` with `skip_serializing_if`)
    /// are left out.
    pub fn with_query<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self, TransportError> {
        let encoded = serde_urlencoded::to_string(params)
            .map_err(|e| TransportError::Encode(e.to_string()))?;
        self.query.extend(
            url::form_urlencoded::parse(encoded.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
        Ok(self)
    }

    /// Attach a JSON body
    pub fn with_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, TransportError> {
        let value = serde_json::to_value(body).map_err(|e| TransportError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Pagination links parsed from the `Link` response header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Links {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

impl Links {
    /// Parse an RFC 8288 header value such as
    /// `<https://h/disks.json?page=2>; rel="next", <https://h/disks.json?page=9>; rel="last"`
    pub fn parse(header: &str) -> Self {
        let mut links = Links::default();
        for part in header.split(',') {
            let mut segments = part.split(';');
            let Some(target) = segments.next() else {
                continue;
            };
            let target = target.trim();
            if !(target.starts_with('<') && target.ends_with('>')) {
                continue;
            }
            let target = target[1..target.len() - 1].to_string();

            for param in segments {
                let Some((key, value)) = param.split_once('=') else {
                    continue;
                };
                if key.trim() != "rel" {
                    continue;
                }
                match value.trim().trim_matches('"') {
                    "first" => links.first = Some(target.clone()),
                    "prev" | "previous" => links.prev = Some(target.clone()),
                    "next" => links.next = Some(target.clone()),
                    "last" => links.last = Some(target.clone()),
                    _ => {}
                }
            }
        }
        links
    }

    pub fn is_last_page(&self) -> bool {
        self.next.is_none()
    }
}

/// Transport metadata returned alongside decoded results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    pub status: u16,
    pub links: Links,
    /// Total number of items, when the server sends `X-Total`
    pub total: Option<u64>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn from_headers(status: u16, headers: &HeaderMap) -> Self {
        let links = headers
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(Links::parse)
            .unwrap_or_default();
        let total = headers
            .get("x-total")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        Self {
            status,
            links,
            total,
        }
    }
}

/// Raw response: metadata plus the undecoded body
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub meta: Response,
    pub body: String,
}

impl ApiResponse {
    /// Decode the body as JSON
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_str(&self.body).map_err(TransportError::Decode)
    }
}

/// The seam between resource services and the network
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request. Non-2xx responses must be reported as
    /// [`TransportError::Status`].
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Builder for [`HttpTransport`]
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    base_url: String,
    username: String,
    api_key: String,
    timeout: Option<Duration>,
    insecure: bool,
    user_agent: String,
}

impl HttpTransportBuilder {
    pub fn credentials(mut self, username: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.username = username.into();
        self.api_key = api_key.into();
        self
    }

    /// Per-request timeout enforced by the HTTP client
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Accept invalid TLS certificates (self-signed control panels)
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let mut base = self.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent)
            .danger_accept_invalid_certs(self.insecure);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(HttpTransport {
            client,
            base_url,
            username: self.username,
            api_key: self.api_key,
        })
    }
}

/// `reqwest`-backed transport using HTTP basic auth (login + API key)
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    username: String,
    api_key: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn builder(base_url: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder {
            base_url: base_url.into(),
            username: String::new(),
            api_key: String::new(),
            timeout: None,
            insecure: false,
            user_agent: USER_AGENT.to_string(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.join(request.path.trim_start_matches('/'))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .query
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request)?;
        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(ACCEPT, "application/json");
        if !self.username.is_empty() {
            builder = builder.basic_auth(&self.username, Some(&self.api_key));
        }
        if let Some(body) = &request.body {
            trace!("Request body: {}", body);
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let meta = Response::from_headers(status.as_u16(), response.headers());
        let body = response.text().await?;

        if !status.is_success() {
            error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(ApiResponse { meta, body })
    }
}
