//! Client for the MCP server management API.
//!
//! This crate provides:
//!
//! - [`ServerApi`], the async seam the console talks to (list, create, update,
//!   delete). Tests substitute an in-memory implementation.
//! - [`AdminClient`], the `reqwest` implementation against a proxy's
//!   `/v1/mcp/server` endpoints.
//! - Credential discovery from `MCPDASH_API_KEY` or `~/.netrc`.
//!
//! # Example
//!
//! ```ignore
//! use mcpdash_api::{AdminClient, ServerApi};
//!
//! async fn print_servers(token: &str) -> Result<(), mcpdash_api::ApiError> {
//!     let client = AdminClient::new("http://localhost:4000")?;
//!     for server in client.list_servers(token).await? {
//!         println!("{} {}", server.id, server.display_name());
//!     }
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use mcpdash_types::{NewServer, ServerRecord, ServerUpdate};
use mcpdash_util::redact_sensitive;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::{Client, Method, RequestBuilder, Response, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

pub use credentials::{API_KEY_ENV, discover_credential};
pub use error::ApiError;

/// Environment variable overriding the API base URL.
pub const API_BASE_ENV: &str = "MCPDASH_API_BASE";
/// Base URL used when nothing else is configured (a locally running proxy).
pub const DEFAULT_API_BASE: &str = "http://localhost:4000";

const SERVERS_PATH: &str = "/v1/mcp/server";
/// Hostnames allowed to use plain HTTP.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];
/// Characters escaped when an id is placed in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Operations the console needs from the management API.
///
/// Every call takes the caller's credential explicitly; implementations must
/// fail with [`ApiError::MissingCredential`] without touching the network
/// when it is blank.
#[async_trait]
pub trait ServerApi: Send + Sync {
    /// Fetch the full server collection in server order.
    async fn list_servers(&self, credential: &str) -> Result<Vec<ServerRecord>, ApiError>;
    async fn delete_server(&self, credential: &str, server_id: &str) -> Result<(), ApiError>;
    async fn create_server(&self, credential: &str, server: &NewServer) -> Result<ServerRecord, ApiError>;
    async fn update_server(&self, credential: &str, update: &ServerUpdate) -> Result<ServerRecord, ApiError>;
}

/// Thin wrapper around a configured `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct AdminClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl AdminClient {
    /// Build a client for `base_url` after validating it.
    ///
    /// Non-localhost hosts must use HTTPS.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        validate_base_url(base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            user_agent: format!("mcpdash/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Build a client from `MCPDASH_API_BASE`, falling back to [`DEFAULT_API_BASE`].
    pub fn from_environment() -> Result<Self, ApiError> {
        let base_url = env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(&base_url)
    }

    /// Build an authenticated request for an API-relative path.
    pub fn request(&self, method: Method, path: &str, credential: &str) -> Result<RequestBuilder, ApiError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(ApiError::MissingCredential);
        }
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "building request");

        Ok(self
            .http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
            .bearer_auth(credential))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = ensure_success(request.send().await?).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ServerApi for AdminClient {
    async fn list_servers(&self, credential: &str) -> Result<Vec<ServerRecord>, ApiError> {
        let request = self.request(Method::GET, SERVERS_PATH, credential)?;
        let body: ServerListBody = self.send_json(request).await?;
        let servers = body.into_records();
        debug!(count = servers.len(), "fetched mcp servers");
        Ok(servers)
    }

    async fn delete_server(&self, credential: &str, server_id: &str) -> Result<(), ApiError> {
        let path = format!("{SERVERS_PATH}/{}", utf8_percent_encode(server_id, PATH_SEGMENT));
        let request = self.request(Method::DELETE, &path, credential)?;
        ensure_success(request.send().await?).await?;
        Ok(())
    }

    async fn create_server(&self, credential: &str, server: &NewServer) -> Result<ServerRecord, ApiError> {
        let request = self.request(Method::POST, SERVERS_PATH, credential)?.json(server);
        self.send_json(request).await
    }

    async fn update_server(&self, credential: &str, update: &ServerUpdate) -> Result<ServerRecord, ApiError> {
        let request = self.request(Method::PUT, SERVERS_PATH, credential)?.json(update);
        self.send_json(request).await
    }
}

/// The list endpoint answers with a bare array; some deployments wrap it.
#[derive(Deserialize)]
#[serde(untagged)]
enum ServerListBody {
    Bare(Vec<ServerRecord>),
    Wrapped { data: Vec<ServerRecord> },
}

impl ServerListBody {
    fn into_records(self) -> Vec<ServerRecord> {
        match self {
            Self::Bare(records) | Self::Wrapped { data: records } => records,
        }
    }
}

/// Turn non-2xx responses into [`ApiError::Status`] with the server's message.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message_from_body(&body).unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
    warn!(status = status.as_u16(), message = %redact_sensitive(&message), "api request failed");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Pull a human message out of the common error envelopes
/// (`{"detail": ..}`, `{"error": {"message": ..}}`, `{"message": ..}`).
fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let candidate = value
        .get("detail")
        .or_else(|| value.get("error").and_then(|error| error.get("message")))
        .or_else(|| value.get("error"))
        .or_else(|| value.get("message"))?;
    match candidate {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost`, `127.0.0.1`, `[::1]`: any of http/https
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<(), ApiError> {
    let parsed = Url::parse(base).map_err(|error| ApiError::InvalidBaseUrl(format!("'{base}': {error}")))?;
    let host_name = parsed
        .host_str()
        .ok_or_else(|| ApiError::InvalidBaseUrl(format!("'{base}' must include a host")))?;

    if LOCALHOST_DOMAINS.iter().any(|allowed| host_name.eq_ignore_ascii_case(allowed)) {
        return match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ApiError::InvalidBaseUrl(format!("unsupported scheme '{other}://'"))),
        };
    }

    if parsed.scheme() != "https" {
        return Err(ApiError::InvalidBaseUrl(format!(
            "non-localhost hosts must use https; got '{}://'",
            parsed.scheme()
        )));
    }
    Ok(())
}
