//! MCP server records as returned by the management API, plus the request
//! payloads used to create and edit them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Connection mode of a managed MCP server.
///
/// Unknown wire values are preserved verbatim in [`TransportKind::Other`] so
/// that a newer server never breaks the list view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransportKind {
    Sse,
    #[default]
    Http,
    Stdio,
    Other(String),
}

impl TransportKind {
    /// Transports offered by the create and edit forms, in cycling order.
    pub const SELECTABLE: [TransportKind; 3] = [TransportKind::Http, TransportKind::Sse, TransportKind::Stdio];

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Sse => "sse",
            Self::Http => "http",
            Self::Stdio => "stdio",
            Self::Other(value) => value.as_str(),
        }
    }

    /// Human-facing label used in tables and detail views.
    pub fn display(&self) -> &str {
        match self {
            Self::Sse => "SSE",
            Self::Http => "HTTP",
            Self::Stdio => "STDIO",
            Self::Other(value) => value.as_str(),
        }
    }
}

impl From<String> for TransportKind {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "sse" => Self::Sse,
            "http" | "streamable_http" | "streamable-http" => Self::Http,
            "stdio" => Self::Stdio,
            _ => Self::Other(value),
        }
    }
}

impl From<TransportKind> for String {
    fn from(value: TransportKind) -> Self {
        value.as_wire().to_string()
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// Authentication mode the proxy uses when talking to a managed server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthKind {
    #[default]
    None,
    ApiKey,
    BearerToken,
    Basic,
    Other(String),
}

impl AuthKind {
    pub const SELECTABLE: [AuthKind; 4] = [AuthKind::None, AuthKind::ApiKey, AuthKind::BearerToken, AuthKind::Basic];

    pub fn as_wire(&self) -> &str {
        match self {
            Self::None => "none",
            Self::ApiKey => "api_key",
            Self::BearerToken => "bearer_token",
            Self::Basic => "basic",
            Self::Other(value) => value.as_str(),
        }
    }

    pub fn display(&self) -> &str {
        match self {
            Self::None => "None",
            Self::ApiKey => "API Key",
            Self::BearerToken => "Bearer Token",
            Self::Basic => "Basic Auth",
            Self::Other(value) => value.as_str(),
        }
    }
}

impl From<String> for AuthKind {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Self::None,
            "api_key" => Self::ApiKey,
            "bearer_token" => Self::BearerToken,
            "basic" => Self::Basic,
            _ => Self::Other(value),
        }
    }
}

impl From<AuthKind> for String {
    fn from(value: AuthKind) -> Self {
        value.as_wire().to_string()
    }
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// One managed MCP server.
///
/// `Default` doubles as the empty placeholder handed to the detail view when
/// a selected id is no longer present in the fetched collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Opaque identifier, immutable after creation.
    #[serde(rename = "server_id")]
    pub id: String,
    /// Display label.
    #[serde(rename = "alias", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "transport", default, deserialize_with = "null_as_default")]
    pub transport_kind: TransportKind,
    #[serde(rename = "auth_type", default, deserialize_with = "null_as_default")]
    pub auth_kind: AuthKind,
    #[serde(rename = "url", default)]
    pub endpoint_url: String,
    /// Creation timestamp as sent by the server; formats vary between
    /// deployments so parsing is left to the display layer.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ServerRecord {
    /// Whether this is the empty placeholder rather than a fetched record.
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }

    /// Label shown to users: the alias when present, otherwise the id.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.id.as_str(),
        }
    }

    /// Build an update payload carrying every editable field of this record.
    pub fn to_update(&self) -> ServerUpdate {
        ServerUpdate {
            server_id: self.id.clone(),
            alias: self.name.clone(),
            description: self.description.clone(),
            transport: self.transport_kind.clone(),
            auth_type: self.auth_kind.clone(),
            url: self.endpoint_url.clone(),
        }
    }
}

/// Payload for `POST /v1/mcp/server`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewServer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub transport: TransportKind,
    pub auth_type: AuthKind,
    pub url: String,
}

/// Payload for `PUT /v1/mcp/server`; `server_id` selects the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerUpdate {
    pub server_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub transport: TransportKind,
    pub auth_type: AuthKind,
    pub url: String,
}
