//! Token introspection data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use utoipa::ToSchema;

/// The authorization server's answer about a token.
///
/// Built from the raw introspection response, either fresh from the network or
/// from the credential cache. Field names on the wire follow RFC 7662.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IntrospectionResult {
    /// Whether the token is currently active
    pub active: bool,
    /// End-user or service identity
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Intended recipient of the token
    #[serde(rename = "aud", default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    /// Granted scopes (space-separated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Client that requested the token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Expiration timestamp (Unix seconds)
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
    /// Coarse application role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// The authenticated caller of the current request
pub type Principal = IntrospectionResult;

impl IntrospectionResult {
    /// Parse a raw introspection response body
    pub fn from_raw(raw: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(raw)
    }

    /// Scopes claimed by the token
    pub fn scopes(&self) -> HashSet<&str> {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Token expiration as a UTC timestamp, if the server reported one
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
    }
}
