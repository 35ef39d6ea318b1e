//! Authorization server and token policy configuration

use crate::auth::policy::RequiredPolicy;
use confique::Config;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Configuration for the OAuth 2.0 introspection client and the token policy
#[derive(Config, Clone)]
pub struct AuthConfig {
    /// Authorization server base URL (default: http://localhost:4000)
    #[config(env = "AUTH_SERVER_URL", default = "http://localhost:4000")]
    pub server_url: String,

    /// Introspection path appended to the server URL (default: /connect/introspect)
    #[config(env = "INTROSPECTION_ENDPOINT", default = "/connect/introspect")]
    pub introspection_endpoint: String,

    /// Client identifier used for HTTP Basic authentication against the introspection endpoint
    #[config(env = "AUTH_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Client secret used for HTTP Basic authentication against the introspection endpoint
    #[config(env = "AUTH_CLIENT_SECRET")]
    pub client_secret: Option<String>,

    /// Audience every token must carry, empty disables the check (default: auth-template-api)
    #[config(env = "REQUIRED_AUDIENCE", default = "auth-template-api")]
    pub required_audience: String,

    /// Space-separated scopes every token must carry, empty disables the check
    #[config(env = "REQUIRED_SCOPES", default = "")]
    pub required_scopes: String,

    /// Timeout for introspection requests in seconds (default: 5)
    #[config(env = "AUTH_INTROSPECTION_TIMEOUT", default = 5)]
    pub introspection_timeout: u64,
}

/// Client identifier and secret pair for the introspection endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl AuthConfig {
    /// Full URL of the introspection endpoint
    pub fn introspection_url(&self) -> Result<Url, url::ParseError> {
        let base = self.server_url.trim_end_matches('/');
        Url::parse(&format!("{}{}", base, self.introspection_endpoint))
    }

    /// Returns the client credentials, or `None` when either half is missing or blank
    pub fn client_credentials(&self) -> Option<ClientCredentials> {
        let client_id = self.client_id.as_deref().map(str::trim).unwrap_or_default();
        let client_secret = self.client_secret.as_deref().unwrap_or_default();
        if client_id.is_empty() || client_secret.is_empty() {
            return None;
        }
        Some(ClientCredentials {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    /// Build the immutable policy the authorization gate enforces
    pub fn required_policy(&self) -> RequiredPolicy {
        RequiredPolicy::new(&self.required_audience, &self.required_scopes)
    }

    pub fn introspection_timeout(&self) -> Duration {
        Duration::from_secs(self.introspection_timeout)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("server_url", &self.server_url)
            .field("introspection_endpoint", &self.introspection_endpoint)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("required_audience", &self.required_audience)
            .field("required_scopes", &self.required_scopes)
            .field("introspection_timeout", &self.introspection_timeout)
            .finish()
    }
}

#[cfg(test)]
impl AuthConfig {
    /// Configuration pointing at a mock authorization server
    pub fn for_test(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            introspection_endpoint: "/connect/introspect".to_string(),
            client_id: Some("translator-api".to_string()),
            client_secret: Some("s3cr3t".to_string()),
            required_audience: "auth-template-api".to_string(),
            required_scopes: String::new(),
            introspection_timeout: 5,
        }
    }
}
