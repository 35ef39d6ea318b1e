//! OAuth 2.0 token introspection client (RFC 7662)

use crate::auth::error::AuthError;
use crate::auth::models::IntrospectionResult;
use crate::cache::{token_key, CacheBackend, CredentialCache};
use crate::config::auth::{AuthConfig, ClientCredentials};
use log::{debug, error, warn};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur while building the introspection client at startup
#[derive(Debug, Error)]
pub enum ClientSetupError {
    #[error("Invalid introspection URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Resolves bearer tokens against the authorization server, reading through the credential cache
#[derive(Clone)]
pub struct IntrospectionClient {
    http: Client,
    url: Url,
    credentials: Option<ClientCredentials>,
    cache: CredentialCache,
}

impl IntrospectionClient {
    pub fn new(
        http: Client,
        url: Url,
        credentials: Option<ClientCredentials>,
        cache: CredentialCache,
    ) -> Self {
        Self {
            http,
            url,
            credentials,
            cache,
        }
    }

    /// Build a client from configuration.
    ///
    /// Missing client credentials are not a startup error: every introspection
    /// then fails with [`AuthError::Configuration`].
    pub fn from_config(
        config: &AuthConfig,
        cache: CredentialCache,
    ) -> Result<Self, ClientSetupError> {
        let credentials = config.client_credentials();
        if credentials.is_none() {
            warn!("AUTH_CLIENT_ID and AUTH_CLIENT_SECRET are not set, every authenticated request will be rejected");
        }
        Ok(Self::new(
            create_http_client(config.introspection_timeout())?,
            config.introspection_url()?,
            credentials,
            cache,
        ))
    }

    pub fn cache(&self) -> &CredentialCache {
        &self.cache
    }

    /// Resolve a token into its introspection result.
    ///
    /// A fresh cached response is returned without a remote call. Otherwise a single
    /// request is made, and a successful, well-formed response is cached.
    pub async fn introspect(&self, token: &str) -> Result<IntrospectionResult, AuthError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            error!("Introspection client credentials are not configured");
            AuthError::Configuration
        })?;

        let fingerprint = &token_key(token)[..12];
        if let Some(raw) = self.cache.get(token).await {
            match IntrospectionResult::from_raw(&raw) {
                Ok(result) => {
                    debug!("Introspection cache hit for token {}", fingerprint);
                    return Ok(result);
                }
                Err(e) => warn!("Ignoring unreadable cached introspection result: {}", e),
            }
        }

        debug!(
            "Introspecting token {} at {}",
            fingerprint,
            self.url.as_str()
        );
        let response = self
            .http
            .post(self.url.clone())
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("token", token)])
            .send()
            .await
            .map_err(|e| {
                warn!("Introspection request failed: {}", e);
                AuthError::Authentication(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Introspection endpoint responded with status {}", status);
            return Err(AuthError::Authentication(format!(
                "unexpected status {status}"
            )));
        }

        let raw: Value = response.json().await.map_err(|e| {
            warn!("Failed to read introspection response: {}", e);
            AuthError::Authentication(format!("invalid response body: {e}"))
        })?;
        let result = IntrospectionResult::from_raw(&raw).map_err(|e| {
            warn!("Malformed introspection response: {}", e);
            AuthError::Authentication(format!("malformed response: {e}"))
        })?;

        self.cache.put(token, raw).await;
        debug!(
            "Token {} introspected: active={}",
            fingerprint, result.active
        );
        Ok(result)
    }
}

/// Create the HTTP client used for introspection requests
fn create_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(2)))
        // Configure connection pool
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .build()
}
