use crate::auth::error::AuthError;
use crate::auth::introspection::IntrospectionClient;
use crate::auth::models::Principal;
use crate::auth::policy::RequiredPolicy;
use crate::cache::CacheBackend;
use http::HeaderValue;
use log::{debug, warn};

/// Turns an `Authorization` header into an authenticated [`Principal`].
///
/// Checks run in a fixed order and the first failure wins:
/// bearer token present, introspection succeeds, token active,
/// audience matches, required scopes present.
#[derive(Clone)]
pub struct AuthorizationGate {
    client: IntrospectionClient,
    policy: RequiredPolicy,
}

impl AuthorizationGate {
    pub fn new(client: IntrospectionClient, policy: RequiredPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &RequiredPolicy {
        &self.policy
    }

    pub async fn authorize(
        &self,
        authorization: Option<&HeaderValue>,
    ) -> Result<Principal, AuthError> {
        let token = bearer_token(authorization).ok_or_else(|| {
            debug!("Request without a usable bearer token");
            AuthError::MissingCredentials
        })?;

        let result = self.client.introspect(token).await?;
        if !result.active {
            debug!("Rejected inactive token");
            return Err(AuthError::InactiveToken);
        }
        self.policy.check_audience(&result)?;
        self.policy.check_scopes(&result).inspect_err(|_| {
            warn!(
                "Token for subject {:?} lacks required scopes",
                result.subject
            )
        })?;

        Ok(result)
    }

    /// Checks that the credential cache is usable
    pub async fn health_check(&self) -> Result<(), String> {
        self.client.cache().health_check().await
    }
}

/// Extracts the token from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively. Any other scheme, a value that is not
/// visible ASCII, or an empty token yields `None`.
pub fn bearer_token(authorization: Option<&HeaderValue>) -> Option<&str> {
    let value = authorization?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::introspection::tests::test_client;
    use crate::auth::policy::{require_role, RequiredPolicy};
    use crate::cache::memory::InMemoryCache;
    use crate::cache::CredentialCache;
    use serde_json::{json, Value};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gate_with_response(
        body: Value,
        audience: &str,
        scopes: &str,
    ) -> (AuthorizationGate, MockServer) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/connect/introspect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        let cache = CredentialCache::InMemory(InMemoryCache::new(Duration::from_secs(30), 64));
        let gate = AuthorizationGate::new(
            test_client(&server, cache),
            RequiredPolicy::new(audience, scopes),
        );
        (gate, server)
    }

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_is_authorized() {
        let (gate, _server) = gate_with_response(
            json!({"active": true, "aud": "auth-template-api", "scope": "read", "role": "user"}),
            "auth-template-api",
            "",
        )
        .await;

        let principal = gate.authorize(Some(&header("Bearer abc123"))).await.unwrap();
        assert!(principal.active);
        assert_eq!(principal.role.as_deref(), Some("user"));
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected_without_remote_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"active": true})))
            .expect(0)
            .mount(&server)
            .await;
        let cache = CredentialCache::InMemory(InMemoryCache::new(Duration::from_secs(30), 64));
        let gate = AuthorizationGate::new(
            test_client(&server, cache),
            RequiredPolicy::new("auth-template-api", ""),
        );

        assert!(matches!(
            gate.authorize(None).await,
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            gate.authorize(Some(&header("Basic dXNlcjpwYXNz"))).await,
            Err(AuthError::MissingCredentials)
        ));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_admin_token_with_required_scope_is_authorized() {
        let (gate, _server) = gate_with_response(
            json!({"active": true, "aud": "auth-template-api", "scope": "read write", "role": "admin"}),
            "auth-template-api",
            "read",
        )
        .await;

        let principal = gate.authorize(Some(&header("Bearer abc123"))).await.unwrap();
        assert_eq!(principal.role.as_deref(), Some("admin"));
        assert!(require_role(&principal, "admin").is_ok());
        assert!(matches!(
            require_role(&principal, "user"),
            Err(AuthError::ForbiddenRole(role)) if role == "user"
        ));
    }

    #[tokio::test]
    async fn test_token_missing_one_required_scope_is_forbidden() {
        let (gate, _server) = gate_with_response(
            json!({"active": true, "aud": "auth-template-api", "scope": "read write", "role": "admin"}),
            "auth-template-api",
            "write delete",
        )
        .await;

        let err = gate
            .authorize(Some(&header("Bearer abc123")))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InsufficientScope));
        assert_eq!(err.status_code(), http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_inactive_token_is_rejected() {
        let (gate, _server) = gate_with_response(
            json!({"active": false, "aud": "auth-template-api", "scope": "read write", "role": "admin"}),
            "auth-template-api",
            "read",
        )
        .await;

        assert!(matches!(
            gate.authorize(Some(&header("Bearer abc123"))).await,
            Err(AuthError::InactiveToken)
        ));
    }

    #[tokio::test]
    async fn test_audience_mismatch_is_forbidden() {
        let (gate, _server) = gate_with_response(
            json!({"active": true, "aud": "other-api"}),
            "auth-template-api",
            "",
        )
        .await;

        let err = gate
            .authorize(Some(&header("Bearer abc123")))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidAudience));
        assert_eq!(err.status_code(), http::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_absent_audience_is_accepted() {
        let (gate, _server) =
            gate_with_response(json!({"active": true}), "auth-template-api", "").await;

        assert!(gate.authorize(Some(&header("Bearer abc123"))).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_scope_is_forbidden() {
        let (gate, _server) = gate_with_response(
            json!({"active": true, "aud": "auth-template-api", "scope": "read"}),
            "auth-template-api",
            "read write",
        )
        .await;

        assert!(matches!(
            gate.authorize(Some(&header("Bearer abc123"))).await,
            Err(AuthError::InsufficientScope)
        ));
    }

    #[tokio::test]
    async fn test_audience_checked_before_scopes() {
        let (gate, _server) = gate_with_response(
            json!({"active": true, "aud": "other-api"}),
            "auth-template-api",
            "write",
        )
        .await;

        assert!(matches!(
            gate.authorize(Some(&header("Bearer abc123"))).await,
            Err(AuthError::InvalidAudience)
        ));
    }

    #[tokio::test]
    async fn test_introspection_failure_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let cache = CredentialCache::InMemory(InMemoryCache::new(Duration::from_secs(30), 64));
        let gate = AuthorizationGate::new(test_client(&server, cache), RequiredPolicy::default());

        assert!(matches!(
            gate.authorize(Some(&header("Bearer abc123"))).await,
            Err(AuthError::Authentication(_))
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some(&header("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(Some(&header("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(Some(&header("BEARER  abc "))), Some("abc"));
        assert_eq!(bearer_token(Some(&header("Bearer "))), None);
        assert_eq!(bearer_token(Some(&header("Bearer"))), None);
        assert_eq!(bearer_token(Some(&header("Token abc"))), None);
        assert_eq!(bearer_token(None), None);
    }
}
