use crate::auth::Principal;
use crate::openapi::{HEALTH_TAG, IDENTITY_TAG};
use crate::state::AppState;
use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Authenticated health check response
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct AuthHealth {
    status: String,
    sub: Option<String>,
    aud: Option<String>,
    scope: Option<String>,
    role: Option<String>,
}

/// Identity of the caller as seen by the authorization server
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct WhoAmI {
    sub: Option<String>,
    aud: Option<String>,
    scope: Option<String>,
    client_id: Option<String>,
    role: Option<String>,
    /// Token expiration, when the authorization server reported one
    expires_at: Option<DateTime<Utc>>,
}

/// Health check that requires a valid token
#[utoipa::path(
    get,
    path = "/health/auth",
    tag = HEALTH_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Token accepted", body = AuthHealth),
        (status = 401, description = "Missing, inactive or unverifiable token"),
        (status = 403, description = "Token audience or scopes rejected")
    )
)]
async fn auth_health(Extension(principal): Extension<Principal>) -> Json<AuthHealth> {
    Json(AuthHealth {
        status: "ok".to_string(),
        sub: principal.subject,
        aud: principal.audience,
        scope: principal.scope,
        role: principal.role,
    })
}

/// Returns the claims of the caller's token
#[utoipa::path(
    get,
    path = "/whoami",
    tag = IDENTITY_TAG,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller identity", body = WhoAmI),
        (status = 401, description = "Missing, inactive or unverifiable token"),
        (status = 403, description = "Token audience or scopes rejected")
    )
)]
async fn whoami(Extension(principal): Extension<Principal>) -> Json<WhoAmI> {
    let expires_at = principal.expires_at();
    Json(WhoAmI {
        sub: principal.subject,
        aud: principal.audience,
        scope: principal.scope,
        client_id: principal.client_id,
        role: principal.role,
        expires_at,
    })
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth_health))
        .routes(routes!(whoami))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestFixture, TEST_TOKEN};
    use axum::body::Body;
    use http::{Request, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_auth_health_returns_claims() {
        let fixture = TestFixture::new().await;
        fixture
            .add_introspection_mock(
                TEST_TOKEN,
                json!({
                    "active": true,
                    "sub": "user-1",
                    "aud": "auth-template-api",
                    "scope": "read",
                    "role": "user"
                }),
                1,
            )
            .await;

        let response = fixture.get("/health/auth").await;

        response.assert_ok();
        assert_eq!(
            response.json_as::<AuthHealth>(),
            AuthHealth {
                status: "ok".to_string(),
                sub: Some("user-1".to_string()),
                aud: Some("auth-template-api".to_string()),
                scope: Some("read".to_string()),
                role: Some("user".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_whoami_without_token() {
        let fixture = TestFixture::new().await;
        fixture
            .add_introspection_mock(TEST_TOKEN, json!({"active": true}), 0)
            .await;
        let request = Request::get("/whoami").body(Body::empty()).unwrap();

        let response = fixture.send(request).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.detail(), "Missing Bearer token");
        assert_eq!(response.header("www-authenticate"), Some("Bearer"));
    }

    #[tokio::test]
    async fn test_whoami_returns_identity_and_uses_cache() {
        let fixture = TestFixture::new().await;
        fixture
            .add_introspection_mock(
                TEST_TOKEN,
                json!({
                    "active": true,
                    "sub": "svc-7",
                    "client_id": "batch-job",
                    "exp": 1_900_000_000,
                    "role": "admin"
                }),
                1,
            )
            .await;

        let first = fixture.get("/whoami").await;
        let second = fixture.get("/whoami").await;

        first.assert_ok();
        second.assert_ok();
        assert_eq!(first.json, second.json);
        assert_eq!(
            first.json,
            json!({
                "sub": "svc-7",
                "aud": null,
                "scope": null,
                "client_id": "batch-job",
                "role": "admin",
                "expires_at": "2030-03-17T17:46:40Z"
            })
        );
    }

    #[tokio::test]
    async fn test_insufficient_scope() {
        let fixture = TestFixture::with_config(|config| {
            config.auth.required_scopes = "translate".to_string();
        })
        .await;
        fixture
            .add_introspection_mock(TEST_TOKEN, json!({"active": true, "scope": "read"}), 1)
            .await;

        let response = fixture.get("/whoami").await;

        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(response.detail(), "Insufficient scopes");
    }
}
