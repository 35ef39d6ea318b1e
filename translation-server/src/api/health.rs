use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Readiness check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Health {
    status: &'static str,
    details: Option<Value>,
    #[serde(skip)]
    status_code: StatusCode,
}

impl IntoResponse for Health {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({
            "status": self.status
        });

        if let Some(Value::Object(obj)) = self.details {
            for (key, value) in obj {
                body[key] = value;
            }
        }

        (self.status_code, Json(body)).into_response()
    }
}

/// Liveness check, answers plain text
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is alive", body = String, content_type = "text/plain")
    )
)]
async fn health_check() -> &'static str {
    "ok"
}

/// Readiness check handler
#[utoipa::path(
    get,
    path = "/ready",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is ready", body = Health),
        (status = 503, description = "Service is not ready", body = Health)
    )
)]
async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.health_check().await {
        Health {
            status: "ok",
            details: Some(serde_json::json!({
                "cache_status": "healthy",
                "pending_requests": state.documents.pending_count().await,
                "approved_documents": state.documents.approved_count().await
            })),
            status_code: StatusCode::OK,
        }
    } else {
        Health {
            status: "error",
            details: Some(serde_json::json!({
                "error": "One or more components are not healthy"
            })),
            status_code: StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(ready_check))
}
