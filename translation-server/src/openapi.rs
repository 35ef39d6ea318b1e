use crate::state::AppState;
use axum::{routing::get, Json, Router};
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const IDENTITY_TAG: &str = "Identity API";
pub(crate) const DOCUMENTS_TAG: &str = "Documents API";
pub(crate) const TRANSLATION_TAG: &str = "Translation API";

#[derive(OpenApi)]
#[openapi(
    modifiers(&BearerSecurity),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = IDENTITY_TAG, description = "Caller identity endpoints"),
        (name = DOCUMENTS_TAG, description = "Document upload and approval endpoints"),
        (name = TRANSLATION_TAG, description = "Document translation endpoints"),
    ),
    info(
        title = "Translation API",
        description = "Document translation service secured by OAuth 2.0 token introspection",
        version = "1.0.0"
    )
)]
pub(crate) struct ApiDoc;

/// Registers the bearer token scheme referenced by protected routes
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi
            .components
            .get_or_insert_with(Default::default)
            .add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
    }
}

/// Creates a router serving the OpenAPI document
pub(crate) fn router(api_doc: utoipa::openapi::OpenApi) -> Router<AppState> {
    let api_doc = Arc::new(api_doc);
    Router::new().route(
        "/openapi.json",
        get(move || {
            let api_doc = api_doc.clone();
            async move { Json(api_doc.as_ref().clone()) }
        }),
    )
}
