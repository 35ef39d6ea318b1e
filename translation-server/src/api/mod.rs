mod authn_middleware;
pub(crate) mod documents;
pub(crate) mod health;
pub(crate) mod identity;
mod multipart;
pub(crate) mod translate;

use crate::api::authn_middleware::authentication_middleware;
use crate::state::AppState;
use axum::middleware;
use utoipa_axum::router::OpenApiRouter;

/// Combines all API routes into a single router
pub(super) fn router(state: &AppState) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(health::router())
        .merge(protected_routes(state))
}

/// Creates a router for protected routes that require a valid bearer token
fn protected_routes(state: &AppState) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(identity::router())
        .merge(documents::router())
        .merge(translate::router())
        // route_layer so unmatched paths stay 404 instead of 401
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ))
}
