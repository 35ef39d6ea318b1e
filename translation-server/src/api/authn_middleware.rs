use crate::auth::Principal;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::{info, warn};

/// Authorizes the request's bearer token and exposes the resolved [`Principal`]
/// to handlers through the request extensions
pub(super) async fn authentication_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let authorization = request.headers().get(http::header::AUTHORIZATION).cloned();

    match state.gate.authorize(authorization.as_ref()).await {
        Ok(principal) => {
            request.extensions_mut().insert::<Principal>(principal);
            next.run(request).await
        }
        Err(err) => {
            let status = err.status_code();
            if status.is_server_error() {
                warn!("Rejected {} {}: {}", request.method(), request.uri().path(), err);
            } else {
                info!("Rejected {} {}: {}", request.method(), request.uri().path(), err);
            }
            err.into_response()
        }
    }
}
