use crate::api::multipart::{FileUpload, UploadForm};
use crate::auth::{require_role, Principal};
use crate::errors::ApiError;
use crate::openapi::DOCUMENTS_TAG;
use crate::state::AppState;
use crate::store::DocumentStatus;
use axum::extract::{Extension, Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

pub(crate) const USER_ROLE: &str = "user";
pub(crate) const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct UploadRequestCreated {
    request_id: String,
    status: DocumentStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct DocumentCreated {
    doc_id: String,
    status: DocumentStatus,
}

/// Submit a document for admin approval
#[utoipa::path(
    post,
    path = "/user/upload",
    tag = DOCUMENTS_TAG,
    security(("bearer" = [])),
    request_body(content = FileUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Upload request created", body = UploadRequestCreated),
        (status = 401, description = "Missing, inactive or unverifiable token"),
        (status = 403, description = "Caller does not have the user role"),
        (status = 422, description = "The file field is missing")
    )
)]
async fn user_upload(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    multipart: Multipart,
) -> Result<Json<UploadRequestCreated>, ApiError> {
    require_role(&principal, USER_ROLE)?;
    let file = UploadForm::read(multipart).await?.take_file("file")?;

    let request = state
        .documents
        .create_request(&file.filename, principal.subject.as_deref())
        .await;
    Ok(Json(UploadRequestCreated {
        request_id: request.id,
        status: request.status,
    }))
}

/// Upload an approved document directly
#[utoipa::path(
    post,
    path = "/admin/upload",
    tag = DOCUMENTS_TAG,
    security(("bearer" = [])),
    request_body(content = FileUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document stored", body = DocumentCreated),
        (status = 401, description = "Missing, inactive or unverifiable token"),
        (status = 403, description = "Caller does not have the admin role"),
        (status = 422, description = "The file field is missing")
    )
)]
async fn admin_upload(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    multipart: Multipart,
) -> Result<Json<DocumentCreated>, ApiError> {
    require_role(&principal, ADMIN_ROLE)?;
    let file = UploadForm::read(multipart).await?.take_file("file")?;

    let document = state
        .documents
        .create_approved(&file.filename, principal.subject.as_deref())
        .await;
    Ok(Json(DocumentCreated {
        doc_id: document.id,
        status: document.status,
    }))
}

/// Approve a pending upload request
#[utoipa::path(
    post,
    path = "/admin/approve/{request_id}",
    tag = DOCUMENTS_TAG,
    security(("bearer" = [])),
    params(
        ("request_id" = String, Path, description = "Id of the pending request, e.g. req-1")
    ),
    responses(
        (status = 200, description = "Request approved", body = UploadRequestCreated),
        (status = 401, description = "Missing, inactive or unverifiable token"),
        (status = 403, description = "Caller does not have the admin role"),
        (status = 404, description = "No pending request with this id")
    )
)]
async fn approve_request(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(request_id): Path<String>,
) -> Result<Json<UploadRequestCreated>, ApiError> {
    require_role(&principal, ADMIN_ROLE)?;

    match state.documents.approve(&request_id).await {
        Some(document) => Ok(Json(UploadRequestCreated {
            request_id: document.id,
            status: document.status,
        })),
        None => Err(ApiError::not_found("Request not found")),
    }
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(user_upload))
        .routes(routes!(admin_upload))
        .routes(routes!(approve_request))
}
