use crate::api::multipart::UploadForm;
use crate::errors::ApiError;
use crate::openapi::TRANSLATION_TAG;
use crate::state::AppState;
use crate::translation::Language;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use log::warn;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Multipart body of a translation request
#[derive(ToSchema)]
#[allow(dead_code)]
pub(crate) struct TranslateDocumentForm {
    /// PDF, DOCX or PPTX document
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    source_language: Language,
    target_language: Language,
}

/// Translate a document between two supported languages.
///
/// PDF documents are converted to DOCX before translation and returned as DOCX.
#[utoipa::path(
    post,
    path = "/translate-document/",
    tag = TRANSLATION_TAG,
    security(("bearer" = [])),
    request_body(content = TranslateDocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Translated document", content_type = "application/octet-stream"),
        (status = 400, description = "Same source and target language, unknown language or unsupported format"),
        (status = 401, description = "Missing, inactive or unverifiable token"),
        (status = 403, description = "Token audience or scopes rejected"),
        (status = 422, description = "A form field is missing"),
        (status = 500, description = "The document could not be translated")
    )
)]
async fn translate_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file("file")?;
    let source = parse_language(form.text("source_language")?)?;
    let target = parse_language(form.text("target_language")?)?;

    let document = state
        .translation
        .translate_document(&file.filename, &file.content, source, target)
        .await
        .inspect_err(|e| warn!("Failed to translate {}: {}", file.filename, e))?;

    Ok((
        [
            (CONTENT_TYPE, document.media_type.to_string()),
            (
                CONTENT_DISPOSITION,
                attachment_disposition(&document.filename),
            ),
        ],
        document.bytes,
    )
        .into_response())
}

/// `Content-Disposition` for a download, with an ASCII fallback name and the
/// exact name as RFC 5987 `filename*`
fn attachment_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            ' '..='~' => c,
            _ => '_',
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

fn parse_language(value: &str) -> Result<Language, ApiError> {
    value.parse().map_err(ApiError::bad_request)
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(translate_document))
}
