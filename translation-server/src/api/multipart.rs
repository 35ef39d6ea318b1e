use crate::errors::ApiError;
use axum::body::Bytes;
use axum::extract::Multipart;
use http::StatusCode;
use std::collections::HashMap;
use utoipa::ToSchema;

/// A file received in a multipart form
#[derive(Debug)]
pub(crate) struct UploadedFile {
    pub filename: String,
    pub content: Bytes,
}

/// The fields of a multipart form, files and text kept apart
#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    files: HashMap<String, UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Reads every field of the form into memory
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let content = field.bytes().await?;
                    form.files.insert(name, UploadedFile { filename, content });
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    /// Removes and returns a required file field
    pub fn take_file(&mut self, name: &str) -> Result<UploadedFile, ApiError> {
        self.files.remove(name).ok_or_else(|| missing_field(name))
    }

    /// Returns a required text field
    pub fn text(&self, name: &str) -> Result<&str, ApiError> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| missing_field(name))
    }
}

fn missing_field(name: &str) -> ApiError {
    ApiError::new(
        format!("Field required: {name}"),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
}

/// Multipart body carrying a single document
#[derive(ToSchema)]
#[allow(dead_code)]
pub(crate) struct FileUpload {
    /// The uploaded document
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}
