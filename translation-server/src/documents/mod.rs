//! Document formats and the translation pipeline

use crate::errors::ApiError;
use std::path::Path;
use thiserror::Error;

pub mod ooxml;
pub mod pdf;
pub mod pipeline;

pub use pdf::{CommandPdfConverter, PdfConverter};
pub use pipeline::TranslationService;

pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PPTX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Formats accepted for translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Pptx,
}

impl DocumentFormat {
    /// Detects the format from the file extension, ignoring case
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename).extension()?.to_str()?;
        match extension.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Media type of the translated output. PDF inputs come back as DOCX.
    pub fn output_media_type(&self) -> &'static str {
        match self {
            Self::Pdf | Self::Docx => DOCX_MEDIA_TYPE,
            Self::Pptx => PPTX_MEDIA_TYPE,
        }
    }

    /// File name of the translated output
    pub fn output_filename(&self, filename: &str) -> String {
        match self {
            Self::Pdf => {
                let stem = Path::new(filename)
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("document");
                format!("translated_{stem}.docx")
            }
            Self::Docx | Self::Pptx => format!("translated_{filename}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Source and target languages must differ.")]
    SameLanguage,
    #[error("Only PDF, PPTX, and DOCX formats are supported.")]
    UnsupportedFormat,
    #[error("Invalid document package: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Document part {0} is not valid UTF-8")]
    Encoding(String),
    #[error("Document part {0} is too large")]
    PartTooLarge(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("conversion failed: {0}")]
    Conversion(String),
    #[error("PDF translation failed: {0}")]
    Pdf(Box<DocumentError>),
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::SameLanguage
            | DocumentError::UnsupportedFormat
            | DocumentError::PartTooLarge(_) => ApiError::bad_request(err),
            DocumentError::Pdf(_) => ApiError::internal(err),
            other => ApiError::internal(format!("Document translation failed: {other}")),
        }
    }
}
