use confique::Config;
use std::time::Duration;

/// Configuration for document handling
#[derive(Debug, Config, Clone)]
pub struct DocumentsConfig {
    /// Program used to convert PDF files to DOCX, invoked as `<command> convert <in> <out>`
    #[config(env = "PDF_CONVERTER_COMMAND", default = "pdf2docx")]
    pub pdf_converter_command: String,

    /// Timeout for a single PDF conversion in seconds (default: 300)
    #[config(env = "PDF_CONVERSION_TIMEOUT", default = 300)]
    pub pdf_conversion_timeout: u64,

    /// Maximum accepted request body size in MiB (default: 50)
    #[config(env = "MAX_UPLOAD_SIZE_MB", default = 50)]
    pub max_upload_size_mb: usize,

    /// Maximum inflated size in MiB of a single text part of a DOCX or PPTX (default: 100)
    #[config(env = "MAX_DOCUMENT_PART_SIZE_MB", default = 100)]
    pub max_part_size_mb: u64,
}

impl DocumentsConfig {
    pub fn pdf_conversion_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_conversion_timeout)
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn max_part_size_bytes(&self) -> u64 {
        self.max_part_size_mb.saturating_mul(1024 * 1024)
    }
}
