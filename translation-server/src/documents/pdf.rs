use crate::config::DocumentsConfig;
use crate::documents::DocumentError;
use log::{debug, warn};
use std::time::Duration;
use tokio::process::Command;

/// Converts PDF documents to DOCX
#[async_trait::async_trait]
pub trait PdfConverter: Send + Sync {
    async fn convert(&self, pdf: &[u8]) -> Result<Vec<u8>, DocumentError>;
}

/// Runs an external converter as `<command> convert <input.pdf> <output.docx>`.
///
/// Input and output live in a temporary directory removed once the conversion
/// finishes, whatever its outcome.
#[derive(Debug, Clone)]
pub struct CommandPdfConverter {
    command: String,
    timeout: Duration,
}

impl CommandPdfConverter {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    pub fn from_config(config: &DocumentsConfig) -> Self {
        Self::new(
            config.pdf_converter_command.clone(),
            config.pdf_conversion_timeout(),
        )
    }
}

#[async_trait::async_trait]
impl PdfConverter for CommandPdfConverter {
    async fn convert(&self, pdf: &[u8]) -> Result<Vec<u8>, DocumentError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("input.pdf");
        let output = workdir.path().join("output.docx");
        tokio::fs::write(&input, pdf).await?;

        debug!("Converting PDF ({} bytes) with {}", pdf.len(), self.command);
        let run = Command::new(&self.command)
            .arg("convert")
            .arg(&input)
            .arg(&output)
            .kill_on_drop(true)
            .output();
        let result = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| {
                warn!("PDF conversion timed out after {:?}", self.timeout);
                DocumentError::Conversion(format!("timed out after {:?}", self.timeout))
            })?
            .map_err(|e| {
                DocumentError::Conversion(format!("failed to run {}: {}", self.command, e))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            warn!("PDF converter exited with {}: {}", result.status, stderr.trim());
            return Err(DocumentError::Conversion(format!(
                "converter exited with {}",
                result.status
            )));
        }

        tokio::fs::read(&output).await.map_err(|e| {
            DocumentError::Conversion(format!("converter produced no output: {e}"))
        })
    }
}
