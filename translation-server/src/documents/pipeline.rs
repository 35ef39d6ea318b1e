use crate::documents::ooxml::{translate_package, Markup};
use crate::documents::{DocumentError, DocumentFormat, PdfConverter};
use crate::translation::{Language, Translator};
use log::info;
use std::sync::Arc;

/// A translated document ready to be sent back to the caller
#[derive(Debug, Clone)]
pub struct TranslatedDocument {
    pub filename: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Detects the document format and runs the matching translation pipeline
pub struct TranslationService {
    translator: Arc<dyn Translator>,
    converter: Arc<dyn PdfConverter>,
    max_part_size: u64,
}

impl TranslationService {
    /// `max_part_size` bounds the inflated size of each text part of a package
    pub fn new(
        translator: Arc<dyn Translator>,
        converter: Arc<dyn PdfConverter>,
        max_part_size: u64,
    ) -> Self {
        Self {
            translator,
            converter,
            max_part_size,
        }
    }

    pub async fn translate_document(
        &self,
        filename: &str,
        content: &[u8],
        source: Language,
        target: Language,
    ) -> Result<TranslatedDocument, DocumentError> {
        if source == target {
            return Err(DocumentError::SameLanguage);
        }
        let format = DocumentFormat::from_filename(filename).ok_or(DocumentError::UnsupportedFormat)?;
        info!(
            "Translating {} ({:?}, {} bytes) from {} to {}",
            filename,
            format,
            content.len(),
            source,
            target
        );

        let bytes = match format {
            DocumentFormat::Docx => {
                self.translate_ooxml(content, Markup::Wordprocessing, source, target)
                    .await?
            }
            DocumentFormat::Pptx => {
                self.translate_ooxml(content, Markup::Presentation, source, target)
                    .await?
            }
            DocumentFormat::Pdf => self
                .translate_pdf(content, source, target)
                .await
                .map_err(|e| DocumentError::Pdf(Box::new(e)))?,
        };

        Ok(TranslatedDocument {
            filename: format.output_filename(filename),
            media_type: format.output_media_type(),
            bytes,
        })
    }

    async fn translate_pdf(
        &self,
        content: &[u8],
        source: Language,
        target: Language,
    ) -> Result<Vec<u8>, DocumentError> {
        let docx = self.converter.convert(content).await?;
        self.translate_ooxml(&docx, Markup::Wordprocessing, source, target)
            .await
    }

    async fn translate_ooxml(
        &self,
        package: &[u8],
        markup: Markup,
        source: Language,
        target: Language,
    ) -> Result<Vec<u8>, DocumentError> {
        translate_package(
            package,
            markup,
            self.translator.as_ref(),
            source,
            target,
            self.max_part_size,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::fixtures::{read_part, sample_docx, sample_pptx, TaggingTranslator};
    use crate::documents::{DOCX_MEDIA_TYPE, PPTX_MEDIA_TYPE};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Converter that returns a fixed DOCX, or fails when none is set
    struct FixedConverter {
        docx: Option<Vec<u8>>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl PdfConverter for FixedConverter {
        async fn convert(&self, _pdf: &[u8]) -> Result<Vec<u8>, DocumentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.docx
                .clone()
                .ok_or_else(|| DocumentError::Conversion("exit status: 1".to_string()))
        }
    }

    fn build_service(docx: Option<Vec<u8>>) -> (TranslationService, Arc<FixedConverter>) {
        let converter = Arc::new(FixedConverter {
            docx,
            calls: AtomicUsize::new(0),
        });
        let service = TranslationService::new(
            Arc::new(TaggingTranslator::default()),
            converter.clone(),
            1024 * 1024,
        );
        (service, converter)
    }

    #[tokio::test]
    async fn test_same_language_is_rejected_first() {
        let (service, _) = build_service(None);
        assert!(matches!(
            service
                .translate_document("notes.txt", b"", Language::French, Language::French)
                .await,
            Err(DocumentError::SameLanguage)
        ));
    }

    #[tokio::test]
    async fn test_unsupported_format() {
        let (service, _) = build_service(None);
        assert!(matches!(
            service
                .translate_document("notes.txt", b"", Language::English, Language::French)
                .await,
            Err(DocumentError::UnsupportedFormat)
        ));
    }

    #[tokio::test]
    async fn test_docx_translation() {
        let (service, converter) = build_service(None);
        let document = service
            .translate_document("letter.docx", &sample_docx(), Language::English, Language::German)
            .await
            .unwrap();

        assert_eq!(document.filename, "translated_letter.docx");
        assert_eq!(document.media_type, DOCX_MEDIA_TYPE);
        let body = String::from_utf8(read_part(&document.bytes, "word/document.xml")).unwrap();
        assert!(body.contains("[German] Hello world"));
        assert_eq!(converter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pptx_translation() {
        let (service, _) = build_service(None);
        let document = service
            .translate_document("deck.PPTX", &sample_pptx(), Language::English, Language::Spanish)
            .await
            .unwrap();

        assert_eq!(document.filename, "translated_deck.PPTX");
        assert_eq!(document.media_type, PPTX_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_pdf_is_converted_then_translated() {
        let (service, converter) = build_service(Some(sample_docx()));
        let document = service
            .translate_document("scan.pdf", b"%PDF-1.7", Language::Japanese, Language::English)
            .await
            .unwrap();

        assert_eq!(document.filename, "translated_scan.docx");
        assert_eq!(document.media_type, DOCX_MEDIA_TYPE);
        let body = String::from_utf8(read_part(&document.bytes, "word/document.xml")).unwrap();
        assert!(body.contains("[English] Hello world"));
        assert_eq!(converter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pdf_failures_are_wrapped() {
        let (service, _) = build_service(None);
        let err = service
            .translate_document("scan.pdf", b"%PDF-1.7", Language::Japanese, Language::English)
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Pdf(_)));
        assert!(err.to_string().starts_with("PDF translation failed: "));

        // A converter that returns something other than a DOCX
        let (service, _) = build_service(Some(b"not a docx".to_vec()));
        let err = service
            .translate_document("scan.pdf", b"%PDF-1.7", Language::Japanese, Language::English)
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Pdf(_)));
    }
}
