//! Document decoding and the byte-level resume pipeline.

mod docx;
mod pdf;

pub use docx::DocxDecoder;
pub use pdf::{PdfDecoder, collect_link_uris, needs_ocr};

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::extract::{ResumeParser, log_parse_result, panic_message};
use crate::models::candidate::ParsedCandidate;
use crate::models::config::RescanConfig;
use crate::models::document::{DecodedText, DocumentKind};
use crate::ocr::{OcrEngine, create_engine};

/// Trait for document decoders.
pub trait DocumentDecoder: Send + Sync {
    /// The document format this decoder reads.
    fn kind(&self) -> DocumentKind;

    /// Decode raw document bytes into text.
    fn decode(&self, data: &[u8]) -> Result<DecodedText>;
}

/// Decodes resume files and extracts candidate fields from them.
pub struct ResumeDocumentParser {
    parser: ResumeParser,
    pdf: PdfDecoder,
    docx: DocxDecoder,
}

impl ResumeDocumentParser {
    /// Create a document parser with default settings and OCR enabled.
    pub fn new() -> Self {
        Self::from_config(&RescanConfig::default())
    }

    pub fn from_config(config: &RescanConfig) -> Self {
        Self::with_ocr_engine(config, create_engine(&config.ocr))
    }

    /// Build with an explicit OCR engine, or none to disable the fallback.
    pub fn with_ocr_engine(config: &RescanConfig, ocr: Option<Arc<dyn OcrEngine>>) -> Self {
        Self {
            parser: ResumeParser::from_config(&config.extraction),
            pdf: PdfDecoder::new(config.document.clone(), ocr),
            docx: DocxDecoder::new(config.document.clone()),
        }
    }

    pub fn parser(&self) -> &ResumeParser {
        &self.parser
    }

    fn decoder(&self, kind: DocumentKind) -> &dyn DocumentDecoder {
        match kind {
            DocumentKind::Pdf => &self.pdf,
            DocumentKind::Docx => &self.docx,
        }
    }

    /// Parse one resume file's bytes.
    ///
    /// Never fails: unsupported types, corrupt documents and internal panics
    /// produce a candidate with empty fields, zero confidence and one error.
    pub fn parse_resume_bytes(&self, filename: &str, data: &[u8]) -> ParsedCandidate {
        let start = Instant::now();
        let candidate = self.parse_inner(filename, data);

        log_parse_result(
            filename,
            candidate.ocr_used,
            start.elapsed().as_millis() as u64,
            candidate.has_errors(),
        );
        candidate
    }

    /// Read and parse a resume from disk.
    pub fn parse_file(&self, path: &Path) -> ParsedCandidate {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match std::fs::read(path) {
            Ok(data) => self.parse_resume_bytes(&filename, &data),
            Err(e) => ParsedCandidate::failed(
                filename,
                ExtractionError::Internal(e.to_string()).to_string(),
            ),
        }
    }

    fn parse_inner(&self, filename: &str, data: &[u8]) -> ParsedCandidate {
        let Some(kind) = DocumentKind::from_filename(filename) else {
            return ParsedCandidate::failed(
                filename,
                ExtractionError::UnsupportedFileType(filename.to_string()).to_string(),
            );
        };

        let decoder = self.decoder(kind);
        debug!("Decoding {} as {}", filename, decoder.kind().extension());

        let decoded = panic::catch_unwind(AssertUnwindSafe(|| decoder.decode(data)));
        let failure = match decoded {
            Ok(Ok(decoded)) => {
                let outcome = self.parser.parse_text(filename, &decoded.text, decoded.ocr_used);
                return ParsedCandidate::new(
                    filename,
                    outcome.result,
                    outcome.ocr_used,
                    outcome.errors,
                );
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        ParsedCandidate::failed(filename, ExtractionError::Internal(failure).to_string())
    }
}

impl Default for ResumeDocumentParser {
    fn default() -> Self {
        Self::new()
    }
}
