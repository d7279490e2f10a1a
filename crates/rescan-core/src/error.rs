//! Error types for the rescan-core library.

use thiserror::Error;

/// Main error type for the rescan library.
#[derive(Error, Debug)]
pub enum RescanError {
    /// Document decoding error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning PDF/DOCX bytes into text.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    /// Failed to extract the text layer from a PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// DOCX container or XML could not be read.
    #[error("failed to read DOCX: {0}")]
    Docx(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR engine is disabled or not installed.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// The OCR engine ran but failed.
    #[error("OCR engine failed: {0}")]
    Engine(String),

    /// The OCR engine did not finish in time.
    #[error("OCR timed out after {0}s")]
    Timeout(u64),

    /// The document has no page images to recognize.
    #[error("no page images found for OCR")]
    NoImages,

    /// Image could not be prepared for the engine.
    #[error("invalid image: {0}")]
    Image(String),
}

/// Errors related to field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file name does not indicate a supported document type.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// An extractor failed internally.
    #[error("Parse error: {0}")]
    Internal(String),
}

/// Result type for the rescan library.
pub type Result<T> = std::result::Result<T, RescanError>;
