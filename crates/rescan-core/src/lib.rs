//! Core library for resume contact extraction.
//!
//! This crate provides:
//! - Text normalization for decoded (possibly OCR-derived) resume text
//! - Rule-based field extraction (email, phone, LinkedIn, GitHub, name)
//! - Presence-based confidence scoring
//! - PDF and DOCX decoding with OCR fallback (feature `documents`)

pub mod error;
pub mod models;
pub mod extract;
#[cfg(feature = "documents")]
pub mod document;
#[cfg(feature = "documents")]
pub mod ocr;

pub use error::{RescanError, Result};
pub use models::candidate::{ExtractionResult, ParsedCandidate};
pub use models::config::{ExtractionConfig, PhoneConfig, RescanConfig, ScoreWeights};
pub use models::document::{DecodedText, DocumentKind};
pub use extract::{ParseOutcome, ResumeParser, log_parse_result};
pub use extract::rules::{
    extract_email, extract_github, extract_linkedin, guess_name, normalize_phone,
};
pub use extract::scoring::score_confidence;

#[cfg(feature = "documents")]
pub use document::{DocumentDecoder, DocxDecoder, PdfDecoder, ResumeDocumentParser};
#[cfg(feature = "documents")]
pub use ocr::{OcrEngine, OcrResult, TesseractOcr, create_engine};
