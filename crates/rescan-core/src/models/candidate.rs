//! Extraction results and the per-document candidate record.

use serde::{Deserialize, Serialize};

/// Structured contact fields extracted from one resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub name: Option<String>,
    pub email: Option<String>,
    /// E.164 phone number, e.g. `+919876543210`.
    pub phone: Option<String>,
    /// Canonical `https://www.linkedin.com/...` URL.
    pub linkedin: Option<String>,
    /// Canonical `https://github.com/...` URL.
    pub github: Option<String>,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f64,
}

impl ExtractionResult {
    /// Result with no fields and zero confidence.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of contact fields that were found.
    pub fn found_count(&self) -> usize {
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.linkedin,
            &self.github,
        ]
        .iter()
        .filter(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
        .count()
    }
}

/// Parsed candidate information for one source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedCandidate {
    /// File name the candidate was parsed from.
    pub source_file: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub confidence: f64,
    /// Whether the text came from OCR rather than the document's text layer.
    #[serde(default)]
    pub ocr_used: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ParsedCandidate {
    /// Build a candidate from an extraction result.
    pub fn new(
        source_file: impl Into<String>,
        result: ExtractionResult,
        ocr_used: bool,
        errors: Vec<String>,
    ) -> Self {
        Self {
            source_file: Some(source_file.into()),
            name: result.name,
            email: result.email,
            phone: result.phone,
            linkedin: result.linkedin,
            github: result.github,
            confidence: result.confidence,
            ocr_used,
            errors,
        }
    }

    /// Candidate carrying only an error, with every field empty.
    pub fn failed(source_file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source_file: Some(source_file.into()),
            errors: vec![error.into()],
            ..Self::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Header of the tabular summary layout.
    pub fn summary_header() -> [&'static str; 9] {
        [
            "Name",
            "Source File",
            "Phone Number",
            "Email ID",
            "LinkedIn",
            "GitHub",
            "Confidence",
            "OCR",
            "Errors",
        ]
    }

    /// One row of the tabular summary layout.
    pub fn summary_row(&self) -> [String; 9] {
        [
            self.name.clone().unwrap_or_default(),
            self.source_file.clone().unwrap_or_default(),
            self.phone.clone().unwrap_or_default(),
            self.email.clone().unwrap_or_default(),
            self.linkedin.clone().unwrap_or_default(),
            self.github.clone().unwrap_or_default(),
            format!("{:.2}", self.confidence),
            self.ocr_used.to_string(),
            self.errors.join("; "),
        ]
    }
}
