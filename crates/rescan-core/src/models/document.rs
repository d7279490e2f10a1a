//! Document kinds and decoded text.

use serde::{Deserialize, Serialize};

/// Supported resume document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Detect the document kind from a file name (case-insensitive extension).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if lower.ends_with(".docx") {
            Some(Self::Docx)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

/// Plain text decoded from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedText {
    /// Decoded content, hyperlink targets appended as extra lines.
    pub text: String,
    /// Whether the text was produced by OCR.
    pub ocr_used: bool,
}

impl DecodedText {
    pub fn new(text: impl Into<String>, ocr_used: bool) -> Self {
        Self {
            text: text.into(),
            ocr_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_filename() {
        assert_eq!(DocumentKind::from_filename("cv.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_filename("CV.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_filename("Jane Doe.Docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_filename("cv.doc"), None);
        assert_eq!(DocumentKind::from_filename("cv.pdf.txt"), None);
        assert_eq!(DocumentKind::from_filename(""), None);
    }
}
