//! Resume-level extraction pipeline over decoded text.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info};

use super::rules::{
    EmailExtractor, FieldExtractor, NameGuesser, NormalizedText, PhoneExtractor, ProfileExtractor,
};
use super::scoring::FieldPresence;
use crate::error::ExtractionError;
use crate::models::candidate::ExtractionResult;
use crate::models::config::{ExtractionConfig, ScoreWeights};
use crate::models::document::DocumentKind;

/// Result of parsing one document's text, with any per-document errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub result: ExtractionResult,
    pub errors: Vec<String>,
    pub ocr_used: bool,
}

impl ParseOutcome {
    /// Failed outcomes never report OCR use.
    fn failed(error: ExtractionError) -> Self {
        Self {
            result: ExtractionResult::empty(),
            errors: vec![error.to_string()],
            ocr_used: false,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Runs every field extractor over a document's text and scores the result.
///
/// Holds no mutable state; one parser can be shared across threads.
pub struct ResumeParser {
    email: EmailExtractor,
    phone: PhoneExtractor,
    linkedin: ProfileExtractor,
    github: ProfileExtractor,
    names: NameGuesser,
    weights: ScoreWeights,
}

impl ResumeParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            email: EmailExtractor::new(),
            phone: PhoneExtractor::with_config(config.phone.clone()),
            linkedin: ProfileExtractor::linkedin(),
            github: ProfileExtractor::github(),
            names: NameGuesser::new(),
            weights: config.weights,
        }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Extract every field from `text` and compute the confidence.
    pub fn extract(&self, text: &str, ocr_used: bool) -> ExtractionResult {
        let text = NormalizedText::new(text);

        let email = self.email.extract(&text);
        let phone = self.phone.extract(&text);
        let linkedin = self.linkedin.extract(&text);
        let github = self.github.extract(&text);
        let name = self.names.extract(&text);

        for (field, found) in [
            ("email", email.as_ref()),
            ("phone", phone.as_ref()),
            ("linkedin", linkedin.as_ref()),
            ("github", github.as_ref()),
            ("name", name.as_ref()),
        ] {
            match found {
                Some(m) => debug!("{} matched by rule {}", field, m.rule),
                None => debug!("{} not found", field),
            }
        }

        let mut result = ExtractionResult {
            name: name.map(|m| m.value),
            email: email.map(|m| m.value),
            phone: phone.map(|m| m.value),
            linkedin: linkedin.map(|m| m.value),
            github: github.map(|m| m.value),
            confidence: 0.0,
        };
        result.confidence = self.weights.score(FieldPresence::of(&result, ocr_used));
        result
    }

    /// Parse decoded text for `filename`.
    ///
    /// Never fails: unsupported file types and extractor panics come back as
    /// an empty result carrying one error string.
    pub fn parse_text(&self, filename: &str, text: &str, ocr_used: bool) -> ParseOutcome {
        if DocumentKind::from_filename(filename).is_none() {
            return ParseOutcome::failed(ExtractionError::UnsupportedFileType(filename.to_string()));
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.extract(text, ocr_used))) {
            Ok(result) => ParseOutcome {
                result,
                errors: Vec::new(),
                ocr_used,
            },
            Err(payload) => {
                ParseOutcome::failed(ExtractionError::Internal(panic_message(payload.as_ref())))
            }
        }
    }
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Log the outcome of one document without any extracted field values.
pub fn log_parse_result(file_name: &str, ocr_used: bool, timing_ms: u64, has_errors: bool) {
    info!(
        file_name,
        ocr_used,
        timing_ms,
        has_errors,
        "Parsed resume"
    );
}

/// Best-effort text of a captured panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
