//! WASM bindings for resume contact extraction.
//!
//! Documents are decoded by the host (browser or Node.js); these bindings
//! run the extraction engine over the decoded text.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use rescan_core::{ExtractionConfig, ParsedCandidate, ResumeParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse decoded resume text.
///
/// Returns a candidate object; unsupported file names yield empty fields
/// and an entry in `errors`.
///
/// Extractor panics are only turned into `errors` on native targets. On
/// `wasm32-unknown-unknown` a panic aborts the module and surfaces as a
/// JavaScript exception.
#[wasm_bindgen]
pub fn parse_text(filename: &str, text: &str, ocr_used: bool) -> Result<JsValue, JsValue> {
    ResumeExtractor::default().parse(filename, text, ocr_used)
}

/// Extract an email address, lower-cased.
#[wasm_bindgen]
pub fn extract_email(text: &str) -> Option<String> {
    rescan_core::extract_email(text)
}

/// Extract a phone number in E.164 format.
#[wasm_bindgen]
pub fn normalize_phone(text: &str) -> Option<String> {
    rescan_core::normalize_phone(text)
}

/// Extract a LinkedIn profile URL.
#[wasm_bindgen]
pub fn extract_linkedin(text: &str) -> Option<String> {
    rescan_core::extract_linkedin(text)
}

/// Extract a GitHub profile URL.
#[wasm_bindgen]
pub fn extract_github(text: &str) -> Option<String> {
    rescan_core::extract_github(text)
}

/// Guess the candidate's name.
#[wasm_bindgen]
pub fn guess_name(text: &str) -> Option<String> {
    rescan_core::guess_name(text)
}

/// Confidence score for the given fields, default weights.
#[wasm_bindgen]
pub fn score_confidence(
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    linkedin: Option<String>,
    github: Option<String>,
    ocr_used: bool,
) -> f64 {
    rescan_core::score_confidence(
        name.as_deref(),
        email.as_deref(),
        phone.as_deref(),
        linkedin.as_deref(),
        github.as_deref(),
        ocr_used,
    )
}

/// Resume extractor class for browser use.
#[wasm_bindgen]
pub struct ResumeExtractor {
    parser: ResumeParser,
}

#[wasm_bindgen]
impl ResumeExtractor {
    /// Create an extractor, optionally from a JSON extraction config
    /// (e.g. `{"phone": {"default_country_code": "44"}}`).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ResumeExtractor, JsValue> {
        let config = match config_json {
            Some(json) => {
                let config: ExtractionConfig = serde_json::from_str(&json)
                    .map_err(|e| JsValue::from_str(&format!("invalid config: {}", e)))?;
                config
                    .validate()
                    .map_err(|e| JsValue::from_str(&e.to_string()))?;
                config
            }
            None => ExtractionConfig::default(),
        };

        Ok(Self {
            parser: ResumeParser::from_config(&config),
        })
    }

    /// Extract fields and confidence from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str, ocr_used: bool) -> Result<JsValue, JsValue> {
        to_js(&self.parser.extract(text, ocr_used))
    }

    /// Parse text for a named file, with the unsupported-type check.
    ///
    /// Panics abort the module here; see [`parse_text`].
    #[wasm_bindgen]
    pub fn parse(&self, filename: &str, text: &str, ocr_used: bool) -> Result<JsValue, JsValue> {
        let outcome = self.parser.parse_text(filename, text, ocr_used);
        let candidate =
            ParsedCandidate::new(filename, outcome.result, outcome.ocr_used, outcome.errors);
        to_js(&candidate)
    }

    /// Score weights in use.
    #[wasm_bindgen]
    pub fn weights(&self) -> Result<JsValue, JsValue> {
        to_js(self.parser.weights())
    }
}

impl Default for ResumeExtractor {
    fn default() -> Self {
        Self {
            parser: ResumeParser::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_extractor_functions() {
        assert_eq!(
            extract_email("mailto:Jane@Example.com"),
            Some("jane@example.com".to_string())
        );
        assert_eq!(normalize_phone("98765 43210"), Some("+919876543210".to_string()));
        assert_eq!(
            extract_github("github.com/octocat"),
            Some("https://github.com/octocat".to_string())
        );
    }

    #[wasm_bindgen_test]
    fn test_score_confidence() {
        assert_eq!(score_confidence(None, None, None, None, None, false), 0.05);
        assert_eq!(
            score_confidence(None, Some("a@b.co".to_string()), None, None, None, false),
            0.45
        );
    }

    #[wasm_bindgen_test]
    fn test_extractor_rejects_bad_config() {
        assert!(ResumeExtractor::new(Some("{\"phone\": {\"min_digits\": 0}}".to_string())).is_err());
        assert!(ResumeExtractor::new(Some("not json".to_string())).is_err());
        assert!(ResumeExtractor::new(None).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_parse_text_unsupported_type_is_not_an_exception() {
        let candidate = parse_text("notes.txt", "Jane Doe", true).unwrap();
        let candidate: ParsedCandidate = serde_wasm_bindgen::from_value(candidate).unwrap();

        assert_eq!(candidate.errors, vec!["Unsupported file type: notes.txt".to_string()]);
        assert!(!candidate.ocr_used);
    }
}
