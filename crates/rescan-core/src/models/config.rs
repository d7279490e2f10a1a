//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RescanError, Result};

/// Main configuration for rescan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RescanConfig {
    /// Field extraction and scoring configuration.
    pub extraction: ExtractionConfig,

    /// Document decoding configuration.
    pub document: DocumentConfig,

    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Bulk processing configuration.
    pub batch: BatchConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Phone number inference.
    pub phone: PhoneConfig,

    /// Confidence score weights.
    pub weights: ScoreWeights,
}

/// Phone number inference settings.
///
/// The defaults target the Indian numbering plan: a bare run of exactly
/// `national_number_length` digits is assumed to be a national number and
/// receives `default_country_code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneConfig {
    /// Country calling code prepended to bare national numbers (no `+`).
    pub default_country_code: String,

    /// Length of a national number that receives the default country code.
    pub national_number_length: usize,

    /// Shortest digit run considered a phone candidate.
    pub min_digits: usize,

    /// Longest digit run considered a phone candidate.
    pub max_digits: usize,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            default_country_code: "91".to_string(),
            national_number_length: 10,
            min_digits: 7,
            max_digits: 15,
        }
    }
}

/// Weights of the additive confidence model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub email: f64,
    pub phone: f64,
    pub name: f64,
    pub linkedin: f64,
    pub github: f64,
    /// Added when the text came from the document's own text layer.
    pub non_ocr_bonus: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            email: 0.40,
            phone: 0.25,
            name: 0.15,
            linkedin: 0.10,
            github: 0.05,
            non_ocr_bonus: 0.05,
        }
    }
}

impl ScoreWeights {
    /// Sum of every weight, i.e. the score of a full non-OCR match before clamping.
    pub fn total(&self) -> f64 {
        self.email + self.phone + self.name + self.linkedin + self.github + self.non_ocr_bonus
    }

    fn all(&self) -> [(&'static str, f64); 6] {
        [
            ("email", self.email),
            ("phone", self.phone),
            ("name", self.name),
            ("linkedin", self.linkedin),
            ("github", self.github),
            ("non_ocr_bonus", self.non_ocr_bonus),
        ]
    }
}

/// Document decoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Stripped text shorter than this triggers the OCR fallback.
    pub min_text_length: usize,

    /// Append hyperlink targets found in the document as extra lines.
    pub append_hyperlinks: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            append_hyperlinks: true,
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Enable the OCR fallback.
    pub enabled: bool,

    /// Path or name of the tesseract executable.
    pub tesseract_path: String,

    /// Tesseract language pack.
    pub language: String,

    /// Per-image timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tesseract_path: "tesseract".to_string(),
            language: "eng".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Bulk processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum documents processed in parallel.
    pub max_concurrency: usize,

    /// Rows written to the summary per flush.
    pub write_batch_size: usize,

    /// Attempts for a remote download before giving up.
    pub max_retries: u32,

    /// Base delay of the exponential backoff, in milliseconds.
    pub retry_delay_ms: u64,

    /// Timeout for a single remote download, in seconds.
    pub download_timeout_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 10,
            write_batch_size: 100,
            max_retries: 3,
            retry_delay_ms: 1000,
            download_timeout_secs: 60,
        }
    }
}

impl RescanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| RescanError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| RescanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check invariants the extractors and scorer rely on.
    pub fn validate(&self) -> Result<()> {
        self.extraction.validate()?;
        if self.batch.max_concurrency == 0 {
            return Err(RescanError::Config(
                "batch.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.batch.write_batch_size == 0 {
            return Err(RescanError::Config(
                "batch.write_batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl ExtractionConfig {
    /// Check weights and phone bounds.
    pub fn validate(&self) -> Result<()> {
        for (field, weight) in self.weights.all() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RescanError::Config(format!(
                    "weight for {} must be a non-negative number, got {}",
                    field, weight
                )));
            }
        }

        let phone = &self.phone;
        if phone.min_digits == 0 || phone.min_digits > phone.max_digits {
            return Err(RescanError::Config(format!(
                "phone digit bounds are invalid: min {} max {}",
                phone.min_digits, phone.max_digits
            )));
        }
        if !phone.default_country_code.chars().all(|c| c.is_ascii_digit())
            || phone.default_country_code.is_empty()
        {
            return Err(RescanError::Config(format!(
                "phone.default_country_code must be digits only, got {:?}",
                phone.default_country_code
            )));
        }
        Ok(())
    }
}
