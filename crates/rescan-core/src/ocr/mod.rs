//! OCR fallback for scanned resumes.

mod tesseract;

pub use tesseract::TesseractOcr;

use std::sync::Arc;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Recognized text.
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

/// A text recognizer for page images.
pub trait OcrEngine: Send + Sync {
    /// Engine name, for logs.
    fn name(&self) -> &str;

    /// Recognize the text in one image.
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError>;
}

/// Build the configured OCR engine, or `None` when OCR is disabled.
pub fn create_engine(config: &OcrConfig) -> Option<Arc<dyn OcrEngine>> {
    if !config.enabled {
        debug!("OCR fallback disabled");
        return None;
    }

    Some(Arc::new(TesseractOcr::from_config(config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_engine_respects_enabled() {
        let disabled = OcrConfig {
            enabled: false,
            ..OcrConfig::default()
        };
        assert!(create_engine(&disabled).is_none());

        let engine = create_engine(&OcrConfig::default()).unwrap();
        assert_eq!(engine.name(), "tesseract");
    }
}
