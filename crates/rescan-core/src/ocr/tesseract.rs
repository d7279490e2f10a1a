//! OCR through the `tesseract` command-line engine.

use std::io::{ErrorKind, Read};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use image::{DynamicImage, ImageFormat};
use tracing::{debug, warn};

use super::{OcrEngine, OcrResult};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs `tesseract <image> stdout -l <language>` on a temporary PNG.
pub struct TesseractOcr {
    binary: String,
    language: String,
    timeout: Duration,
}

impl TesseractOcr {
    pub fn new(binary: impl Into<String>, language: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
            timeout,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(
            config.tesseract_path.clone(),
            config.language.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn spawn(&self, image_path: &std::path::Path) -> Result<Child, OcrError> {
        Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    OcrError::Unavailable(format!("{} not found", self.binary))
                }
                _ => OcrError::Engine(e.to_string()),
            })
    }

    /// Wait for the child, killing it once the timeout elapses.
    fn wait_with_deadline(&self, child: &mut Child) -> Result<std::process::ExitStatus, OcrError> {
        let deadline = Instant::now() + self.timeout;

        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if Instant::now() >= deadline => {
                    warn!("tesseract exceeded {}s, killing it", self.timeout.as_secs());
                    child.kill().ok();
                    child.wait().ok();
                    return Err(OcrError::Timeout(self.timeout.as_secs()));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(OcrError::Engine(e.to_string())),
            }
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::from_config(&OcrConfig::default())
    }
}

impl OcrEngine for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let start = Instant::now();

        let file = tempfile::Builder::new()
            .prefix("rescan-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Image(e.to_string()))?;
        image
            .save_with_format(file.path(), ImageFormat::Png)
            .map_err(|e| OcrError::Image(e.to_string()))?;

        let mut child = self.spawn(file.path())?;

        // Drain both pipes while waiting so a chatty child cannot block on a full pipe.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait_with_deadline(&mut child)?;
        let text = collect(stdout)?;
        let errors = collect(stderr)?;

        if !status.success() {
            return Err(OcrError::Engine(format!(
                "tesseract exited with {}: {}",
                status,
                errors.trim()
            )));
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            "tesseract recognized {} chars from {}x{} image in {}ms",
            text.len(),
            image.width(),
            image.height(),
            processing_time_ms
        );

        Ok(OcrResult {
            text,
            processing_time_ms,
            image_size: (image.width(), image.height()),
        })
    }
}

type Reader = Option<JoinHandle<std::io::Result<String>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Reader {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut bytes = Vec::new();
            pipe.read_to_end(&mut bytes)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        })
    })
}

fn collect(reader: Reader) -> Result<String, OcrError> {
    match reader {
        Some(handle) => handle
            .join()
            .map_err(|_| OcrError::Engine("output reader panicked".to_string()))?
            .map_err(|e| OcrError::Engine(e.to_string())),
        None => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_unavailable() {
        let ocr = TesseractOcr::new(
            "rescan-no-such-tesseract-binary",
            "eng",
            Duration::from_secs(5),
        );
        let image = DynamicImage::new_rgb8(4, 4);

        match ocr.recognize(&image) {
            Err(OcrError::Unavailable(message)) => assert!(message.contains("not found")),
            other => panic!("expected Unavailable, got {:?}", other.map(|r| r.text)),
        }
    }

    #[test]
    fn test_from_config() {
        let config = OcrConfig {
            language: "deu".to_string(),
            timeout_secs: 7,
            ..OcrConfig::default()
        };
        let ocr = TesseractOcr::from_config(&config);

        assert_eq!(ocr.binary, "tesseract");
        assert_eq!(ocr.language, "deu");
        assert_eq!(ocr.timeout, Duration::from_secs(7));
    }
}
