//! Phone number extraction and E.164 normalization.

use phonenumber::Mode;
use tracing::trace;

use super::patterns::DIGIT_RUN;
use super::{ExtractionMatch, FieldExtractor, NormalizedText};
use crate::models::config::PhoneConfig;

/// Phone field extractor.
///
/// First tries the whole text as an explicitly international number, then
/// scans separator-stripped digit runs, inferring a country code for bare
/// national numbers from [`PhoneConfig`].
pub struct PhoneExtractor {
    config: PhoneConfig,
}

impl PhoneExtractor {
    /// Create a phone extractor with the default (Indian) numbering assumptions.
    pub fn new() -> Self {
        Self::with_config(PhoneConfig::default())
    }

    pub fn with_config(config: PhoneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhoneConfig {
        &self.config
    }

    /// Turn a digit run into a dialable candidate.
    fn candidate(&self, digits: &str) -> String {
        if digits.len() == self.config.national_number_length {
            format!("+{}{}", self.config.default_country_code, digits)
        } else if digits.len() >= self.config.national_number_length {
            format!("+{}", digits)
        } else {
            digits.to_string()
        }
    }
}

impl Default for PhoneExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PhoneExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &NormalizedText) -> Option<Self::Output> {
        if let Some(e164) = parse_e164(text.raw()) {
            return Some(ExtractionMatch::new(e164, "direct", text.raw().trim()));
        }

        let compact = text.compact();
        for (start, end) in digit_runs(compact, self.config.min_digits, self.config.max_digits) {
            let digits = &compact[start..end];
            let candidate = self.candidate(digits);

            match parse_e164(&candidate) {
                Some(e164) => {
                    return Some(
                        ExtractionMatch::new(e164, "digit_run", digits).with_position(start, end),
                    );
                }
                None => trace!("Rejected phone candidate of {} digits", digits.len()),
            }
        }

        None
    }
}

/// Extract a phone number from text and format it as E.164.
pub fn normalize_phone(text: &str) -> Option<String> {
    PhoneExtractor::new()
        .extract(&NormalizedText::new(text))
        .map(|m| m.value)
}

/// Parse without a region hint; only valid numbers are formatted.
fn parse_e164(candidate: &str) -> Option<String> {
    let number = phonenumber::parse(None, candidate).ok()?;
    if !phonenumber::is_valid(&number) {
        return None;
    }
    Some(number.format().mode(Mode::E164).to_string())
}

/// Byte spans of phone-length digit chunks, in order of appearance.
///
/// A maximal digit run is consumed left to right in chunks of up to `max`
/// digits; a trailing chunk shorter than `min` is dropped.
fn digit_runs(text: &str, min: usize, max: usize) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();

    for run in DIGIT_RUN.find_iter(text) {
        let mut start = run.start();
        while run.end() - start >= min {
            let end = (start + max).min(run.end());
            spans.push((start, end));
            start = end;
        }
    }

    spans
}
