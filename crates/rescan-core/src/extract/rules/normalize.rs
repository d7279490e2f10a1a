//! Text normalization shared by every extractor.

/// Decoded resume text plus the derived variants the matchers run over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    raw: String,
    lowered: String,
    compact: String,
}

impl NormalizedText {
    /// Strip noise from `text` and build the derived variants.
    pub fn new(text: &str) -> Self {
        let raw = strip_noise(text);
        let lowered = raw.to_lowercase();
        let compact = raw.chars().filter(|c| !is_phone_separator(*c)).collect();

        Self {
            raw,
            lowered,
            compact,
        }
    }

    /// Noise-stripped text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Lower-cased text, line-aligned with [`raw`](Self::raw).
    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    /// Text without whitespace, hyphens, parentheses and periods.
    pub fn compact(&self) -> &str {
        &self.compact
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.raw.split('\n')
    }

    pub fn lowered_lines(&self) -> impl Iterator<Item = &str> {
        self.lowered.split('\n')
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

impl From<&str> for NormalizedText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

fn is_phone_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '(' | ')' | '.')
}

/// Normalize line endings and drop invisible characters left by PDF and OCR text layers.
fn strip_noise(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\u{000C}' => out.push('\n'),
            '\u{00A0}' => out.push(' '),
            '\0' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' | '\u{00AD}' => {}
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_noise() {
        let text = NormalizedText::new("Jane\r\nDoe\rX\u{000C}Y\u{00A0}Z\u{200B}\u{00AD}\0!");
        assert_eq!(text.raw(), "Jane\nDoe\nX\nY Z!");
    }

    #[test]
    fn test_compact_strips_phone_separators() {
        let text = NormalizedText::new("Call (987) 654-3210.\n+91 98765 43210");
        assert_eq!(text.compact(), "Call9876543210+919876543210");
    }

    #[test]
    fn test_lowered_lines_align_with_lines() {
        let text = NormalizedText::new("Jane DOE\nEMAIL: X@Y.COM\n");
        let lines: Vec<&str> = text.lines().collect();
        let lowered: Vec<&str> = text.lowered_lines().collect();

        assert_eq!(lines.len(), lowered.len());
        assert_eq!(lowered[1], "email: x@y.com");
    }

    #[test]
    fn test_empty_input() {
        let text = NormalizedText::new("");
        assert!(text.is_empty());
        assert_eq!(text.compact(), "");
        assert_eq!(text.lines().count(), 1);
    }
}
