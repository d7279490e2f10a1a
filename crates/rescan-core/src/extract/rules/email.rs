//! Email address extraction.

use super::patterns::EMAIL_RULES;
use super::{first_match, ExtractionMatch, FieldExtractor, NormalizedText};

/// Email field extractor.
///
/// Priority: `mailto:` links (href attributes first), then an address
/// following an "email"/"e-mail"/"mail" label, then any address.
pub struct EmailExtractor;

impl EmailExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for EmailExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &NormalizedText) -> Option<Self::Output> {
        first_match(&EMAIL_RULES, text.raw(), |address| Some(address.to_lowercase()))
    }
}

/// Extract an email address from text, lower-cased.
pub fn extract_email(text: &str) -> Option<String> {
    EmailExtractor::new()
        .extract(&NormalizedText::new(text))
        .map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_for(text: &str) -> Option<&'static str> {
        EmailExtractor::new()
            .extract(&NormalizedText::new(text))
            .map(|m| m.rule)
    }

    #[test]
    fn test_extract_email_plain() {
        let text = "Contact me at john.doe@example.com for more info";
        assert_eq!(extract_email(text), Some("john.doe@example.com".to_string()));
        assert_eq!(rule_for(text), Some("address"));
    }

    #[test]
    fn test_extract_email_labeled() {
        let text = "Email: jane.smith@company.co.uk";
        assert_eq!(extract_email(text), Some("jane.smith@company.co.uk".to_string()));
        assert_eq!(rule_for(text), Some("labeled"));
    }

    #[test]
    fn test_extract_email_none() {
        assert_eq!(extract_email("No email here"), None);
        assert_eq!(extract_email(""), None);
    }

    #[test]
    fn test_mailto_beats_earlier_address() {
        let text = "first@example.org\nReach me: mailto:Second@Example.com";
        assert_eq!(extract_email(text), Some("second@example.com".to_string()));
        assert_eq!(rule_for(text), Some("mailto"));
    }

    #[test]
    fn test_href_mailto_beats_plain_mailto() {
        let text = r#"mailto:plain@example.com <a href="mailto:Linked@Example.com">mail</a>"#;
        assert_eq!(extract_email(text), Some("linked@example.com".to_string()));
        assert_eq!(rule_for(text), Some("mailto_href"));
    }

    #[test]
    fn test_labeled_address_with_href_prefix() {
        let text = r#"E-mail: <a href='jane@example.io'>"#;
        assert_eq!(extract_email(text), Some("jane@example.io".to_string()));
    }

    #[test]
    fn test_label_may_span_line_break() {
        let text = "other@example.com is my old one\nEmail:\n  current@example.com";
        assert_eq!(extract_email(text), Some("current@example.com".to_string()));
    }

    #[test]
    fn test_result_is_lowercased() {
        assert_eq!(
            extract_email("JOHN.DOE@EXAMPLE.COM"),
            Some("john.doe@example.com".to_string())
        );
    }
}
