//! Rule-based field extractors for resume text.

pub mod normalize;
pub mod email;
pub mod phone;
pub mod profile;
pub mod name;
pub mod patterns;

pub use normalize::NormalizedText;
pub use email::{extract_email, EmailExtractor};
pub use phone::{normalize_phone, PhoneExtractor};
pub use profile::{extract_github, extract_linkedin, github_username, Network, ProfileExtractor};
pub use name::{guess_name, NameGuesser};

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the best candidate for the field.
    fn extract(&self, text: &NormalizedText) -> Option<Self::Output>;
}

/// A located field value and the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule that fired.
    pub rule: &'static str,
    /// Byte span in the text the rule ran over.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    /// Replace the value, keeping rule and location.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractionMatch<U> {
        ExtractionMatch {
            value: f(self.value),
            rule: self.rule,
            position: self.position,
            source: self.source,
        }
    }
}

/// One entry of a priority-ordered rule table.
pub struct MatchRule {
    /// Stable rule name, reported with every match.
    pub name: &'static str,
    pattern: &'static Regex,
    group: usize,
    guard: Option<&'static Regex>,
}

impl MatchRule {
    /// Rule yielding capture `group` of the leftmost match of `pattern`.
    pub fn new(name: &'static str, pattern: &'static Regex, group: usize) -> Self {
        Self {
            name,
            pattern,
            group,
            guard: None,
        }
    }

    /// Only fire when `guard` matches somewhere in the text.
    pub fn guarded(mut self, guard: &'static Regex) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Apply the rule, returning the captured value with its span.
    pub fn apply<'t>(&self, text: &'t str) -> Option<ExtractionMatch<&'t str>> {
        if let Some(guard) = self.guard {
            if !guard.is_match(text) {
                return None;
            }
        }

        let caps = self.pattern.captures(text)?;
        let value = caps.get(self.group)?;
        let full_match = caps.get(0)?;

        Some(
            ExtractionMatch::new(value.as_str(), self.name, full_match.as_str())
                .with_position(value.start(), value.end()),
        )
    }
}

/// Run a rule table in order; the first rule that matches wins.
///
/// `refine` may reject a raw capture, in which case the cascade moves on to
/// the next rule.
pub fn first_match<'t, T>(
    rules: &[MatchRule],
    text: &'t str,
    mut refine: impl FnMut(&'t str) -> Option<T>,
) -> Option<ExtractionMatch<T>> {
    rules.iter().find_map(|rule| {
        let hit = rule.apply(text)?;
        let value = refine(hit.value)?;
        Some(hit.map(|_| value))
    })
}
