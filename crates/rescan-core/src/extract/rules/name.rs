//! Candidate name heuristic.

use super::patterns::PHONE_LIKE_LINE;
use super::{ExtractionMatch, FieldExtractor, NormalizedText};

const LEADING_LINES: usize = 30;
const CONTACT_SCAN_LINES: usize = 50;
const MAX_NAME_CHARS: usize = 50;
const CONTACT_KEYWORDS: [&str; 5] = ["email", "phone", "contact", "mobile", "tel"];

/// Guesses the candidate's name from the top of the document and from the
/// lines directly above contact details.
pub struct NameGuesser;

impl NameGuesser {
    pub fn new() -> Self {
        Self
    }

    /// Candidate lines in priority order, tagged with the rule that produced them.
    fn candidates<'t>(&self, text: &'t NormalizedText) -> Vec<(&'static str, usize, &'t str)> {
        let lines: Vec<&str> = text.lines().collect();

        let mut pool: Vec<(&'static str, usize, &str)> = lines
            .iter()
            .take(LEADING_LINES)
            .enumerate()
            .map(|(i, line)| ("leading_lines", i, *line))
            .collect();

        for (i, lowered) in text.lowered_lines().take(CONTACT_SCAN_LINES).enumerate() {
            if i > 0 && CONTACT_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
                pool.push(("contact_adjacent", i - 1, lines[i - 1]));
            }
        }

        pool
    }
}

impl Default for NameGuesser {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NameGuesser {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &NormalizedText) -> Option<Self::Output> {
        self.candidates(text)
            .into_iter()
            .find_map(|(rule, line_index, line)| {
                let trimmed = line.trim();
                looks_like_name(trimmed).then(|| {
                    ExtractionMatch::new(trimmed.to_string(), rule, line)
                        .with_position(line_index, line_index + 1)
                })
            })
    }
}

/// Guess the candidate's name, if any line looks like one.
pub fn guess_name(text: &str) -> Option<String> {
    NameGuesser::new()
        .extract(&NormalizedText::new(text))
        .map(|m| m.value)
}

/// Two to four words, each starting with an uppercase letter.
fn looks_like_name(line: &str) -> bool {
    if line.is_empty()
        || line.contains('@')
        || PHONE_LIKE_LINE.is_match(line)
        || line.chars().count() > MAX_NAME_CHARS
    {
        return false;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words
            .iter()
            .all(|word| word.chars().next().is_some_and(char::is_uppercase))
}
