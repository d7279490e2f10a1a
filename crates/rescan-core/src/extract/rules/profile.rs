//! LinkedIn and GitHub profile URL extraction.

use super::patterns::{GITHUB_RULES, LINKEDIN_RULES};
use super::{first_match, ExtractionMatch, FieldExtractor, MatchRule, NormalizedText};

/// Longest username GitHub accepts.
const GITHUB_USERNAME_MAX: usize = 39;

/// Supported profile networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    LinkedIn,
    GitHub,
}

impl Network {
    /// Canonical URL prefix every extracted profile is rebuilt on.
    pub fn base_url(&self) -> &'static str {
        match self {
            Network::LinkedIn => "https://www.linkedin.com/in/",
            Network::GitHub => "https://github.com/",
        }
    }

    fn rules(&self) -> &'static [MatchRule] {
        match self {
            Network::LinkedIn => &LINKEDIN_RULES,
            Network::GitHub => &GITHUB_RULES,
        }
    }

    /// Validate a captured profile id or username.
    fn refine<'a>(&self, captured: &'a str) -> Option<&'a str> {
        match self {
            Network::LinkedIn => Some(captured),
            Network::GitHub => github_username(captured),
        }
    }
}

/// Profile URL extractor for one [`Network`].
pub struct ProfileExtractor {
    network: Network,
}

impl ProfileExtractor {
    pub fn new(network: Network) -> Self {
        Self { network }
    }

    pub fn linkedin() -> Self {
        Self::new(Network::LinkedIn)
    }

    pub fn github() -> Self {
        Self::new(Network::GitHub)
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

impl FieldExtractor for ProfileExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &NormalizedText) -> Option<Self::Output> {
        let network = self.network;
        first_match(network.rules(), text.raw(), |captured| {
            network
                .refine(captured)
                .map(|id| format!("{}{}", network.base_url(), id))
        })
    }
}

/// Extract a LinkedIn profile URL as `https://www.linkedin.com/...`.
pub fn extract_linkedin(text: &str) -> Option<String> {
    ProfileExtractor::linkedin()
        .extract(&NormalizedText::new(text))
        .map(|m| m.value)
}

/// Extract a GitHub profile URL as `https://github.com/<user>`.
pub fn extract_github(text: &str) -> Option<String> {
    ProfileExtractor::github()
        .extract(&NormalizedText::new(text))
        .map(|m| m.value)
}

/// Longest valid GitHub username prefix of `candidate`.
///
/// Usernames start with an alphanumeric, contain alphanumerics and single
/// inner hyphens, never end with a hyphen and are at most 39 characters.
pub fn github_username(candidate: &str) -> Option<&str> {
    let bytes = candidate.as_bytes();
    if !bytes.first()?.is_ascii_alphanumeric() {
        return None;
    }

    let mut end = 1;
    while end < bytes.len() && end < GITHUB_USERNAME_MAX {
        let b = bytes[end];
        let next_is_alnum = bytes.get(end + 1).is_some_and(|n| n.is_ascii_alphanumeric());
        if b.is_ascii_alphanumeric() || (b == b'-' && next_is_alnum) {
            end += 1;
        } else {
            break;
        }
    }

    Some(&candidate[..end])
}
