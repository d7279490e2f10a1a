//! Common regex patterns and rule tables for resume field extraction.

use lazy_static::lazy_static;
use regex::Regex;

use super::MatchRule;

lazy_static! {
    // Email patterns
    pub static ref EMAIL_MAILTO_HREF: Regex = Regex::new(
        r#"(?i)href=["']mailto:([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})["']"#
    ).unwrap();

    pub static ref EMAIL_MAILTO: Regex = Regex::new(
        r"(?i)mailto:\s*([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})"
    ).unwrap();

    pub static ref EMAIL_LABELED: Regex = Regex::new(
        r#"(?i)(?:email|e-mail|mail)[\s:]*.*?(?:href=["'])?(?:mailto:)?([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})"#
    ).unwrap();

    pub static ref EMAIL_ADDRESS: Regex = Regex::new(
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"
    ).unwrap();

    // Phone candidates (run over separator-stripped text)
    pub static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();

    // LinkedIn patterns; capture the profile id
    pub static ref LINKEDIN_HREF_URL: Regex = Regex::new(
        r#"(?i)href=["']https?://(?:www\.)?linkedin\.com/in/([A-Za-z0-9-]+)["']"#
    ).unwrap();

    pub static ref LINKEDIN_HREF_BARE: Regex = Regex::new(
        r#"(?i)href=["'](?:www\.)?linkedin\.com/in/([A-Za-z0-9-]+)["']"#
    ).unwrap();

    pub static ref LINKEDIN_LABELED: Regex = Regex::new(
        r#"(?i)(?:linkedin|linked\s*in)[\s:]*.*?(?:href=["'])?https?://(?:www\.)?linkedin\.com/in/([A-Za-z0-9-]+)"#
    ).unwrap();

    pub static ref LINKEDIN_URL: Regex = Regex::new(
        r"(?i)https?://(?:www\.)?linkedin\.com/in/([A-Za-z0-9-]+)"
    ).unwrap();

    pub static ref LINKEDIN_BARE: Regex = Regex::new(
        r"(?i)(?:www\.)?linkedin\.com/in/([A-Za-z0-9-]+)"
    ).unwrap();

    pub static ref LINKEDIN_LEGACY: Regex = Regex::new(
        r"(?i)linkedin\.com/profile/view\?id=([A-Za-z0-9-]+)"
    ).unwrap();

    pub static ref LINKEDIN_ROOT: Regex = Regex::new(r"(?i)linkedin\.com/in/").unwrap();

    // GitHub patterns; capture a username candidate, trimmed afterwards
    pub static ref GITHUB_HREF_URL: Regex = Regex::new(
        r#"(?i)href=["']https?://(?:www\.)?github\.com/([A-Za-z0-9](?:-?[A-Za-z0-9])*)["']"#
    ).unwrap();

    pub static ref GITHUB_HREF_BARE: Regex = Regex::new(
        r#"(?i)href=["'](?:www\.)?github\.com/([A-Za-z0-9](?:-?[A-Za-z0-9])*)["']"#
    ).unwrap();

    pub static ref GITHUB_LABELED: Regex = Regex::new(
        r#"(?i)(?:github|git\s*hub)[\s:]*.*?(?:href=["'])?https?://(?:www\.)?github\.com/([A-Za-z0-9][A-Za-z0-9-]*)"#
    ).unwrap();

    pub static ref GITHUB_URL: Regex = Regex::new(
        r"(?i)https?://(?:www\.)?github\.com/([A-Za-z0-9][A-Za-z0-9-]*)"
    ).unwrap();

    pub static ref GITHUB_BARE: Regex = Regex::new(
        r"(?i)(?:www\.)?github\.com/([A-Za-z0-9][A-Za-z0-9-]*)"
    ).unwrap();

    pub static ref GITHUB_ROOT: Regex = Regex::new(r"(?i)github\.com/").unwrap();

    // Name heuristics
    pub static ref PHONE_LIKE_LINE: Regex = Regex::new(r"^\+?[0-9]").unwrap();
}

lazy_static! {
    /// Email cascade: mailto links, then labeled addresses, then any address.
    pub static ref EMAIL_RULES: Vec<MatchRule> = vec![
        MatchRule::new("mailto_href", &EMAIL_MAILTO_HREF, 1),
        MatchRule::new("mailto", &EMAIL_MAILTO, 1),
        MatchRule::new("labeled", &EMAIL_LABELED, 1),
        MatchRule::new("address", &EMAIL_ADDRESS, 0),
    ];

    /// LinkedIn cascade.
    pub static ref LINKEDIN_RULES: Vec<MatchRule> = vec![
        MatchRule::new("href_url", &LINKEDIN_HREF_URL, 1),
        MatchRule::new("href_bare", &LINKEDIN_HREF_BARE, 1),
        MatchRule::new("labeled", &LINKEDIN_LABELED, 1),
        MatchRule::new("url", &LINKEDIN_URL, 1),
        MatchRule::new("bare_domain", &LINKEDIN_BARE, 1),
        MatchRule::new("legacy_profile", &LINKEDIN_LEGACY, 1),
        MatchRule::new("domain_root", &LINKEDIN_URL, 1).guarded(&LINKEDIN_ROOT),
    ];

    /// GitHub cascade.
    pub static ref GITHUB_RULES: Vec<MatchRule> = vec![
        MatchRule::new("href_url", &GITHUB_HREF_URL, 1),
        MatchRule::new("href_bare", &GITHUB_HREF_BARE, 1),
        MatchRule::new("labeled", &GITHUB_LABELED, 1),
        MatchRule::new("url", &GITHUB_URL, 1),
        MatchRule::new("bare_domain", &GITHUB_BARE, 1),
        MatchRule::new("domain_root", &GITHUB_URL, 1).guarded(&GITHUB_ROOT),
    ];
}
