//! Presence-based confidence scoring.

use crate::models::candidate::ExtractionResult;
use crate::models::config::ScoreWeights;

/// Which fields were found, and whether the text came through OCR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldPresence {
    pub name: bool,
    pub email: bool,
    pub phone: bool,
    pub linkedin: bool,
    pub github: bool,
    pub ocr_used: bool,
}

impl FieldPresence {
    pub fn of(result: &ExtractionResult, ocr_used: bool) -> Self {
        Self {
            name: present(result.name.as_deref()),
            email: present(result.email.as_deref()),
            phone: present(result.phone.as_deref()),
            linkedin: present(result.linkedin.as_deref()),
            github: present(result.github.as_deref()),
            ocr_used,
        }
    }
}

impl ScoreWeights {
    /// Additive score in `[0, 1]`, rounded to four decimals.
    pub fn score(&self, presence: FieldPresence) -> f64 {
        let mut score = 0.0;
        if presence.email {
            score += self.email;
        }
        if presence.phone {
            score += self.phone;
        }
        if presence.name {
            score += self.name;
        }
        if presence.linkedin {
            score += self.linkedin;
        }
        if presence.github {
            score += self.github;
        }
        if !presence.ocr_used {
            score += self.non_ocr_bonus;
        }

        round4(score.clamp(0.0, 1.0))
    }
}

/// Confidence score with the default weights.
pub fn score_confidence(
    name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
    linkedin: Option<&str>,
    github: Option<&str>,
    ocr_used: bool,
) -> f64 {
    ScoreWeights::default().score(FieldPresence {
        name: present(name),
        email: present(email),
        phone: present(phone),
        linkedin: present(linkedin),
        github: present(github),
        ocr_used,
    })
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

// Sums like 0.4 + 0.25 + 0.05 are not exact in binary floating point.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
