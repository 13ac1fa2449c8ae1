//! Case-preserving rewriter
//!
//! The casing of a replacement mirrors the text it replaces. Rules apply in
//! order: all-uppercase, then leading capital, then all-lowercase; anything
//! else leaves the target untouched.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasePattern {
    Upper,
    Title,
    Lower,
    Mixed,
}

/// At least one cased character and no lowercase ones.
fn is_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// At least one cased character and no uppercase ones.
fn is_lower(s: &str) -> bool {
    s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase)
}

impl CasePattern {
    pub fn detect(matched: &str) -> Self {
        if is_upper(matched) {
            return Self::Upper;
        }

        let mut chars = matched.chars();
        if let Some(first) = chars.next() {
            if first.is_uppercase() && !is_upper(chars.as_str()) {
                return Self::Title;
            }
        }

        if is_lower(matched) {
            return Self::Lower;
        }

        Self::Mixed
    }

    pub fn apply(self, target: &str) -> String {
        match self {
            Self::Upper => target.to_uppercase(),
            Self::Title => {
                let mut chars = target.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.as_str().to_lowercase().chars())
                        .collect(),
                    None => String::new(),
                }
            }
            Self::Lower => target.to_lowercase(),
            Self::Mixed => target.to_string(),
        }
    }
}

/// Rewrite: `target` recased after the pattern of `matched`.
pub fn preserve_case(matched: &str, target: &str) -> String {
    CasePattern::detect(matched).apply(target)
}
