//! Term-preservation check for externally rewritten text
//!
//! A fluency post-editor may reword the enforced text but must leave every
//! protected term occurring exactly as often as before. This module only
//! reports drift; whether to discard the rewrite is the caller's decision.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermDrift {
    pub term: String,
    pub before: usize,
    pub after: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreservationReport {
    pub preserved: bool,
    pub changed: Vec<TermDrift>,
}

impl PreservationReport {
    pub fn changed_terms(&self) -> Vec<&str> {
        self.changed.iter().map(|d| d.term.as_str()).collect()
    }
}

/// Non-overlapping, case-insensitive substring count.
pub fn count_occurrences(text: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(&term.to_lowercase()).count()
}

pub fn verify_preservation<S: AsRef<str>>(
    before: &str,
    after: &str,
    protected_terms: &[S],
) -> PreservationReport {
    let mut changed: Vec<TermDrift> = Vec::new();

    for term in protected_terms {
        let term = term.as_ref();
        if term.is_empty() || changed.iter().any(|d| d.term == term) {
            continue;
        }
        let before_count = count_occurrences(before, term);
        let after_count = count_occurrences(after, term);
        if before_count != after_count {
            changed.push(TermDrift {
                term: term.to_string(),
                before: before_count,
                after: after_count,
            });
        }
    }

    PreservationReport {
        preserved: changed.is_empty(),
        changed,
    }
}
