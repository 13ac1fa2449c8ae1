//! Mask-then-translate mode
//!
//! Before translation, glossary terms in the source text are swapped for
//! opaque placeholder tokens so the engine cannot mistranslate them. After
//! translation each token is replaced by the case-preserved target term.
//! Span selection is the enforcement engine's, so both modes pick the same
//! terms at the same places.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::audit::EnforcementAudit;
use super::case::CasePattern;
use super::enforcer::splice_terms;
use super::glossary::GlossaryTermSet;

pub const DEFAULT_PLACEHOLDER_PREFIX: &str = "__GLOSS_";
const PLACEHOLDER_SUFFIX: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub token: String,
    pub source_term: String,
    pub target_term: String,
    /// The source-text span the token stands in for.
    pub matched_text: String,
    pub case: CasePattern,
    /// Character index of the masked span in the source text.
    pub position: usize,
}

impl Placeholder {
    pub fn replacement(&self) -> String {
        self.case.apply(&self.target_term)
    }
}

/// Masked source text plus the mapping needed to restore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskedText {
    pub text: String,
    pub prefix: String,
    pub placeholders: Vec<Placeholder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnmaskOutcome {
    pub text: String,
    /// Number of tokens replaced.
    pub restored: usize,
    /// Tokens absent from the translated text.
    pub missing: Vec<String>,
    /// Placeholder-shaped tokens still present after restoration.
    pub leftover: Vec<String>,
}

impl UnmaskOutcome {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.leftover.is_empty()
    }
}

pub fn placeholder_token(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}{PLACEHOLDER_SUFFIX}")
}

pub fn mask(text: &str, terms: &GlossaryTermSet, prefix: &str) -> MaskedText {
    if text.contains(prefix) {
        tracing::warn!(
            "Source text already contains the placeholder prefix '{}'; restoration may be ambiguous",
            prefix
        );
    }

    // Same spans as post-hoc enforcement; tokens go into the original ranges.
    let (_, splices) = splice_terms(text, terms);

    let mut by_start: Vec<(Range<usize>, String)> = Vec::with_capacity(splices.len());
    let placeholders = splices
        .into_iter()
        .enumerate()
        .map(|(index, splice)| {
            let token = placeholder_token(prefix, index);
            by_start.push((splice.original_span(), token.clone()));
            Placeholder {
                case: CasePattern::detect(&splice.matched_text),
                token,
                source_term: splice.entry.source().to_string(),
                target_term: splice.entry.target().to_string(),
                matched_text: splice.matched_text,
                position: splice.position,
            }
        })
        .collect::<Vec<_>>();

    by_start.sort_by_key(|(span, _)| span.start);
    let mut masked = String::with_capacity(text.len());
    let mut cursor = 0;
    for (span, token) in &by_start {
        masked.push_str(&text[cursor..span.start]);
        masked.push_str(token);
        cursor = span.end;
    }
    masked.push_str(&text[cursor..]);

    tracing::debug!("Masked {} glossary term(s)", placeholders.len());

    MaskedText {
        text: masked,
        prefix: prefix.to_string(),
        placeholders,
    }
}

/// Restores every placeholder in `translated`. When an audit is supplied,
/// each restoration is recorded at the token's character index in
/// `translated`, with the masked source span as the replaced text.
pub fn unmask(
    translated: &str,
    masked: &MaskedText,
    mut audit: Option<&mut EnforcementAudit>,
) -> UnmaskOutcome {
    let mut hits: Vec<(usize, &Placeholder)> = Vec::new();
    let mut missing = Vec::new();

    for placeholder in &masked.placeholders {
        let before = hits.len();
        hits.extend(
            translated
                .match_indices(&placeholder.token)
                .map(|(start, _)| (start, placeholder)),
        );
        if hits.len() == before {
            tracing::warn!(
                "Placeholder {} for '{}' was lost in translation",
                placeholder.token,
                placeholder.source_term
            );
            missing.push(placeholder.token.clone());
        }
    }
    hits.sort_by_key(|(start, _)| *start);

    let mut text = String::with_capacity(translated.len());
    let mut cursor = 0;
    let mut restored = 0;

    for (start, placeholder) in hits {
        if start < cursor {
            continue;
        }
        text.push_str(&translated[cursor..start]);
        text.push_str(&placeholder.replacement());

        if let Some(audit) = audit.as_deref_mut() {
            audit.add_application(
                &placeholder.source_term,
                &placeholder.target_term,
                translated[..start].chars().count(),
                &placeholder.matched_text,
            );
        }

        cursor = start + placeholder.token.len();
        restored += 1;
    }
    text.push_str(&translated[cursor..]);

    let leftover = leftover_tokens(&text, &masked.prefix);
    for token in &leftover {
        tracing::warn!("Unresolved placeholder {} left in translation", token);
    }

    UnmaskOutcome {
        text,
        restored,
        missing,
        leftover,
    }
}

fn leftover_tokens(text: &str, prefix: &str) -> Vec<String> {
    let pattern = format!(
        "{}\\d+{}",
        regex::escape(prefix),
        regex::escape(PLACEHOLDER_SUFFIX)
    );
    match Regex::new(&pattern) {
        Ok(re) => re.find_iter(text).map(|m| m.as_str().to_string()).collect(),
        Err(e) => {
            tracing::warn!("Cannot scan for leftover placeholders: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminology::enforcer::enforce;
    use crate::terminology::glossary::GlossaryEntry;

    fn terms() -> GlossaryTermSet {
        GlossaryTermSet::from_entries([
            GlossaryEntry::new("service", "dienst").unwrap(),
            GlossaryEntry::new("service desk", "servicedesk").unwrap(),
            GlossaryEntry::new("incident", "incident").unwrap(),
        ])
    }

    #[test]
    fn test_mask_replaces_terms_with_tokens() {
        let masked = mask("Call the Service Desk about the service", &terms(), "__GLOSS_");

        assert_eq!(masked.text, "Call the __GLOSS_0__ about the __GLOSS_1__");
        assert_eq!(masked.placeholders.len(), 2);
        let desk = &masked.placeholders[0];
        assert_eq!(desk.source_term, "service desk");
        assert_eq!(desk.matched_text, "Service Desk");
        assert_eq!(desk.case, CasePattern::Title);
        assert_eq!(desk.position, 9);
    }

    #[test]
    fn test_identity_round_trip_equals_enforcement() {
        let text = "The SERVICE DESK logged an Incident; service restored.";
        let masked = mask(text, &terms(), DEFAULT_PLACEHOLDER_PREFIX);
        let outcome = unmask(&masked.text, &masked, None);

        assert!(outcome.is_complete());
        assert_eq!(outcome.restored, 3);
        assert_eq!(outcome.text, enforce(text, &terms(), None));
    }

    #[test]
    fn test_unmask_handles_reordering_and_records_positions() {
        let masked = mask("incident at the service desk", &terms(), "__GLOSS_");
        let translated = format!("{} bij {}", masked.placeholders[0].token, masked.placeholders[1].token);
        let mut audit = EnforcementAudit::new(translated.clone());
        let outcome = unmask(&translated, &masked, Some(&mut audit));

        assert_eq!(outcome.text, "servicedesk bij incident");
        assert_eq!(audit.applied_terms()[0].position, 0);
        assert_eq!(audit.applied_terms()[1].position, 16);
    }

    #[test]
    fn test_unmask_reports_missing_and_leftover() {
        let masked = mask("incident and service", &terms(), "__GLOSS_");
        let outcome = unmask("only __GLOSS_1__ and __GLOSS_9__", &masked, None);

        assert_eq!(outcome.restored, 1);
        assert_eq!(outcome.missing, vec!["__GLOSS_0__".to_string()]);
        assert_eq!(outcome.leftover, vec!["__GLOSS_9__".to_string()]);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_masked_text_survives_json() {
        let masked = mask("incident", &terms(), "__GLOSS_");
        let json = serde_json::to_string(&masked).unwrap();
        let back: MaskedText = serde_json::from_str(&json).unwrap();
        assert_eq!(back, masked);
    }
}
