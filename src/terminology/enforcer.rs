//! Enforcement engine
//!
//! Entries are applied one at a time in term-set order (longest source
//! first). Each entry's matches are spliced right-to-left, and a match is
//! rejected when it overlaps a span an earlier splice produced. The same
//! selection pass backs both post-hoc enforcement and masking.

use std::ops::Range;
use std::sync::Arc;

use super::audit::EnforcementAudit;
use super::case::preserve_case;
use super::glossary::{GlossaryEntry, GlossaryTermSet};
use super::masking::{self, MaskedText, UnmaskOutcome};
use super::matcher;

/// A span already produced by an accepted substitution, in current-text
/// byte coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReplacedRange {
    start: usize,
    end: usize,
    /// Replacement length minus replaced length, in bytes.
    delta: isize,
}

impl ReplacedRange {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && end > self.start
    }

    fn shift(&mut self, delta: isize) {
        self.start = self.start.saturating_add_signed(delta);
        self.end = self.end.saturating_add_signed(delta);
    }
}

/// An accepted substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Splice<'g> {
    pub entry: &'g GlossaryEntry,
    pub matched_text: String,
    /// Character index of the match in the input text.
    pub position: usize,
    /// Byte offset of the match in the input text.
    pub original_start: usize,
}

impl Splice<'_> {
    /// Byte range of the match in the input text.
    pub fn original_span(&self) -> Range<usize> {
        self.original_start..self.original_start + self.matched_text.len()
    }
}

/// Runs the selection pass over `text`, splicing in case-preserved targets.
/// Later entries see the spliced targets when checking word boundaries, so
/// masking reuses this pass and only swaps tokens in afterwards.
pub(crate) fn splice_terms<'g>(text: &str, terms: &'g GlossaryTermSet) -> (String, Vec<Splice<'g>>) {
    let mut current = text.to_string();
    let mut ranges: Vec<ReplacedRange> = Vec::new();
    let mut splices = Vec::new();

    for entry in terms {
        let matches = matcher::find_matches(&current, entry);

        for m in matches.into_iter().rev() {
            if ranges.iter().any(|r| r.overlaps(m.start, m.end)) {
                tracing::debug!(
                    "Skipping '{}' at byte {}: overlaps an earlier replacement",
                    m.matched_text,
                    m.start
                );
                continue;
            }

            let replacement = preserve_case(&m.matched_text, m.entry.target());
            let shifted: isize = ranges
                .iter()
                .filter(|r| r.end <= m.start)
                .map(|r| r.delta)
                .sum();
            let original_start = m.start.saturating_add_signed(-shifted);
            let position = text[..original_start].chars().count();

            current.replace_range(m.span(), &replacement);

            let delta = replacement.len() as isize - (m.end - m.start) as isize;
            for range in ranges.iter_mut().filter(|r| r.start >= m.end) {
                range.shift(delta);
            }
            ranges.push(ReplacedRange {
                start: m.start,
                end: m.start + replacement.len(),
                delta,
            });

            splices.push(Splice {
                entry,
                matched_text: m.matched_text,
                position,
                original_start,
            });
        }
    }

    (current, splices)
}

/// Enforce: rewrites every glossary source in `text` to its case-preserved
/// target, recording each substitution in `audit` when one is supplied.
pub fn enforce(text: &str, terms: &GlossaryTermSet, audit: Option<&mut EnforcementAudit>) -> String {
    let (enforced, splices) = splice_terms(text, terms);

    if let Some(audit) = audit {
        for splice in &splices {
            audit.add_application(
                splice.entry.source(),
                splice.entry.target(),
                splice.position,
                &splice.matched_text,
            );
        }
    }

    if !splices.is_empty() {
        tracing::debug!("Enforced {} glossary term(s)", splices.len());
    }

    enforced
}

/// Shares one loaded term set across any number of enforcement calls.
#[derive(Debug, Clone, Default)]
pub struct TerminologyEnforcer {
    terms: Arc<GlossaryTermSet>,
}

impl TerminologyEnforcer {
    pub fn new(terms: Arc<GlossaryTermSet>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &GlossaryTermSet {
        &self.terms
    }

    pub fn enforce(&self, text: &str, audit: Option<&mut EnforcementAudit>) -> String {
        enforce(text, &self.terms, audit)
    }

    /// Enforces `text` and returns the finalized audit alongside it.
    pub fn enforce_audited(&self, text: &str) -> (String, EnforcementAudit) {
        let mut audit = EnforcementAudit::new(text);
        let enforced = self.enforce(text, Some(&mut audit));
        audit.set_enforced_text(enforced.clone());
        (enforced, audit)
    }

    pub fn applicable_terms(&self, text: &str) -> Vec<&GlossaryEntry> {
        matcher::applicable_terms(text, &self.terms)
    }

    pub fn mask(&self, text: &str, placeholder_prefix: &str) -> MaskedText {
        masking::mask(text, &self.terms, placeholder_prefix)
    }

    pub fn unmask(
        &self,
        translated: &str,
        masked: &MaskedText,
        audit: Option<&mut EnforcementAudit>,
    ) -> UnmaskOutcome {
        masking::unmask(translated, masked, audit)
    }
}
