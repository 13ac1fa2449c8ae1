//! Audit trail of committed substitutions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// One committed substitution. Never mutated after it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermApplication {
    pub source_term: String,
    pub target_term: String,
    /// The literal text that was replaced (its case may differ from the source).
    pub original_text: String,
    /// Character index of the replaced text in the text before enforcement.
    pub position: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRecord {
    pub source_term: String,
    pub target_term: String,
    pub original_text: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditSummary {
    pub total_replacements: usize,
    pub unique_terms: usize,
    pub replacements: Vec<ReplacementRecord>,
    pub timestamp: String,
}

/// Record of a single enforcement call, owned by that call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnforcementAudit {
    original_text: String,
    enforced_text: String,
    applied_terms: Vec<TermApplication>,
    timestamp: DateTime<Utc>,
}

impl EnforcementAudit {
    pub fn new(original_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            enforced_text: String::new(),
            applied_terms: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn add_application(
        &mut self,
        source_term: &str,
        target_term: &str,
        position: usize,
        original_text: &str,
    ) {
        self.applied_terms.push(TermApplication {
            source_term: source_term.to_string(),
            target_term: target_term.to_string(),
            original_text: original_text.to_string(),
            position,
            timestamp: Utc::now(),
        });
    }

    /// Finalizes the audit with the text the enforcement produced.
    pub fn set_enforced_text(&mut self, text: impl Into<String>) {
        self.enforced_text = text.into();
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn enforced_text(&self) -> &str {
        &self.enforced_text
    }

    pub fn applied_terms(&self) -> &[TermApplication] {
        &self.applied_terms
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn summary(&self) -> AuditSummary {
        let unique: HashSet<&str> = self
            .applied_terms
            .iter()
            .map(|a| a.source_term.as_str())
            .collect();

        AuditSummary {
            total_replacements: self.applied_terms.len(),
            unique_terms: unique.len(),
            replacements: self
                .applied_terms
                .iter()
                .map(|a| ReplacementRecord {
                    source_term: a.source_term.clone(),
                    target_term: a.target_term.clone(),
                    original_text: a.original_text.clone(),
                    position: a.position,
                })
                .collect(),
            timestamp: self.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollectorStatistics {
    pub total_audits: usize,
    pub total_replacements: usize,
    pub unique_terms_used: usize,
    pub avg_replacements_per_audit: f64,
}

/// Append-only history of audits. With a limit set, the oldest audits are
/// evicted first; statistics cover the retained history only.
#[derive(Debug, Clone, Default)]
pub struct AuditCollector {
    audits: VecDeque<EnforcementAudit>,
    history_limit: Option<usize>,
}

impl AuditCollector {
    pub fn new(history_limit: Option<usize>) -> Self {
        Self {
            audits: VecDeque::new(),
            history_limit: history_limit.filter(|&limit| limit > 0),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn record(&mut self, audit: EnforcementAudit) {
        self.audits.push_back(audit);
        if let Some(limit) = self.history_limit {
            while self.audits.len() > limit {
                self.audits.pop_front();
            }
        }
    }

    /// The last `limit` audits, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<&EnforcementAudit> {
        let skip = self.audits.len().saturating_sub(limit);
        self.audits.iter().skip(skip).collect()
    }

    pub fn len(&self) -> usize {
        self.audits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.audits.is_empty()
    }

    pub fn statistics(&self) -> CollectorStatistics {
        let total_replacements: usize = self.audits.iter().map(|a| a.applied_terms.len()).sum();
        let unique: HashSet<&str> = self
            .audits
            .iter()
            .flat_map(|a| a.applied_terms.iter().map(|t| t.source_term.as_str()))
            .collect();

        CollectorStatistics {
            total_audits: self.audits.len(),
            total_replacements,
            unique_terms_used: unique.len(),
            avg_replacements_per_audit: if self.audits.is_empty() {
                0.0
            } else {
                total_replacements as f64 / self.audits.len() as f64
            },
        }
    }
}
