//! Glossary-driven terminology enforcement

pub mod audit;
pub mod case;
pub mod enforcer;
pub mod error;
pub mod glossary;
pub mod masking;
pub mod matcher;
pub mod verify;

pub use audit::{AuditCollector, AuditSummary, EnforcementAudit, TermApplication};
pub use case::{CasePattern, preserve_case};
pub use enforcer::{TerminologyEnforcer, enforce};
pub use error::{GlossaryError, GlossaryResult};
pub use glossary::{GlossaryEntry, GlossaryTermSet};
pub use masking::{DEFAULT_PLACEHOLDER_PREFIX, MaskedText, UnmaskOutcome, mask, unmask};
pub use matcher::{Match, applicable_terms, find_matches};
pub use verify::{PreservationReport, verify_preservation};
