//! Deterministic glossary enforcement for machine-translated text.
//!
//! Load a [`GlossaryTermSet`] once, share it behind an `Arc`, and run
//! [`enforce`] (or the mask/unmask pair) per request. Every substitution can
//! be captured in an [`EnforcementAudit`].

pub mod config;
pub mod pipeline;
pub mod terminology;

pub use terminology::{
    AuditCollector, EnforcementAudit, GlossaryEntry, GlossaryError, GlossaryTermSet,
    TerminologyEnforcer, enforce, preserve_case,
};
