//! Translation pipeline around the enforcement core
//!
//! The pipeline owns no global state: the term set, translation provider and
//! optional post-editor are handed in at construction and shared read-only
//! by every request.

pub mod command;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::terminology::audit::{EnforcementAudit, ReplacementRecord};
use crate::terminology::enforcer::TerminologyEnforcer;
use crate::terminology::masking::DEFAULT_PLACEHOLDER_PREFIX;
use crate::terminology::verify::{PreservationReport, verify_preservation};

pub use command::{CommandPostEditor, CommandTranslator, ExternalCommand};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Post-editing failed: {0}")]
    PostEdit(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Provider-specific knobs forwarded untouched to the translation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateOptions {
    pub category: Option<String>,
}

/// A machine-translation engine. Its output is treated as untrusted text.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        options: &TranslateOptions,
    ) -> PipelineResult<String>;

    fn provider_name(&self) -> &str;
}

/// A fluency rewriter that must leave protected terms in place.
#[async_trait]
pub trait PostEditor: Send + Sync {
    async fn rewrite(&self, text: &str, protected_terms: &[String]) -> PipelineResult<String>;

    fn editor_name(&self) -> &str;
}

/// Returns its input unchanged; for dry runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

#[async_trait]
impl TranslationProvider for IdentityTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        _target_lang: &str,
        _options: &TranslateOptions,
    ) -> PipelineResult<String> {
        Ok(text.to_string())
    }

    fn provider_name(&self) -> &str {
        "identity"
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnforcementMode {
    /// Translate first, then enforce glossary terms in the output.
    #[default]
    PostHoc,
    /// Replace terms with placeholders before translating, restore after.
    Mask,
}

impl FromStr for EnforcementMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "post-hoc" | "posthoc" | "enforce" => Ok(Self::PostHoc),
            "mask" | "masking" => Ok(Self::Mask),
            _ => Err(format!("Unknown enforcement mode: {s} (expected post-hoc or mask)")),
        }
    }
}

impl std::fmt::Display for EnforcementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PostHoc => write!(f, "post-hoc"),
            Self::Mask => write!(f, "mask"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TranslationRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    pub enable_post_editor: bool,
    pub options: TranslateOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// Engine output (still carrying placeholders in mask mode).
    pub raw_translation: String,
    pub enforced_translation: String,
    pub final_translation: String,
    pub post_edited: bool,
    pub applied_terms: Vec<ReplacementRecord>,
    pub source_language: String,
    pub target_language: String,
    /// Present when a post-edit was rejected for changing protected terms.
    pub rejected_post_edit: Option<PreservationReport>,
    /// Placeholders the engine dropped (mask mode only).
    pub missing_placeholders: Vec<String>,
    #[serde(skip)]
    pub audit: EnforcementAudit,
}

pub struct TranslationPipeline {
    enforcer: TerminologyEnforcer,
    translator: Arc<dyn TranslationProvider>,
    post_editor: Option<Arc<dyn PostEditor>>,
    mode: EnforcementMode,
    placeholder_prefix: String,
}

impl TranslationPipeline {
    pub fn new(enforcer: TerminologyEnforcer, translator: Arc<dyn TranslationProvider>) -> Self {
        Self {
            enforcer,
            translator,
            post_editor: None,
            mode: EnforcementMode::default(),
            placeholder_prefix: DEFAULT_PLACEHOLDER_PREFIX.to_string(),
        }
    }

    pub fn with_post_editor(mut self, editor: Option<Arc<dyn PostEditor>>) -> Self {
        self.post_editor = editor;
        self
    }

    pub fn with_mode(mut self, mode: EnforcementMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_placeholder_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if !prefix.is_empty() {
            self.placeholder_prefix = prefix;
        }
        self
    }

    pub fn mode(&self) -> EnforcementMode {
        self.mode
    }

    pub fn has_post_editor(&self) -> bool {
        self.post_editor.is_some()
    }

    pub async fn translate(&self, request: &TranslationRequest) -> PipelineResult<PipelineOutput> {
        tracing::debug!(
            "Translating {} chars via {} ({} mode)",
            request.text.chars().count(),
            self.translator.provider_name(),
            self.mode
        );

        let (raw_translation, enforced_translation, mut audit, missing_placeholders) = match self.mode
        {
            EnforcementMode::PostHoc => {
                let raw = self.call_translator(&request.text, request).await?;
                let (enforced, audit) = self.enforcer.enforce_audited(&raw);
                (raw, enforced, audit, Vec::new())
            }
            EnforcementMode::Mask => {
                let masked = self.enforcer.mask(&request.text, &self.placeholder_prefix);
                let raw = self.call_translator(&masked.text, request).await?;
                let mut audit = EnforcementAudit::new(raw.clone());
                let outcome = self.enforcer.unmask(&raw, &masked, Some(&mut audit));
                (raw, outcome.text, audit, outcome.missing)
            }
        };
        audit.set_enforced_text(enforced_translation.clone());

        let mut final_translation = enforced_translation.clone();
        let mut post_edited = false;
        let mut rejected_post_edit = None;

        if request.enable_post_editor {
            if let Some(editor) = &self.post_editor {
                let protected = protected_terms(&audit);
                let edited = editor.rewrite(&enforced_translation, &protected).await?;
                let report = verify_preservation(&enforced_translation, &edited, &protected);

                if report.preserved {
                    final_translation = edited;
                    post_edited = true;
                } else {
                    tracing::warn!(
                        "{} changed protected terms {:?}; keeping the enforced translation",
                        editor.editor_name(),
                        report.changed_terms()
                    );
                    rejected_post_edit = Some(report);
                }
            } else {
                tracing::warn!("Post-editing requested but no post-editor is configured");
            }
        }

        Ok(PipelineOutput {
            raw_translation,
            enforced_translation,
            final_translation,
            post_edited,
            applied_terms: audit.summary().replacements,
            source_language: request.source_language.clone(),
            target_language: request.target_language.clone(),
            rejected_post_edit,
            missing_placeholders,
            audit,
        })
    }

    async fn call_translator(&self, text: &str, request: &TranslationRequest) -> PipelineResult<String> {
        self.translator
            .translate(
                text,
                &request.source_language,
                &request.target_language,
                &request.options,
            )
            .await
    }
}

/// Distinct target terms committed in `audit`, in first-applied order.
fn protected_terms(audit: &EnforcementAudit) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for application in audit.applied_terms() {
        if !terms.contains(&application.target_term) {
            terms.push(application.target_term.clone());
        }
    }
    terms
}
