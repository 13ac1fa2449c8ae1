//! Translation pipeline with mock engines

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use termforce::pipeline::{
    EnforcementMode, IdentityTranslator, PipelineError, PipelineResult, PostEditor,
    TranslateOptions, TranslationPipeline, TranslationProvider, TranslationRequest,
};
use termforce::terminology::{GlossaryEntry, GlossaryTermSet, TerminologyEnforcer};

/// Word-for-word dictionary engine that records what it was asked.
struct DictionaryTranslator {
    words: HashMap<&'static str, &'static str>,
    seen: Mutex<Vec<String>>,
}

impl DictionaryTranslator {
    fn new(words: &[(&'static str, &'static str)]) -> Self {
        Self {
            words: words.iter().copied().collect(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn last_input(&self) -> String {
        self.seen.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TranslationProvider for DictionaryTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        _target_lang: &str,
        _options: &TranslateOptions,
    ) -> PipelineResult<String> {
        self.seen.lock().unwrap().push(text.to_string());
        Ok(text
            .split(' ')
            .map(|w| self.words.get(w).copied().unwrap_or(w))
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn provider_name(&self) -> &str {
        "dictionary"
    }
}

struct FailingTranslator;

#[async_trait]
impl TranslationProvider for FailingTranslator {
    async fn translate(
        &self,
        _text: &str,
        _source_lang: &str,
        _target_lang: &str,
        _options: &TranslateOptions,
    ) -> PipelineResult<String> {
        Err(PipelineError::Translation("quota exceeded".to_string()))
    }

    fn provider_name(&self) -> &str {
        "failing"
    }
}

/// Post-editor that applies fixed string replacements.
struct RewritingEditor {
    from: &'static str,
    to: &'static str,
}

#[async_trait]
impl PostEditor for RewritingEditor {
    async fn rewrite(&self, text: &str, _protected_terms: &[String]) -> PipelineResult<String> {
        Ok(text.replace(self.from, self.to))
    }

    fn editor_name(&self) -> &str {
        "rewriting"
    }
}

fn enforcer() -> TerminologyEnforcer {
    let terms = GlossaryTermSet::from_entries(
        [
            ("service desk", "servicedesk"),
            ("incident", "incident"),
            ("problem", "probleem"),
        ]
        .iter()
        .filter_map(|(s, t)| GlossaryEntry::new(s, t)),
    );
    TerminologyEnforcer::new(Arc::new(terms))
}

fn request(text: &str) -> TranslationRequest {
    TranslationRequest {
        text: text.to_string(),
        source_language: "en".to_string(),
        target_language: "nl".to_string(),
        enable_post_editor: false,
        options: TranslateOptions::default(),
    }
}

fn engine() -> Arc<DictionaryTranslator> {
    // Mistranslates both glossary terms on purpose.
    Arc::new(DictionaryTranslator::new(&[
        ("The", "Het"),
        ("problem", "vraagstuk"),
        ("reached", "bereikte"),
        ("the", "de"),
        ("service", "dienst"),
        ("desk", "bureau"),
    ]))
}

#[tokio::test]
async fn test_post_hoc_mode_enforces_engine_output() {
    let engine = engine();
    let pipeline = TranslationPipeline::new(enforcer(), engine.clone());

    // Post-hoc only sees the engine output, where the source terms survive verbatim.
    let output = pipeline
        .translate(&request("The incident reached the Service Desk"))
        .await
        .unwrap();

    assert_eq!(output.raw_translation, "Het incident bereikte de Service Desk");
    assert_eq!(output.final_translation, "Het incident bereikte de Servicedesk");
    assert_eq!(output.applied_terms.len(), 2);
    assert!(!output.post_edited);
}

#[tokio::test]
async fn test_mask_mode_shields_terms_from_engine() {
    let engine = engine();
    let pipeline =
        TranslationPipeline::new(enforcer(), engine.clone()).with_mode(EnforcementMode::Mask);

    let output = pipeline
        .translate(&request("The problem reached the service desk"))
        .await
        .unwrap();

    let sent = engine.last_input();
    assert!(!sent.contains("problem"), "engine saw a glossary term: {sent}");
    assert!(sent.contains("__GLOSS_"));

    assert_eq!(output.final_translation, "Het probleem bereikte de servicedesk");
    assert!(output.missing_placeholders.is_empty());
    assert_eq!(output.audit.enforced_text(), output.final_translation);
}

#[tokio::test]
async fn test_custom_placeholder_prefix() {
    let engine = engine();
    let pipeline = TranslationPipeline::new(enforcer(), engine.clone())
        .with_mode(EnforcementMode::Mask)
        .with_placeholder_prefix("@@T");

    let output = pipeline.translate(&request("The problem")).await.unwrap();

    assert_eq!(engine.last_input(), "The @@T0__");
    assert_eq!(output.final_translation, "Het probleem");
}

#[tokio::test]
async fn test_post_edit_accepted_when_terms_preserved() {
    let pipeline = TranslationPipeline::new(enforcer(), Arc::new(IdentityTranslator))
        .with_post_editor(Some(Arc::new(RewritingEditor {
            from: "There is",
            to: "We have",
        })));

    let mut req = request("There is a problem");
    req.enable_post_editor = true;
    let output = pipeline.translate(&req).await.unwrap();

    assert!(output.post_edited);
    assert_eq!(output.enforced_translation, "There is a probleem");
    assert_eq!(output.final_translation, "We have a probleem");
    assert!(output.rejected_post_edit.is_none());
}

#[tokio::test]
async fn test_post_edit_discarded_when_term_dropped() {
    let pipeline = TranslationPipeline::new(enforcer(), Arc::new(IdentityTranslator))
        .with_post_editor(Some(Arc::new(RewritingEditor {
            from: "probleem",
            to: "kwestie",
        })));

    let mut req = request("There is a problem");
    req.enable_post_editor = true;
    let output = pipeline.translate(&req).await.unwrap();

    assert!(!output.post_edited);
    assert_eq!(output.final_translation, "There is a probleem");

    let report = output.rejected_post_edit.expect("rejection report");
    assert_eq!(report.changed_terms(), ["probleem"]);
}

#[tokio::test]
async fn test_post_editor_skipped_unless_requested() {
    let pipeline = TranslationPipeline::new(enforcer(), Arc::new(IdentityTranslator))
        .with_post_editor(Some(Arc::new(RewritingEditor {
            from: "There is",
            to: "We have",
        })));
    assert!(pipeline.has_post_editor());

    let output = pipeline.translate(&request("There is a problem")).await.unwrap();
    assert!(!output.post_edited);
    assert_eq!(output.final_translation, "There is a probleem");
}

#[tokio::test]
async fn test_engine_failure_propagates() {
    let pipeline = TranslationPipeline::new(enforcer(), Arc::new(FailingTranslator));

    let err = pipeline.translate(&request("a problem")).await.unwrap_err();
    assert!(matches!(err, PipelineError::Translation(_)));
    assert!(err.to_string().contains("quota exceeded"));
}
