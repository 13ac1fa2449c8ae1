//! `translate`: engine call wrapped in glossary enforcement

use anyhow::{Context, Result};
use colored::Colorize;
use std::sync::Arc;

use super::AppContext;
use crate::cli::TranslateArgs;
use crate::utils;
use termforce::pipeline::{
    CommandPostEditor, CommandTranslator, EnforcementMode, ExternalCommand, IdentityTranslator,
    PostEditor, TranslateOptions, TranslationPipeline, TranslationProvider, TranslationRequest,
};
use termforce::terminology::TerminologyEnforcer;

pub fn run(ctx: &AppContext, args: TranslateArgs) -> Result<()> {
    let engine = &ctx.config.engine;
    let enforcer = TerminologyEnforcer::new(ctx.load_terms()?);

    let translator: Arc<dyn TranslationProvider> =
        match args.engine.clone().or_else(|| engine.translate_command.clone()) {
            Some(cmd) => {
                let command = ExternalCommand::parse(&cmd).context("Engine command is empty")?;
                eprintln!("{}", format!("[Translate] Using engine: {}", command.label()).cyan());
                Arc::new(CommandTranslator::new(command))
            }
            None => {
                eprintln!(
                    "{}",
                    "[WARN] No engine configured; text passes through untranslated".yellow()
                );
                Arc::new(IdentityTranslator)
            }
        };

    let post_editor: Option<Arc<dyn PostEditor>> =
        match args.post_editor.clone().or_else(|| engine.post_edit_command.clone()) {
            Some(cmd) => {
                let command =
                    ExternalCommand::parse(&cmd).context("Post-editor command is empty")?;
                Some(Arc::new(CommandPostEditor::new(command)))
            }
            None => None,
        };
    let enable_post_editor = args.post_editor.is_some() || engine.enable_post_editor;

    let mode = match &args.mode {
        Some(m) => m.parse::<EnforcementMode>().map_err(anyhow::Error::msg)?,
        None => ctx.config.enforcement.mode,
    };

    let pipeline = TranslationPipeline::new(enforcer, translator)
        .with_post_editor(post_editor)
        .with_mode(mode)
        .with_placeholder_prefix(ctx.config.enforcement.placeholder_prefix.clone());

    let request = TranslationRequest {
        text: utils::read_input(&args.input)?,
        source_language: args.from.clone().unwrap_or_else(|| engine.source_language.clone()),
        target_language: args.to.clone().unwrap_or_else(|| engine.target_language.clone()),
        enable_post_editor,
        options: TranslateOptions {
            category: args.category.clone().or_else(|| engine.category.clone()),
        },
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let output = runtime.block_on(pipeline.translate(&request))?;

    eprintln!(
        "{}",
        format!(
            "[Translate] {} -> {} ({} mode): {} term(s) enforced",
            output.source_language,
            output.target_language,
            pipeline.mode(),
            output.applied_terms.len()
        )
        .green()
    );
    for token in &output.missing_placeholders {
        eprintln!("{}", format!("[WARN] Engine dropped placeholder {}", token).yellow());
    }
    if let Some(report) = &output.rejected_post_edit {
        eprintln!(
            "{}",
            format!(
                "[WARN] Post-edit discarded, protected terms changed: {}",
                report.changed_terms().join(", ")
            )
            .yellow()
        );
    } else if output.post_edited {
        eprintln!("{}", "[Translate] Post-edit applied".green());
    }

    let rendered = if args.json {
        serde_json::to_string_pretty(&output).context("Failed to serialize result")?
    } else {
        output.final_translation.clone()
    };
    utils::write_output(args.output.as_deref(), &rendered)?;

    Ok(())
}
