//! Post-hoc enforcement over files and directories

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::AppContext;
use crate::cli::EnforceArgs;
use crate::utils;
use termforce::terminology::audit::{AuditSummary, CollectorStatistics};
use termforce::terminology::{AuditCollector, EnforcementAudit, TerminologyEnforcer};

#[derive(Serialize)]
struct AuditReport {
    statistics: CollectorStatistics,
    files: Vec<FileAudit>,
}

#[derive(Serialize)]
struct FileAudit {
    file: String,
    #[serde(flatten)]
    summary: AuditSummary,
}

pub fn run(ctx: &AppContext, args: EnforceArgs) -> Result<()> {
    let enforcer = TerminologyEnforcer::new(ctx.load_terms()?);
    let mut collector = AuditCollector::new(ctx.config.audit_history_limit());
    let mut files = Vec::new();

    let input = &args.input;
    if utils::is_stdin(input) || input.is_file() {
        let text = utils::read_input(input)?;
        let (enforced, audit) = enforcer.enforce_audited(&text);
        utils::write_output(args.output.as_deref(), &enforced)?;
        report_file(input, &audit);
        files.push((input.display().to_string(), audit));
    } else if input.is_dir() {
        files = enforce_directory(&enforcer, input, &args)?;
    } else {
        anyhow::bail!("Input path does not exist: {}", input.display());
    }

    let summaries: Vec<FileAudit> = files
        .iter()
        .map(|(file, audit)| FileAudit {
            file: file.clone(),
            summary: audit.summary(),
        })
        .collect();
    for (_, audit) in files {
        collector.record(audit);
    }

    let stats = collector.statistics();
    eprintln!(
        "{}",
        format!(
            "[OK] {} replacement(s) across {} text(s), {} distinct term(s)",
            stats.total_replacements, stats.total_audits, stats.unique_terms_used
        )
        .green()
    );

    if let Some(path) = &args.audit_json {
        let report = AuditReport {
            statistics: stats,
            files: summaries,
        };
        let json = serde_json::to_string_pretty(&report)?;
        utils::write_output(Some(path.as_path()), &json)?;
        eprintln!("  Audit written to {}", path.display());
    }

    Ok(())
}

fn enforce_directory(
    enforcer: &TerminologyEnforcer,
    dir: &Path,
    args: &EnforceArgs,
) -> Result<Vec<(String, EnforcementAudit)>> {
    let walker = if args.recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    let text_files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == args.extension.as_str())
                .unwrap_or(false)
        })
        .filter(|e| args.output.is_some() || !is_enforced_output(e.path()))
        .map(|e| e.into_path())
        .collect();

    if text_files.is_empty() {
        eprintln!(
            "{}",
            format!("[WARN] No .{} files found", args.extension).yellow()
        );
        return Ok(Vec::new());
    }

    eprintln!(
        "{}",
        format!("[Enforce] Found {} file(s)", text_files.len()).green()
    );

    let pb = ProgressBar::new(text_files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("=>-"),
    );

    let results: Vec<(PathBuf, Result<EnforcementAudit>)> = text_files
        .par_iter()
        .map(|path| {
            let out_path = output_path_for(path, dir, args.output.as_deref());
            let result = enforce_file(enforcer, path, &out_path);
            pb.inc(1);
            (path.clone(), result)
        })
        .collect();

    pb.finish_and_clear();

    let mut audits = Vec::new();
    for (path, result) in results {
        match result {
            Ok(audit) => {
                report_file(&path, &audit);
                audits.push((path.display().to_string(), audit));
            }
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("[ERROR] Failed to enforce {}: {:#}", path.display(), e).red()
                );
            }
        }
    }

    Ok(audits)
}

fn enforce_file(enforcer: &TerminologyEnforcer, input: &Path, output: &Path) -> Result<EnforcementAudit> {
    let text = fs::read_to_string(input).context("Failed to read input file")?;
    let (enforced, audit) = enforcer.enforce_audited(&text);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    fs::write(output, enforced).context("Failed to write output file")?;

    Ok(audit)
}

const OUTPUT_SUFFIX: &str = "enforced";

/// Outputs written next to their inputs, skipped on re-runs.
fn is_enforced_output(path: &Path) -> bool {
    let suffix = format!("_{}", OUTPUT_SUFFIX);
    path.file_stem()
        .is_some_and(|stem| stem.to_string_lossy().ends_with(&suffix))
}

fn output_path_for(file: &Path, root: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(base) => {
            let rel = file.strip_prefix(root).unwrap_or(file);
            base.join(rel)
        }
        None => utils::sibling_with_suffix(file, OUTPUT_SUFFIX),
    }
}

fn report_file(path: &Path, audit: &EnforcementAudit) {
    let summary = audit.summary();
    eprintln!(
        "  {} {} replacement(s), {} unique term(s)",
        path.display().to_string().cyan(),
        summary.total_replacements,
        summary.unique_terms
    );
    for r in &summary.replacements {
        tracing::debug!(
            "{}: '{}' -> '{}' at {}",
            path.display(),
            r.original_text,
            r.target_term,
            r.position
        );
    }
}
