//! `verify`: protected-term preservation between two texts

use anyhow::Result;
use colored::Colorize;

use super::AppContext;
use crate::cli::VerifyArgs;
use crate::utils;
use termforce::terminology::verify::count_occurrences;
use termforce::terminology::{TerminologyEnforcer, verify_preservation};

pub fn run(ctx: &AppContext, args: VerifyArgs) -> Result<()> {
    let before = utils::read_input(&args.before)?;
    let after = utils::read_input(&args.after)?;

    let terms = if args.terms.is_empty() {
        protected_from_glossary(ctx, &before)?
    } else {
        args.terms.clone()
    };

    if terms.is_empty() {
        eprintln!("{}", "[Verify] No protected terms to check".yellow());
        return Ok(());
    }

    let report = verify_preservation(&before, &after, &terms);
    if report.preserved {
        println!(
            "{}",
            format!("[OK] All {} protected term(s) preserved", terms.len()).green()
        );
        return Ok(());
    }

    for drift in &report.changed {
        println!(
            "{}",
            format!(
                "[CHANGED] '{}': {} occurrence(s) before, {} after",
                drift.term, drift.before, drift.after
            )
            .red()
        );
    }
    anyhow::bail!("{} protected term(s) changed", report.changed.len())
}

/// Glossary targets that occur in the enforced text.
fn protected_from_glossary(ctx: &AppContext, before: &str) -> Result<Vec<String>> {
    let enforcer = TerminologyEnforcer::new(ctx.load_terms()?);
    let mut terms: Vec<String> = Vec::new();
    for entry in enforcer.terms() {
        let target = entry.target().to_string();
        if count_occurrences(before, &target) > 0 && !terms.contains(&target) {
            terms.push(target);
        }
    }
    Ok(terms)
}
