//! `mask` / `unmask` commands

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use super::AppContext;
use crate::cli::{MaskArgs, UnmaskArgs};
use crate::utils;
use termforce::terminology::{EnforcementAudit, MaskedText, TerminologyEnforcer, unmask};

pub fn run_mask(ctx: &AppContext, args: MaskArgs) -> Result<()> {
    let enforcer = TerminologyEnforcer::new(ctx.load_terms()?);
    let prefix = args
        .prefix
        .clone()
        .unwrap_or_else(|| ctx.config.enforcement.placeholder_prefix.clone());

    let text = utils::read_input(&args.input)?;
    let masked = enforcer.mask(&text, &prefix);

    let map_path = match (&args.map, &args.output) {
        (Some(map), _) => map.clone(),
        (None, Some(output)) => output.with_extension("map.json"),
        (None, None) if !utils::is_stdin(&args.input) => args.input.with_extension("map.json"),
        (None, None) => PathBuf::from("placeholders.map.json"),
    };

    let map_json = serde_json::to_string_pretty(&masked).context("Failed to serialize placeholder map")?;
    fs::write(&map_path, map_json).context(format!("Failed to write {}", map_path.display()))?;

    utils::write_output(args.output.as_deref(), &masked.text)?;

    eprintln!(
        "{}",
        format!(
            "[Mask] {} term(s) masked, map written to {}",
            masked.placeholders.len(),
            map_path.display()
        )
        .green()
    );

    Ok(())
}

pub fn run_unmask(args: UnmaskArgs) -> Result<()> {
    let map_json = fs::read_to_string(&args.map)
        .context(format!("Failed to read placeholder map {}", args.map.display()))?;
    let masked: MaskedText = serde_json::from_str(&map_json).context("Invalid placeholder map")?;

    let translated = utils::read_input(&args.input)?;
    let mut audit = EnforcementAudit::new(translated.clone());
    let outcome = unmask(&translated, &masked, Some(&mut audit));
    audit.set_enforced_text(outcome.text.clone());

    utils::write_output(args.output.as_deref(), &outcome.text)?;

    eprintln!(
        "{}",
        format!("[Unmask] Restored {} placeholder(s)", outcome.restored).green()
    );
    for token in &outcome.missing {
        eprintln!("{}", format!("[WARN] Placeholder missing from translation: {}", token).yellow());
    }
    for token in &outcome.leftover {
        eprintln!("{}", format!("[WARN] Unknown placeholder left in text: {}", token).yellow());
    }

    if let Some(path) = &args.audit_json {
        let json = serde_json::to_string_pretty(&audit.summary())?;
        utils::write_output(Some(path.as_path()), &json)?;
    }

    Ok(())
}
