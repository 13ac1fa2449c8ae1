//! `terms`: glossary entries that occur in a text

use anyhow::Result;
use colored::Colorize;

use super::AppContext;
use crate::cli::TermsArgs;
use crate::utils;
use termforce::terminology::{TerminologyEnforcer, find_matches};

pub fn run(ctx: &AppContext, args: TermsArgs) -> Result<()> {
    let enforcer = TerminologyEnforcer::new(ctx.load_terms()?);
    let text = utils::read_input(&args.input)?;

    let applicable = enforcer.applicable_terms(&text);
    if applicable.is_empty() {
        eprintln!("{}", "[Terms] No glossary terms found".yellow());
        return Ok(());
    }

    eprintln!(
        "{}",
        format!("[Terms] {} applicable term(s)", applicable.len()).green()
    );
    for entry in applicable {
        let count = find_matches(&text, entry).len();
        println!("{}\t{}\t{}", entry.source(), entry.target(), count);
    }

    Ok(())
}
