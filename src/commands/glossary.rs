//! `glossary stats` / `glossary check`

use anyhow::Result;
use colored::Colorize;

use super::AppContext;
use crate::cli::{GlossaryAction, GlossaryArgs};
use crate::utils::truncate_display;

pub fn run(ctx: &AppContext, args: GlossaryArgs) -> Result<()> {
    let terms = ctx.load_terms()?;

    match args.action {
        GlossaryAction::Stats => {
            let stats = terms.statistics();
            println!("{}", "[Glossary]".green());
            println!("  Total terms:   {}", stats.total_terms);
            println!("  Longest term:  {} chars", stats.longest_term);
            println!("  Shortest term: {} chars", stats.shortest_term);
            if let Some(first) = terms.entries().first() {
                println!(
                    "  Applied first: {}",
                    truncate_display(first.source(), 40).cyan()
                );
            }
        }
        GlossaryAction::Check => {
            let conflicts = terms.conflicts();
            if conflicts.is_empty() {
                println!("{}", "[OK] No conflicting glossary entries".green());
                return Ok(());
            }
            for conflict in &conflicts {
                println!(
                    "{}",
                    format!(
                        "[CONFLICT] '{}' -> {} (using '{}')",
                        truncate_display(&conflict.source, 40),
                        conflict.targets.join(" | "),
                        conflict.targets[0]
                    )
                    .yellow()
                );
            }
            println!("{} conflicting source term(s)", conflicts.len());
        }
    }

    Ok(())
}
