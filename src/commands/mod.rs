pub mod config;
pub mod enforce;
pub mod glossary;
pub mod masking;
pub mod terms;
pub mod translate;
pub mod verify;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use termforce::config::Config;
use termforce::terminology::GlossaryTermSet;

/// Everything a command needs, loaded once in `main` and passed down.
pub struct AppContext {
    pub config: Config,
    glossary_override: Vec<PathBuf>,
}

impl AppContext {
    pub fn new(config: Config, glossary_override: Vec<PathBuf>) -> Self {
        Self {
            config,
            glossary_override,
        }
    }

    pub fn glossary_paths(&self) -> Vec<PathBuf> {
        if self.glossary_override.is_empty() {
            self.config.glossary_paths()
        } else {
            self.glossary_override.clone()
        }
    }

    pub fn load_terms(&self) -> Result<Arc<GlossaryTermSet>> {
        let paths = self.glossary_paths();
        if paths.is_empty() {
            anyhow::bail!("No glossary configured. Pass --glossary or set glossary.paths in the config.");
        }

        let terms = GlossaryTermSet::load(&paths).context("Failed to load glossary")?;

        eprintln!(
            "{}",
            format!(
                "[Glossary] Loaded {} glossary terms from {} file(s)",
                terms.len(),
                paths.len()
            )
            .green()
        );
        if terms.is_empty() {
            eprintln!("{}", "[WARN] Glossary is empty; nothing will be enforced".yellow());
        }

        Ok(Arc::new(terms))
    }
}
