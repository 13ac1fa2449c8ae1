//! Configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::EnforcementMode;
use crate::terminology::masking::DEFAULT_PLACEHOLDER_PREFIX;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_NAME: &str = "termforce";

/// Comma-separated glossary paths; overrides `glossary.paths`.
pub const GLOSSARY_ENV: &str = "TERMFORCE_GLOSSARY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub glossary: GlossaryConfig,

    #[serde(default)]
    pub enforcement: EnforcementConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlossaryConfig {
    /// TSV resources, merged in order
    #[serde(default = "default_glossary_paths")]
    pub paths: Vec<String>,
}

fn default_glossary_paths() -> Vec<String> {
    vec!["data/glossary.tsv".to_string()]
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            paths: default_glossary_paths(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementConfig {
    /// post-hoc or mask
    #[serde(default)]
    pub mode: EnforcementMode,

    #[serde(default = "default_placeholder_prefix")]
    pub placeholder_prefix: String,
}

fn default_placeholder_prefix() -> String {
    DEFAULT_PLACEHOLDER_PREFIX.to_string()
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            mode: EnforcementMode::default(),
            placeholder_prefix: default_placeholder_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Audits kept for statistics; 0 keeps everything
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    1000
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Command that reads source text on stdin and prints the translation
    #[serde(default)]
    pub translate_command: Option<String>,

    /// Command that rewrites enforced text for fluency
    #[serde(default)]
    pub post_edit_command: Option<String>,

    #[serde(default)]
    pub enable_post_editor: bool,

    #[serde(default = "default_source_language")]
    pub source_language: String,

    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Custom engine category passed to the translate command
    #[serde(default)]
    pub category: Option<String>,
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "nl".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            translate_command: None,
            post_edit_command: None,
            enable_post_editor: false,
            source_language: default_source_language(),
            target_language: default_target_language(),
            category: None,
        }
    }
}

/// Splits a delimited path list, dropping blank items.
pub fn parse_path_list(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_NAME))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join(CONFIG_FILE_NAME))
    }

    /// Load config from default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path().context("Could not determine config path")?;
        Self::load_from(&path)
    }

    /// Load config from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save config to default location
    pub fn save(&self) -> Result<PathBuf> {
        let dir = Self::config_dir().context("Could not determine config directory")?;
        fs::create_dir_all(&dir).context("Failed to create config directory")?;

        let path = dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content).context("Failed to write config file")?;

        Ok(path)
    }

    /// Glossary paths, with the environment variable taking precedence
    pub fn glossary_paths(&self) -> Vec<PathBuf> {
        self.resolve_glossary_paths(std::env::var(GLOSSARY_ENV).ok().as_deref())
    }

    fn resolve_glossary_paths(&self, env_value: Option<&str>) -> Vec<PathBuf> {
        match env_value.map(parse_path_list) {
            Some(paths) if !paths.is_empty() => paths,
            _ => self.glossary.paths.iter().map(PathBuf::from).collect(),
        }
    }

    /// `None` when the history is unbounded
    pub fn audit_history_limit(&self) -> Option<usize> {
        Some(self.audit.history_limit).filter(|&limit| limit > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.engine.target_language, "nl");
        assert_eq!(config.enforcement.placeholder_prefix, "__GLOSS_");
        assert_eq!(config.enforcement.mode, EnforcementMode::PostHoc);
        assert_eq!(config.audit_history_limit(), Some(1000));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            "[glossary]\npaths = [\"a.tsv\", \"b.tsv\"]\n\n[enforcement]\nmode = \"mask\"\n\n[audit]\nhistory_limit = 0\n",
        )
        .unwrap();
        assert_eq!(config.glossary.paths, ["a.tsv", "b.tsv"]);
        assert_eq!(config.enforcement.mode, EnforcementMode::Mask);
        assert_eq!(config.enforcement.placeholder_prefix, "__GLOSS_");
        assert_eq!(config.audit_history_limit(), None);
        assert_eq!(config.engine.source_language, "en");
    }

    #[test]
    fn test_round_trip() {
        let mut config = Config::default();
        config.engine.translate_command = Some("trans -b".to_string());
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.engine.translate_command.as_deref(), Some("trans -b"));
    }

    #[test]
    fn test_env_list_overrides_configured_paths() {
        let config = Config::default();
        assert_eq!(
            config.resolve_glossary_paths(Some(" one.tsv, ,two.tsv ")),
            [PathBuf::from("one.tsv"), PathBuf::from("two.tsv")]
        );
        assert_eq!(
            config.resolve_glossary_paths(Some("  ")),
            [PathBuf::from("data/glossary.tsv")]
        );
        assert_eq!(
            config.resolve_glossary_paths(None),
            [PathBuf::from("data/glossary.tsv")]
        );
    }
}
