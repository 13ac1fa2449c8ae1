//! Config command handlers

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::{ConfigAction, ConfigArgs};
use termforce::config::Config;
use termforce::pipeline::EnforcementMode;

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(),
        ConfigAction::Init { force } => init_config(force),
        ConfigAction::Set { key, value } => set_config(&key, &value),
        ConfigAction::Get { key } => get_config(&key),
        ConfigAction::Path => show_path(),
        ConfigAction::Edit => edit_config(),
    }
}

fn show_config() -> Result<()> {
    let config = Config::load()?;
    let content = toml::to_string_pretty(&config)?;

    println!("{}", "[Config]".green());
    println!("{}", content);

    Ok(())
}

fn init_config(force: bool) -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if path.exists() && !force {
        println!(
            "{}",
            format!("Config file already exists: {}", path.display()).yellow()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = Config::default();
    let saved_path = config.save()?;

    println!("{}", "[Config] Initialized".green());
    println!("  Created: {}", saved_path.display());
    println!();
    println!("Point it at your glossary:");
    println!("  termforce config set glossary.paths data/glossary.tsv,data/extra.tsv");

    Ok(())
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "verbose"] => {
            config.general.verbose = value.parse().unwrap_or(false);
        }
        ["glossary", "paths"] => {
            config.glossary.paths = termforce::config::parse_path_list(value)
                .into_iter()
                .map(|p| p.display().to_string())
                .collect();
        }
        ["enforcement", "mode"] => {
            config.enforcement.mode = value
                .parse::<EnforcementMode>()
                .map_err(anyhow::Error::msg)?;
        }
        ["enforcement", "placeholder_prefix"] => {
            if value.is_empty() {
                anyhow::bail!("Placeholder prefix cannot be empty");
            }
            config.enforcement.placeholder_prefix = value.to_string();
        }
        ["audit", "history_limit"] => {
            config.audit.history_limit = value
                .parse()
                .context(format!("Not a number: {}", value))?;
        }
        ["engine", "translate_command"] => {
            config.engine.translate_command = optional(value);
        }
        ["engine", "post_edit_command"] => {
            config.engine.post_edit_command = optional(value);
        }
        ["engine", "enable_post_editor"] => {
            config.engine.enable_post_editor = value.parse().unwrap_or(false);
        }
        ["engine", "source_language"] => {
            config.engine.source_language = value.to_string();
        }
        ["engine", "target_language"] => {
            config.engine.target_language = value.to_string();
        }
        ["engine", "category"] => {
            config.engine.category = optional(value);
        }
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    }

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    apply_setting(&mut config, key, value)?;

    config.save()?;
    println!("{}", format!("[Config] Set {} = {}", key, value).green());

    Ok(())
}

fn read_setting(config: Config, key: &str) -> Result<Option<String>> {
    let parts: Vec<&str> = key.split('.').collect();

    let value = match parts.as_slice() {
        ["general", "verbose"] => Some(config.general.verbose.to_string()),
        ["glossary", "paths"] => Some(config.glossary.paths.join(",")),
        ["enforcement", "mode"] => Some(config.enforcement.mode.to_string()),
        ["enforcement", "placeholder_prefix"] => Some(config.enforcement.placeholder_prefix),
        ["audit", "history_limit"] => Some(config.audit.history_limit.to_string()),
        ["engine", "translate_command"] => config.engine.translate_command,
        ["engine", "post_edit_command"] => config.engine.post_edit_command,
        ["engine", "enable_post_editor"] => Some(config.engine.enable_post_editor.to_string()),
        ["engine", "source_language"] => Some(config.engine.source_language),
        ["engine", "target_language"] => Some(config.engine.target_language),
        ["engine", "category"] => config.engine.category,
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    };

    Ok(value)
}

fn get_config(key: &str) -> Result<()> {
    let config = Config::load()?;

    match read_setting(config, key)? {
        Some(v) => println!("{} = {}", key, v),
        None => println!("{} = (not set)", key),
    }

    Ok(())
}

fn show_path() -> Result<()> {
    match Config::config_path() {
        Some(path) => {
            println!("{}", path.display());
            if path.exists() {
                println!("{}", "(exists)".green());
            } else {
                println!("{}", "(not created)".yellow());
            }
        }
        None => {
            println!("{}", "Could not determine config path".red());
        }
    }
    Ok(())
}

fn edit_config() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if !path.exists() {
        let config = Config::default();
        config.save()?;
        println!("{}", "[Config] Created default config".green());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening config with: {}", editor);
    println!("Path: {}", path.display());

    std::process::Command::new(&editor)
        .arg(&path)
        .status()
        .context(format!("Failed to open editor: {}", editor))?;

    Ok(())
}
