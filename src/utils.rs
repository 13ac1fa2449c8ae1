//! Common utility functions

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

pub fn truncate_display(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Reads a file, or stdin when the path is "-".
pub fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).context(format!("Failed to read {}", path.display()))
}

/// Writes to `output`, or stdout when no output is given.
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).context("Failed to create output directory")?;
            }
            fs::write(path, content).context(format!("Failed to write {}", path.display()))
        }
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}

/// `dir/name.ext` -> `dir/name_<suffix>.ext`
pub fn sibling_with_suffix(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    match input.extension() {
        Some(ext) => input.with_file_name(format!("{}_{}.{}", stem, suffix, ext.to_string_lossy())),
        None => input.with_file_name(format!("{}_{}", stem, suffix)),
    }
}
