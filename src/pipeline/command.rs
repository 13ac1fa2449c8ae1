//! Providers backed by external programs
//!
//! The text is written to the program's stdin and its stdout is taken as the
//! result. Languages and protected terms are passed through environment
//! variables so any script or wrapper around a vendor CLI can act as engine.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{PipelineError, PipelineResult, PostEditor, TranslateOptions, TranslationProvider};

pub const ENV_SOURCE_LANG: &str = "TERMFORCE_SOURCE_LANG";
pub const ENV_TARGET_LANG: &str = "TERMFORCE_TARGET_LANG";
pub const ENV_CATEGORY: &str = "TERMFORCE_CATEGORY";
pub const ENV_PROTECTED_TERMS: &str = "TERMFORCE_PROTECTED_TERMS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
    label: String,
}

impl ExternalCommand {
    /// Splits a command line on whitespace; `None` when it is blank.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            label: command_line.trim().to_string(),
            program,
            args: parts.collect(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    async fn run(&self, input: &str, envs: &[(&str, String)]) -> Result<String, String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(envs.iter().map(|(k, v)| (*k, v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to start '{}': {}", self.label, e))?;

        // Feed stdin concurrently so a chatty child cannot block on a full pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let bytes = input.as_bytes().to_vec();
            tokio::spawn(async move { stdin.write_all(&bytes).await })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| format!("'{}' did not complete: {}", self.label, e))?;

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::debug!("'{}' closed stdin early: {}", self.label, e),
                Err(e) => tracing::debug!("stdin writer for '{}' failed: {}", self.label, e),
            }
        }

        if !output.status.success() {
            return Err(format!(
                "'{}' exited with {}: {}",
                self.label,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| format!("'{}' produced non UTF-8 output", self.label))?;
        Ok(stdout.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CommandTranslator {
    command: ExternalCommand,
}

impl CommandTranslator {
    pub fn new(command: ExternalCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl TranslationProvider for CommandTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        options: &TranslateOptions,
    ) -> PipelineResult<String> {
        let mut envs = vec![
            (ENV_SOURCE_LANG, source_lang.to_string()),
            (ENV_TARGET_LANG, target_lang.to_string()),
        ];
        if let Some(category) = &options.category {
            envs.push((ENV_CATEGORY, category.clone()));
        }

        self.command
            .run(text, &envs)
            .await
            .map_err(PipelineError::Translation)
    }

    fn provider_name(&self) -> &str {
        self.command.label()
    }
}

#[derive(Debug, Clone)]
pub struct CommandPostEditor {
    command: ExternalCommand,
}

impl CommandPostEditor {
    pub fn new(command: ExternalCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl PostEditor for CommandPostEditor {
    async fn rewrite(&self, text: &str, protected_terms: &[String]) -> PipelineResult<String> {
        let envs = [(ENV_PROTECTED_TERMS, protected_terms.join("\n"))];
        self.command
            .run(text, &envs)
            .await
            .map_err(PipelineError::PostEdit)
    }

    fn editor_name(&self) -> &str {
        self.command.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_line() {
        let cmd = ExternalCommand::parse("  trans -b :nl ").unwrap();
        assert_eq!(cmd.program, "trans");
        assert_eq!(cmd.args, ["-b", ":nl"]);
        assert_eq!(cmd.label(), "trans -b :nl");
        assert!(ExternalCommand::parse("   ").is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cat_translator_echoes_input() {
        let translator = CommandTranslator::new(ExternalCommand::parse("cat").unwrap());
        let out = translator
            .translate("hello\n", "en", "nl", &TranslateOptions::default())
            .await
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_is_an_error() {
        let translator = CommandTranslator::new(ExternalCommand::parse("false").unwrap());
        let err = translator
            .translate("hello", "en", "nl", &TranslateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Translation(_)));
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let editor =
            CommandPostEditor::new(ExternalCommand::parse("termforce-no-such-program").unwrap());
        let err = editor.rewrite("x", &[]).await.unwrap_err();
        assert!(matches!(err, PipelineError::PostEdit(_)));
    }
}
