use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "termforce")]
#[command(author, version, about = "Deterministic glossary enforcement for machine translation", long_about = None)]
pub struct Cli {
    /// Glossary TSV file; repeat to merge several (overrides config)
    #[arg(short, long, global = true)]
    pub glossary: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enforce glossary terms in translated text
    Enforce(EnforceArgs),

    /// Replace glossary terms with placeholders before translation
    Mask(MaskArgs),

    /// Restore placeholders in translated text
    Unmask(UnmaskArgs),

    /// List glossary terms that occur in a text
    Terms(TermsArgs),

    /// Check that a rewrite kept every protected term
    Verify(VerifyArgs),

    /// Translate through an external engine with glossary enforcement
    Translate(TranslateArgs),

    /// Inspect the loaded glossary
    Glossary(GlossaryArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Initialize configuration file with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., engine.target_language)
        key: String,
        /// Value to set
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show config file path
    Path,

    /// Edit config file with default editor
    Edit,
}

#[derive(Parser, Debug)]
pub struct GlossaryArgs {
    #[command(subcommand)]
    pub action: GlossaryAction,
}

#[derive(Subcommand, Debug)]
pub enum GlossaryAction {
    /// Show term counts and lengths
    Stats,

    /// Report source terms mapped to more than one target
    Check,
}

#[derive(Parser, Debug)]
pub struct EnforceArgs {
    /// Input text file or directory ("-" reads stdin)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file or directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Process subdirectories recursively
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// File extension to pick up in directories
    #[arg(long, default_value = "txt")]
    pub extension: String,

    /// Write the audit trail as JSON
    #[arg(long)]
    pub audit_json: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct MaskArgs {
    /// Source text file ("-" reads stdin)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file for the masked text
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Where to write the placeholder map
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// Placeholder prefix (overrides config)
    #[arg(long)]
    pub prefix: Option<String>,
}

#[derive(Parser, Debug)]
pub struct UnmaskArgs {
    /// Translated text file ("-" reads stdin)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Placeholder map written by `mask`
    #[arg(long, required = true)]
    pub map: PathBuf,

    /// Output file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the audit trail as JSON
    #[arg(long)]
    pub audit_json: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct TermsArgs {
    /// Text file to scan ("-" reads stdin)
    #[arg(required = true)]
    pub input: PathBuf,
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Text before the rewrite
    #[arg(required = true)]
    pub before: PathBuf,

    /// Text after the rewrite
    #[arg(required = true)]
    pub after: PathBuf,

    /// Protected term (repeatable); defaults to glossary targets found in BEFORE
    #[arg(long = "term")]
    pub terms: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct TranslateArgs {
    /// Source text file ("-" reads stdin)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Translation command (reads stdin, prints translation); identity if unset
    #[arg(long)]
    pub engine: Option<String>,

    /// Post-editing command
    #[arg(long)]
    pub post_editor: Option<String>,

    /// Enforcement mode (post-hoc, mask)
    #[arg(long)]
    pub mode: Option<String>,

    /// Source language code
    #[arg(long)]
    pub from: Option<String>,

    /// Target language code
    #[arg(long)]
    pub to: Option<String>,

    /// Engine category
    #[arg(long)]
    pub category: Option<String>,

    /// Print the full pipeline result as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
